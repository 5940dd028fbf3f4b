//! An optional fact, for base facts without a natural "no value yet".
//!
//! Many base facts are plain values, like a constant or a small state enum,
//! and have no element meaning "not yet visited". `MaybeLattice` adds one,
//! `Maybe::absent`, as the top of the lifted lattice so transfer functions
//! never need to special-case it.

use crate::lattice::{DeepCopy, Lattice, SemiLattice};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Either no fact yet, or a fact of type `T`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Maybe<T>(Option<T>);

impl<T> Maybe<T> {
    /// No information yet.
    pub fn absent() -> Maybe<T> {
        Maybe(None)
    }

    pub fn present(value: T) -> Maybe<T> {
        Maybe(Some(value))
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Maybe<T> {
        Maybe::absent()
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Maybe<T> {
        Maybe(value)
    }
}

/// Absent stays absent. A present payload is deep copied, so the copy never
/// aliases storage of the original.
impl<T: DeepCopy> DeepCopy for Maybe<T> {
    fn deep_copy(&self) -> Self {
        Maybe(self.0.as_ref().map(DeepCopy::deep_copy))
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(ref value) => value.fmt(f),
            None => write!(f, "⊤"),
        }
    }
}

/// Lifts a `SemiLattice` over `T` into a `Lattice` over `Maybe<T>`.
#[derive(Clone, Debug, Default)]
pub struct MaybeLattice<L> {
    value_lattice: L,
}

impl<L: SemiLattice> MaybeLattice<L> {
    pub fn new(value_lattice: L) -> MaybeLattice<L> {
        MaybeLattice { value_lattice }
    }

    /// The lattice over present values.
    pub fn value_lattice(&self) -> &L {
        &self.value_lattice
    }
}

impl<L: SemiLattice> SemiLattice for MaybeLattice<L> {
    type Element = Maybe<L::Element>;

    fn meet(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        match (lhs.value(), rhs.value()) {
            (None, _) => rhs.deep_copy(),
            (_, None) => lhs.deep_copy(),
            (Some(lhs), Some(rhs)) => Maybe::present(self.value_lattice.meet(lhs, rhs)),
        }
    }
}

impl<L: SemiLattice> Lattice for MaybeLattice<L> {
    fn top(&self) -> Self::Element {
        Maybe::absent()
    }
}
