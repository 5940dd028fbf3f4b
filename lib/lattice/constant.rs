//! A flat lattice of constants.
//!
//! Two equal constants meet to themselves. Two different constants meet to
//! `Unknown`, which absorbs everything. There is no top, wrap the lattice in
//! a `MaybeLattice` for one.

use crate::lattice::{DeepCopy, SemiLattice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A constant value, or `Unknown` when paths disagree.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Constant<T> {
    Value(T),
    Unknown,
}

impl<T> Constant<T> {
    /// Get the value of this constant, if it is known.
    pub fn value(&self) -> Option<&T> {
        match self {
            Constant::Value(value) => Some(value),
            Constant::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Constant::Unknown)
    }
}

impl<T: DeepCopy> DeepCopy for Constant<T> {
    fn deep_copy(&self) -> Self {
        match self {
            Constant::Value(value) => Constant::Value(value.deep_copy()),
            Constant::Unknown => Constant::Unknown,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Constant<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constant::Value(value) => value.fmt(f),
            Constant::Unknown => write!(f, "⊥"),
        }
    }
}

/// The `SemiLattice` over `Constant<T>`.
#[derive(Clone, Debug)]
pub struct ConstantLattice<T> {
    t: PhantomData<T>,
}

impl<T> ConstantLattice<T> {
    pub fn new() -> ConstantLattice<T> {
        ConstantLattice { t: PhantomData }
    }
}

impl<T> Default for ConstantLattice<T> {
    fn default() -> ConstantLattice<T> {
        ConstantLattice::new()
    }
}

impl<T> SemiLattice for ConstantLattice<T>
where
    T: Clone + fmt::Debug + Eq + DeepCopy,
{
    type Element = Constant<T>;

    fn meet(&self, lhs: &Constant<T>, rhs: &Constant<T>) -> Constant<T> {
        match (lhs, rhs) {
            (Constant::Value(l), Constant::Value(r)) if l == r => lhs.deep_copy(),
            _ => Constant::Unknown,
        }
    }
}
