//! Set lattices.
//!
//! `UnionLattice` is the "may" lattice: a fact is every value which might
//! reach a point, and meeting two facts never loses a possibility. It is
//! bounded, so a set which grows past its bound collapses to
//! `ValueSet::Unknown`.
//!
//! `IntersectionLattice` is the "must" lattice: a fact is every value which
//! holds on all paths to a point.

use crate::lattice::{DeepCopy, Lattice, SemiLattice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

/// The values which may reach a point.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ValueSet<T: Ord> {
    Values(BTreeSet<T>),
    /// Too many values to track. Any value may reach this point.
    Unknown,
}

impl<T: Ord> ValueSet<T> {
    /// The tracked values, or `None` if this set is `Unknown`.
    pub fn values(&self) -> Option<&BTreeSet<T>> {
        match self {
            ValueSet::Values(values) => Some(values),
            ValueSet::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ValueSet::Unknown)
    }

    /// Returns `true` if `value` may reach this point.
    pub fn may_contain(&self, value: &T) -> bool {
        match self {
            ValueSet::Values(values) => values.contains(value),
            ValueSet::Unknown => true,
        }
    }

    /// Returns `true` if this set contains every value of `other`.
    pub fn is_superset(&self, other: &ValueSet<T>) -> bool {
        match (self, other) {
            (ValueSet::Unknown, _) => true,
            (ValueSet::Values(_), ValueSet::Unknown) => false,
            (ValueSet::Values(lhs), ValueSet::Values(rhs)) => lhs.is_superset(rhs),
        }
    }
}

impl<T: DeepCopy + Ord> DeepCopy for ValueSet<T> {
    fn deep_copy(&self) -> Self {
        match self {
            ValueSet::Values(values) => ValueSet::Values(values.deep_copy()),
            ValueSet::Unknown => ValueSet::Unknown,
        }
    }
}

impl<T: Ord + fmt::Display> fmt::Display for ValueSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueSet::Values(values) => {
                let values = values
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<String>>();
                write!(f, "{{{}}}", values.join(", "))
            }
            ValueSet::Unknown => write!(f, "?"),
        }
    }
}

/// The bounded union lattice over `ValueSet<T>`.
#[derive(Clone, Debug)]
pub struct UnionLattice<T> {
    bound: usize,
    t: PhantomData<T>,
}

impl<T> UnionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    /// Create a `UnionLattice` whose sets collapse to `Unknown` once they
    /// hold more than `bound` values.
    pub fn new(bound: usize) -> UnionLattice<T> {
        UnionLattice {
            bound,
            t: PhantomData,
        }
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    fn bounded(&self, values: BTreeSet<T>) -> ValueSet<T> {
        if values.len() > self.bound {
            ValueSet::Unknown
        } else {
            ValueSet::Values(values)
        }
    }

    pub fn singleton(&self, value: T) -> ValueSet<T> {
        self.from_values([value])
    }

    pub fn from_values<I: IntoIterator<Item = T>>(&self, values: I) -> ValueSet<T> {
        self.bounded(values.into_iter().collect())
    }

    /// Add `value` to `set`, collapsing it if it grows past the bound.
    pub fn insert(&self, set: &ValueSet<T>, value: T) -> ValueSet<T> {
        match set {
            ValueSet::Values(values) => {
                let mut values = values.deep_copy();
                values.insert(value);
                self.bounded(values)
            }
            ValueSet::Unknown => ValueSet::Unknown,
        }
    }
}

impl<T> SemiLattice for UnionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    type Element = ValueSet<T>;

    fn meet(&self, lhs: &ValueSet<T>, rhs: &ValueSet<T>) -> ValueSet<T> {
        match (lhs, rhs) {
            (ValueSet::Values(lhs), ValueSet::Values(rhs)) => {
                self.bounded(lhs.union(rhs).map(DeepCopy::deep_copy).collect())
            }
            _ => ValueSet::Unknown,
        }
    }
}

impl<T> Lattice for UnionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    fn top(&self) -> ValueSet<T> {
        ValueSet::Values(BTreeSet::new())
    }
}

/// The values which hold on every path to a point.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum DefiniteSet<T: Ord> {
    /// No path has been seen yet, so every value vacuously holds.
    Universe,
    Values(BTreeSet<T>),
}

impl<T: Ord> DefiniteSet<T> {
    /// Returns `true` if `value` holds on every path.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            DefiniteSet::Universe => true,
            DefiniteSet::Values(values) => values.contains(value),
        }
    }

    pub fn values(&self) -> Option<&BTreeSet<T>> {
        match self {
            DefiniteSet::Universe => None,
            DefiniteSet::Values(values) => Some(values),
        }
    }
}

impl<T: DeepCopy + Ord> DeepCopy for DefiniteSet<T> {
    fn deep_copy(&self) -> Self {
        match self {
            DefiniteSet::Universe => DefiniteSet::Universe,
            DefiniteSet::Values(values) => DefiniteSet::Values(values.deep_copy()),
        }
    }
}

impl<T: Ord + fmt::Display> fmt::Display for DefiniteSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DefiniteSet::Universe => write!(f, "*"),
            DefiniteSet::Values(values) => {
                let values = values
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<String>>();
                write!(f, "{{{}}}", values.join(", "))
            }
        }
    }
}

/// The intersection lattice over `DefiniteSet<T>`.
#[derive(Clone, Debug)]
pub struct IntersectionLattice<T> {
    t: PhantomData<T>,
}

impl<T> IntersectionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    pub fn new() -> IntersectionLattice<T> {
        IntersectionLattice { t: PhantomData }
    }

    /// The fact where nothing holds.
    pub fn empty(&self) -> DefiniteSet<T> {
        DefiniteSet::Values(BTreeSet::new())
    }

    pub fn from_values<I: IntoIterator<Item = T>>(&self, values: I) -> DefiniteSet<T> {
        DefiniteSet::Values(values.into_iter().collect())
    }

    /// Add `value` to the values which hold. `Universe` is unchanged.
    pub fn insert(&self, set: &DefiniteSet<T>, value: T) -> DefiniteSet<T> {
        match set {
            DefiniteSet::Universe => DefiniteSet::Universe,
            DefiniteSet::Values(values) => {
                let mut values = values.deep_copy();
                values.insert(value);
                DefiniteSet::Values(values)
            }
        }
    }
}

impl<T> Default for IntersectionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    fn default() -> IntersectionLattice<T> {
        IntersectionLattice::new()
    }
}

impl<T> SemiLattice for IntersectionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    type Element = DefiniteSet<T>;

    fn meet(&self, lhs: &DefiniteSet<T>, rhs: &DefiniteSet<T>) -> DefiniteSet<T> {
        match (lhs, rhs) {
            (DefiniteSet::Universe, _) => rhs.deep_copy(),
            (_, DefiniteSet::Universe) => lhs.deep_copy(),
            (DefiniteSet::Values(lhs), DefiniteSet::Values(rhs)) => DefiniteSet::Values(
                lhs.intersection(rhs).map(DeepCopy::deep_copy).collect(),
            ),
        }
    }
}

impl<T> Lattice for IntersectionLattice<T>
where
    T: Clone + fmt::Debug + Ord + DeepCopy,
{
    fn top(&self) -> DefiniteSet<T> {
        DefiniteSet::Universe
    }
}
