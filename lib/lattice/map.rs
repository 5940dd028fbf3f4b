//! A lattice of maps from keys to elements of a sub-lattice.

use crate::lattice::{DeepCopy, Lattice, SemiLattice};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A map from keys to facts. A key without an entry maps to the top of the
/// value lattice.
///
/// Entries are only written through `MapLattice`, which never stores a top
/// value, so two `MapFact` are equal exactly when they denote the same
/// function from keys to facts.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct MapFact<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> MapFact<K, V> {
    /// Get the stored fact for `key`, or `None` if `key` maps to top.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Keys which map to something other than top.
    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Ord, V> Default for MapFact<K, V> {
    fn default() -> MapFact<K, V> {
        MapFact {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: DeepCopy + Ord, V: DeepCopy> DeepCopy for MapFact<K, V> {
    fn deep_copy(&self) -> Self {
        MapFact {
            entries: self.entries.deep_copy(),
        }
    }
}

impl<K: Ord + fmt::Display, V: fmt::Display> fmt::Display for MapFact<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// The pointwise lattice of `MapFact<K, L::Element>`.
#[derive(Clone, Debug, Default)]
pub struct MapLattice<K, L> {
    value_lattice: L,
    k: std::marker::PhantomData<K>,
}

impl<K, L> MapLattice<K, L>
where
    K: Clone + fmt::Debug + Ord + DeepCopy,
    L: Lattice,
{
    pub fn new(value_lattice: L) -> MapLattice<K, L> {
        MapLattice {
            value_lattice,
            k: std::marker::PhantomData,
        }
    }

    /// The lattice of values in this map.
    pub fn value_lattice(&self) -> &L {
        &self.value_lattice
    }

    /// Get the fact for `key`, materializing top for a missing key.
    pub fn get_or_top(&self, fact: &MapFact<K, L::Element>, key: &K) -> L::Element {
        match fact.get(key) {
            Some(value) => value.deep_copy(),
            None => self.value_lattice.top(),
        }
    }

    /// Set the fact for `key`. Setting a key to top removes its entry.
    pub fn insert(&self, fact: &mut MapFact<K, L::Element>, key: K, value: L::Element) {
        if self.value_lattice.is_top(&value) {
            fact.entries.remove(&key);
        } else {
            fact.entries.insert(key, value);
        }
    }

    /// Build a fact from `(key, value)` pairs.
    pub fn from_entries<I>(&self, entries: I) -> MapFact<K, L::Element>
    where
        I: IntoIterator<Item = (K, L::Element)>,
    {
        let mut fact = MapFact::default();
        for (key, value) in entries {
            self.insert(&mut fact, key, value);
        }
        fact
    }
}

impl<K, L> SemiLattice for MapLattice<K, L>
where
    K: Clone + fmt::Debug + Ord + DeepCopy,
    L: Lattice,
{
    type Element = MapFact<K, L::Element>;

    fn meet(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.deep_copy();
        for (key, rhs_value) in rhs.iter() {
            let value = match lhs.get(key) {
                Some(lhs_value) => self.value_lattice.meet(lhs_value, rhs_value),
                None => rhs_value.deep_copy(),
            };
            self.insert(&mut result, key.deep_copy(), value);
        }
        result
    }
}

impl<K, L> Lattice for MapLattice<K, L>
where
    K: Clone + fmt::Debug + Ord + DeepCopy,
    L: Lattice,
{
    fn top(&self) -> Self::Element {
        MapFact::default()
    }

    fn is_top(&self, element: &Self::Element) -> bool {
        element.is_empty()
    }
}
