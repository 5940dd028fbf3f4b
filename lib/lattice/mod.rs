//! Lattices for data-flow facts.
//!
//! A lattice here is a value implementing [`Lattice`]: it knows the `top`
//! element (no information) and how to `meet` two elements (their greatest
//! lower bound). Lattices are values rather than marker types so they can
//! carry configuration, such as the cardinality bound of a [`UnionLattice`].
//!
//! Larger lattices are built from smaller ones by static composition:
//!
//! * [`MaybeLattice`] lifts a [`SemiLattice`] with no natural "unset" value
//! into a [`Lattice`] whose top is [`Maybe::absent`].
//! * [`ProductLattice`] pairs two lattices, meeting componentwise.
//! * [`MapLattice`] maps keys to elements of a sub-lattice; a missing key is
//! that sub-lattice's top.
//! * [`UnionLattice`] and [`IntersectionLattice`] are the "may" and "must"
//! set lattices.
//!
//! Every lattice must satisfy, for all elements `a`, `b`, `c`:
//!
//! * `meet(a, a) == a`
//! * `meet(a, b) == meet(b, a)`
//! * `meet(a, meet(b, c)) == meet(meet(a, b), c)`
//! * `meet(top(), a) == a`
//!
//! The fixed-point engine relies on these laws, and on every lattice having
//! finite height, to terminate.

mod constant;
mod map;
mod maybe;
mod product;
mod set;

#[cfg(test)]
pub(crate) mod laws;

pub use self::constant::{Constant, ConstantLattice};
pub use self::map::{MapFact, MapLattice};
pub use self::maybe::{Maybe, MaybeLattice};
pub use self::product::ProductLattice;
pub use self::set::{DefiniteSet, IntersectionLattice, UnionLattice, ValueSet};

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

/// Produce a copy of a value which shares no mutable state with the original.
///
/// The default implementation delegates to `Clone`, which is a deep copy for
/// any type that owns all of its data. Types holding shared ownership
/// (`Rc`, `Arc`) override it to allocate fresh storage.
///
/// Every lattice element type must implement `DeepCopy` explicitly, so an
/// element type cannot be used in a lattice without its copy semantics having
/// been decided.
pub trait DeepCopy: Clone {
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}

macro_rules! deep_copy_by_clone {
    ($($t: ty),*) => {
        $(impl DeepCopy for $t {})*
    }
}

deep_copy_by_clone!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str
);

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self) -> Self {
        self.as_ref().map(DeepCopy::deep_copy)
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy(&self) -> Self {
        Box::new((**self).deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for RefCell<T> {
    fn deep_copy(&self) -> Self {
        RefCell::new(self.borrow().deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for Rc<T> {
    fn deep_copy(&self) -> Self {
        Rc::new((**self).deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for Arc<T> {
    fn deep_copy(&self) -> Self {
        Arc::new((**self).deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy(&self) -> Self {
        self.iter().map(DeepCopy::deep_copy).collect()
    }
}

impl<T: DeepCopy + Ord> DeepCopy for BTreeSet<T> {
    fn deep_copy(&self) -> Self {
        self.iter().map(DeepCopy::deep_copy).collect()
    }
}

impl<K: DeepCopy + Ord, V: DeepCopy> DeepCopy for BTreeMap<K, V> {
    fn deep_copy(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.deep_copy(), v.deep_copy()))
            .collect()
    }
}

impl<A: DeepCopy, B: DeepCopy> DeepCopy for (A, B) {
    fn deep_copy(&self) -> Self {
        (self.0.deep_copy(), self.1.deep_copy())
    }
}

/// A meet semi-lattice: elements can be met, but there may be no top.
pub trait SemiLattice {
    /// The type of facts in this lattice.
    type Element: Clone + Debug + Eq + DeepCopy;

    /// Returns the greatest lower bound of `lhs` and `rhs`.
    ///
    /// Neither operand is modified, and the result shares no mutable state
    /// with either operand.
    fn meet(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;
}

/// A bounded meet semi-lattice, with a top element representing "no
/// information."
pub trait Lattice: SemiLattice {
    /// Returns the top element. Repeated calls return equal values.
    fn top(&self) -> Self::Element;

    /// Returns `true` if `element` is the top element.
    fn is_top(&self, element: &Self::Element) -> bool {
        *element == self.top()
    }

    /// Returns `true` if `lhs` is at or below `rhs` in this lattice, i.e.
    /// `lhs` carries at least as much information as `rhs`.
    fn less_or_equal(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        self.meet(lhs, rhs) == *lhs
    }

    /// Meet every element of `elements`, starting from top.
    fn meet_all<'e, I>(&self, elements: I) -> Self::Element
    where
        I: IntoIterator<Item = &'e Self::Element>,
        Self::Element: 'e,
    {
        elements
            .into_iter()
            .fold(self.top(), |acc, element| self.meet(&acc, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_copy_does_not_alias_shared_payloads() {
        let original = Rc::new(RefCell::new(vec![1u32, 2, 3]));
        let copy = original.deep_copy();

        copy.borrow_mut().push(4);

        assert_eq!(*original.borrow(), vec![1, 2, 3]);
        assert_eq!(*copy.borrow(), vec![1, 2, 3, 4]);
        assert!(!Rc::ptr_eq(&original, &copy));
    }

    #[test]
    fn deep_copy_of_collections_copies_elements() {
        let shared = Arc::new(String::from("System.Type"));
        let set: BTreeSet<Arc<String>> = [shared.clone()].into_iter().collect();

        let copy = set.deep_copy();

        assert_eq!(copy, set);
        assert!(!Arc::ptr_eq(copy.iter().next().unwrap(), &shared));
    }

    #[test]
    fn meet_all_starts_from_top() {
        let lattice = UnionLattice::<u32>::new(8);
        let elements = vec![lattice.singleton(1), lattice.singleton(2)];

        assert_eq!(lattice.meet_all(&elements), lattice.from_values([1, 2]));
        assert_eq!(lattice.meet_all(Vec::new().iter()), lattice.top());
    }

    #[test]
    fn less_or_equal_follows_meet() {
        let lattice = UnionLattice::<u32>::new(8);

        assert!(lattice.less_or_equal(&lattice.from_values([1, 2]), &lattice.singleton(1)));
        assert!(!lattice.less_or_equal(&lattice.singleton(1), &lattice.from_values([1, 2])));
        assert!(lattice.less_or_equal(&lattice.singleton(1), &lattice.top()));
    }
}
