use crate::lattice::{Lattice, SemiLattice};

/// The product of two lattices. Elements are pairs, and meet is taken
/// componentwise.
#[derive(Clone, Debug, Default)]
pub struct ProductLattice<A, B> {
    first: A,
    second: B,
}

impl<A, B> ProductLattice<A, B> {
    pub fn new(first: A, second: B) -> ProductLattice<A, B> {
        ProductLattice { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A: SemiLattice, B: SemiLattice> SemiLattice for ProductLattice<A, B> {
    type Element = (A::Element, B::Element);

    fn meet(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        (
            self.first.meet(&lhs.0, &rhs.0),
            self.second.meet(&lhs.1, &rhs.1),
        )
    }
}

impl<A: Lattice, B: Lattice> Lattice for ProductLattice<A, B> {
    fn top(&self) -> Self::Element {
        (self.first.top(), self.second.top())
    }
}
