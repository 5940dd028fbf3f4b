//! Lattice law checks shared by the lattice tests.

use crate::lattice::{Lattice, SemiLattice};

/// Check idempotence, commutativity and associativity of `meet` over every
/// combination of `samples`.
pub(crate) fn assert_semi_lattice_laws<L: SemiLattice>(lattice: &L, samples: &[L::Element]) {
    for a in samples {
        assert_eq!(lattice.meet(a, a), *a, "meet is not idempotent for {:?}", a);

        for b in samples {
            assert_eq!(
                lattice.meet(a, b),
                lattice.meet(b, a),
                "meet is not commutative for {:?}, {:?}",
                a,
                b
            );

            for c in samples {
                assert_eq!(
                    lattice.meet(a, &lattice.meet(b, c)),
                    lattice.meet(&lattice.meet(a, b), c),
                    "meet is not associative for {:?}, {:?}, {:?}",
                    a,
                    b,
                    c
                );
            }
        }
    }
}

/// Check the semi-lattice laws, and that top is the unit of `meet`.
pub(crate) fn assert_lattice_laws<L: Lattice>(lattice: &L, samples: &[L::Element]) {
    assert_semi_lattice_laws(lattice, samples);

    let top = lattice.top();
    assert_eq!(top, lattice.top());
    assert!(lattice.is_top(&top));

    for a in samples {
        assert_eq!(lattice.meet(&top, a), *a, "top is not the unit for {:?}", a);
        assert_eq!(lattice.meet(a, &top), *a, "top is not the unit for {:?}", a);
    }
}
