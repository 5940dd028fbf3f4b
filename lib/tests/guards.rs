//! Broken analyses are reported, not run forever.

use super::{nop, nop_blocks, Widen};
use crate::analysis::*;
use crate::il::*;
use crate::lattice::*;
use crate::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use test_log::test;

/// Flips between two sets on every visit of `block`.
struct Oscillate {
    lattice: UnionLattice<u8>,
    block: usize,
}

impl FixedPointAnalysis for Oscillate {
    type Lattice = UnionLattice<u8>;

    fn lattice(&self) -> &UnionLattice<u8> {
        &self.lattice
    }

    fn trans(&self, location: RefProgramPoint, fact: &ValueSet<u8>) -> Result<ValueSet<u8>, Error> {
        if location.block().index() != self.block {
            return Ok(fact.deep_copy());
        }
        if fact.may_contain(&0) {
            Ok(self.lattice.top())
        } else {
            Ok(self.lattice.singleton(0))
        }
    }
}

/// Sets `cancellation` the first time it runs.
struct CancelOnVisit {
    lattice: UnionLattice<u8>,
    cancellation: Arc<AtomicBool>,
}

impl FixedPointAnalysis for CancelOnVisit {
    type Lattice = UnionLattice<u8>;

    fn lattice(&self) -> &UnionLattice<u8> {
        &self.lattice
    }

    fn trans(&self, _: RefProgramPoint, fact: &ValueSet<u8>) -> Result<ValueSet<u8>, Error> {
        self.cancellation.store(true, Ordering::Relaxed);
        Ok(self.lattice.insert(fact, 1))
    }
}

#[test]
fn iteration_budget_exceeded() {
    // A set which never stops growing in a loop
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
    let analysis = Widen {
        lattice: UnionLattice::new(usize::MAX),
        block: 1,
        limit: usize::MAX,
    };
    let options = OptionsBuilder::new().iteration_budget(10).build();

    let result = fixed_point(&analysis, &control_flow_graph, analysis.lattice().top(), &options);

    match result {
        Err(Error::IterationBudgetExceeded { point, budget }) => {
            assert_eq!(point, nop(1));
            assert_eq!(budget, 10);
        }
        other => panic!("expected IterationBudgetExceeded, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn non_monotone_transfer_is_detected() {
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
    let analysis = Oscillate {
        lattice: UnionLattice::new(4),
        block: 1,
    };

    let error = fixed_point(
        &analysis,
        &control_flow_graph,
        analysis.lattice().top(),
        &Options::new(),
    )
    .unwrap_err();

    assert!(matches!(error, Error::NonMonotoneTransfer(point) if point == nop(1)));
    assert!(error.is_contract_violation());
}

#[test]
fn unchecked_non_monotone_transfer_hits_the_budget() {
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
    let analysis = Oscillate {
        lattice: UnionLattice::new(4),
        block: 1,
    };
    let options = OptionsBuilder::new()
        .verify_monotonicity(false)
        .iteration_budget(32)
        .build();

    let error = fixed_point(&analysis, &control_flow_graph, analysis.lattice().top(), &options)
        .unwrap_err();

    assert!(matches!(error, Error::IterationBudgetExceeded { budget: 32, .. }));
    assert!(error.in_method("Program.Main").is_contract_violation());
}

#[test]
fn cancelled_before_start() {
    let control_flow_graph = nop_blocks(2, &[(0, 1)]);
    let cancellation = Arc::new(AtomicBool::new(true));
    let analysis = CancelOnVisit {
        lattice: UnionLattice::new(4),
        cancellation: cancellation.clone(),
    };
    let options = OptionsBuilder::new().cancellation(cancellation).build();

    let error = fixed_point(&analysis, &control_flow_graph, analysis.lattice().top(), &options)
        .unwrap_err();

    assert!(matches!(error, Error::Cancelled));
    assert!(!error.is_contract_violation());
}

#[test]
fn cancelled_between_visits() {
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 2)]);
    let cancellation = Arc::new(AtomicBool::new(false));
    let analysis = CancelOnVisit {
        lattice: UnionLattice::new(4),
        cancellation: cancellation.clone(),
    };
    let options = OptionsBuilder::new().cancellation(cancellation.clone()).build();

    let result = fixed_point(&analysis, &control_flow_graph, analysis.lattice().top(), &options);

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(cancellation.load(Ordering::Relaxed));
}

#[test]
fn not_cancelled_without_a_flag() {
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 2)]);
    let analysis = CancelOnVisit {
        lattice: UnionLattice::new(4),
        cancellation: Arc::new(AtomicBool::new(false)),
    };

    let facts = fixed_point(
        &analysis,
        &control_flow_graph,
        analysis.lattice().top(),
        &Options::new(),
    )
    .unwrap();

    assert_eq!(facts.fact_after(nop(2)).unwrap(), &analysis.lattice().singleton(1));
    assert_eq!(facts.total_visits(), 3);
}

#[test]
fn methods_fail_independently() {
    let widening = {
        let mut control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
        control_flow_graph
            .block_mut(1)
            .unwrap()
            .assume("UnreferencedCode");
        Method::new("Program.Loop", control_flow_graph)
    };
    let straight = Method::new("Program.Straight", nop_blocks(2, &[(0, 1)]));
    let methods = vec![widening, straight];

    let options = OptionsBuilder::new().iteration_budget(5).build();
    let results = parallel::analyze_methods(&methods, 2, |method| {
        let analysis = Widen {
            lattice: UnionLattice::new(usize::MAX),
            block: 1,
            limit: usize::MAX,
        };
        let top = analysis.lattice().top();
        fixed_point(&analysis, method.control_flow_graph(), top, &options)
            .map(|facts| facts.total_visits())
    });

    let error = results[0].as_ref().unwrap_err();
    assert!(error.is_contract_violation());
    assert!(matches!(error, Error::Method { method, .. } if method == "Program.Loop"));

    // The second method has no loop, so every point is visited once
    assert_eq!(*results[1].as_ref().unwrap(), 2);
}
