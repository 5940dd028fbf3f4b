//! End-to-end tests of the fixed-point driver over small control flow
//! graphs.

use crate::analysis::*;
use crate::il::*;
use crate::lattice::*;
use crate::Error;
use std::collections::BTreeMap;
use test_log::test;

mod guards;

type ConstantFact = Maybe<Constant<i64>>;

/// Sets the fact to a constant in some blocks, and passes it through
/// everywhere else.
struct BlockConstants {
    lattice: MaybeLattice<ConstantLattice<i64>>,
    constants: BTreeMap<usize, i64>,
}

impl BlockConstants {
    fn new<I: IntoIterator<Item = (usize, i64)>>(constants: I) -> BlockConstants {
        BlockConstants {
            lattice: MaybeLattice::new(ConstantLattice::new()),
            constants: constants.into_iter().collect(),
        }
    }
}

impl FixedPointAnalysis for BlockConstants {
    type Lattice = MaybeLattice<ConstantLattice<i64>>;

    fn lattice(&self) -> &Self::Lattice {
        &self.lattice
    }

    fn trans(&self, location: RefProgramPoint, fact: &ConstantFact) -> Result<ConstantFact, Error> {
        Ok(match self.constants.get(&location.block().index()) {
            Some(constant) => Maybe::present(Constant::Value(*constant)),
            None => fact.deep_copy(),
        })
    }
}

/// Widens a set by one element per visit of `block`, until it holds `limit`
/// elements.
struct Widen {
    lattice: UnionLattice<usize>,
    block: usize,
    limit: usize,
}

impl FixedPointAnalysis for Widen {
    type Lattice = UnionLattice<usize>;

    fn lattice(&self) -> &UnionLattice<usize> {
        &self.lattice
    }

    fn trans(&self, location: RefProgramPoint, fact: &ValueSet<usize>) -> Result<ValueSet<usize>, Error> {
        if location.block().index() != self.block {
            return Ok(fact.deep_copy());
        }
        Ok(match fact.values() {
            Some(values) if values.len() < self.limit => self.lattice.insert(fact, values.len()),
            _ => fact.deep_copy(),
        })
    }
}

/// A control flow graph of `count` blocks holding one `nop` each, and an edge for every
/// pair in `edges`. The first block is the entry, and the last is the exit.
fn nop_blocks(count: usize, edges: &[(usize, usize)]) -> ControlFlowGraph {
    let mut control_flow_graph = ControlFlowGraph::new();
    for _ in 0..count {
        control_flow_graph.new_block().unwrap().nop();
    }
    for (head, tail) in edges {
        control_flow_graph.unconditional_edge(*head, *tail).unwrap();
    }
    control_flow_graph.set_entry(0).unwrap();
    control_flow_graph.set_exit(count - 1).unwrap();
    control_flow_graph
}

fn nop(block: usize) -> ProgramPoint {
    ProgramPoint::instruction(block, 0)
}

/// The points whose facts flow directly into `point` in a forward analysis.
fn predecessor_points(control_flow_graph: &ControlFlowGraph, point: ProgramPoint) -> Vec<ProgramPoint> {
    let block = control_flow_graph.block(point.block()).unwrap();
    if block.first_point() != point {
        let points = block.points();
        let position = points.iter().position(|p| *p == point).unwrap();
        return vec![points[position - 1]];
    }
    control_flow_graph
        .predecessor_indices(point.block())
        .unwrap()
        .into_iter()
        .map(|predecessor| control_flow_graph.block(predecessor).unwrap().last_point())
        .collect()
}

/// Check that applying every transfer function once more changes nothing.
fn assert_forward_fixed_point<A: FixedPointAnalysis>(
    analysis: &A,
    control_flow_graph: &ControlFlowGraph,
    initial: &Fact<A>,
    facts: &FactStore<Fact<A>>,
) {
    let lattice = analysis.lattice();
    let entry = control_flow_graph.entry_block().unwrap().first_point();

    for point in facts.points() {
        if !facts.is_reachable(*point).unwrap() {
            continue;
        }
        let mut incoming = if *point == entry {
            initial.clone()
        } else {
            lattice.top()
        };
        for predecessor in predecessor_points(control_flow_graph, *point) {
            incoming = lattice.meet(&incoming, facts.fact_after(predecessor).unwrap());
        }
        assert_eq!(&incoming, facts.fact_before(*point).unwrap(), "before {}", point);

        let location = control_flow_graph.point(*point).unwrap();
        let outgoing = analysis.trans(location, &incoming).unwrap();
        assert_eq!(&outgoing, facts.fact_after(*point).unwrap(), "after {}", point);
    }
}

#[test]
fn straight_line_propagation() {
    // A -> B -> C
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 2)]);
    let analysis = BlockConstants::new([]);
    let one = Maybe::present(Constant::Value(1));

    let facts = fixed_point(&analysis, &control_flow_graph, one.clone(), &Options::new()).unwrap();

    for block in 0..3 {
        assert_eq!(facts.fact_after(nop(block)).unwrap(), &one);
    }
    assert_forward_fixed_point(&analysis, &control_flow_graph, &one, &facts);
}

#[test]
fn join_at_merge_point() {
    // E -> A, E -> B, A -> C, B -> C
    let control_flow_graph = nop_blocks(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let analysis = BlockConstants::new([(1, 1), (2, 2)]);

    let facts = fixed_point(&analysis, &control_flow_graph, Maybe::absent(), &Options::new()).unwrap();

    assert_eq!(facts.fact_after(nop(1)).unwrap(), &Maybe::present(Constant::Value(1)));
    assert_eq!(facts.fact_after(nop(2)).unwrap(), &Maybe::present(Constant::Value(2)));
    assert_eq!(facts.fact_before(nop(3)).unwrap(), &Maybe::present(Constant::Unknown));
    assert_forward_fixed_point(&analysis, &control_flow_graph, &Maybe::absent(), &facts);
}

#[test]
fn join_of_agreeing_paths() {
    let control_flow_graph = nop_blocks(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let analysis = BlockConstants::new([(1, 7), (2, 7)]);

    let facts = fixed_point(&analysis, &control_flow_graph, Maybe::absent(), &Options::new()).unwrap();

    assert_eq!(facts.fact_before(nop(3)).unwrap(), &Maybe::present(Constant::Value(7)));
}

#[test]
fn loop_convergence() {
    // A -> B, B -> B, B -> C
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
    let bound = 3;
    let analysis = Widen {
        lattice: UnionLattice::new(bound),
        block: 1,
        limit: bound,
    };
    let top = analysis.lattice().top();

    let facts = fixed_point(&analysis, &control_flow_graph, top.clone(), &Options::new()).unwrap();

    let after = facts.fact_after(nop(1)).unwrap();
    assert_eq!(after.values().map(|values| values.len()), Some(bound));
    assert_eq!(facts.fact_before(nop(2)).unwrap(), after);
    assert!(facts.visits(nop(1)).unwrap() <= bound + 1);
    assert_forward_fixed_point(&analysis, &control_flow_graph, &top, &facts);
}

#[test]
fn loop_collapses_past_cardinality_bound() {
    let control_flow_graph = nop_blocks(3, &[(0, 1), (1, 1), (1, 2)]);
    let analysis = Widen {
        lattice: UnionLattice::new(3),
        block: 1,
        limit: 100,
    };
    let top = analysis.lattice().top();

    let facts = fixed_point(&analysis, &control_flow_graph, top.clone(), &Options::new()).unwrap();

    assert!(facts.fact_after(nop(1)).unwrap().is_unknown());
    assert!(facts.fact_before(nop(2)).unwrap().is_unknown());
    assert_forward_fixed_point(&analysis, &control_flow_graph, &top, &facts);
}

#[test]
fn nested_loops_terminate_and_are_stable() {
    //   0 -> 1 -> 2 -> 3 -> 4
    //        ^    |    |
    //        |    v    |
    //        +--- 5 <--+
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (2, 5), (3, 5), (5, 1)];
    let control_flow_graph = nop_blocks(6, &edges);
    let analysis = Widen {
        lattice: UnionLattice::new(4),
        block: 5,
        limit: 4,
    };
    let top = analysis.lattice().top();

    let first = fixed_point(&analysis, &control_flow_graph, top.clone(), &Options::new()).unwrap();
    let second = fixed_point(&analysis, &control_flow_graph, top.clone(), &Options::new()).unwrap();

    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        second.iter().collect::<Vec<_>>()
    );
    assert_eq!(
        first.fact_after(nop(4)).unwrap(),
        &analysis.lattice().from_values(0..4)
    );
    assert_forward_fixed_point(&analysis, &control_flow_graph, &top, &first);
}

/// Live locals: a local is live before a point if some path from that point
/// reads it before writing it.
struct LiveLocals {
    lattice: UnionLattice<Local>,
}

impl FixedPointAnalysis for LiveLocals {
    type Lattice = UnionLattice<Local>;

    fn lattice(&self) -> &UnionLattice<Local> {
        &self.lattice
    }

    fn trans(&self, location: RefProgramPoint, fact: &ValueSet<Local>) -> Result<ValueSet<Local>, Error> {
        let (operation, values) = match (location.operation(), fact.values()) {
            (Some(operation), Some(values)) => (operation, values),
            _ => return Ok(fact.deep_copy()),
        };
        let mut live = values.deep_copy();
        if let Some(written) = operation.local_written() {
            live.remove(written);
        }
        live.extend(operation.locals_read().into_iter().copied());
        Ok(self.lattice.from_values(live))
    }
}

#[test]
fn backward_analysis() {
    /*
    0:
        loc0 = "Run"
        loc1 = load
    1:
        call Invoke(loc0)
        ret loc2
    */
    let mut control_flow_graph = ControlFlowGraph::new();
    let head = {
        let block = control_flow_graph.new_block().unwrap();
        block.assign(local(0), operand_str("Run"));
        block.load(local(1));
        block.index()
    };
    let tail = {
        let block = control_flow_graph.new_block().unwrap();
        block.call(MethodRef::new("Invoke"), vec![operand_local(0)], None);
        block.ret(Some(operand_local(2)));
        block.index()
    };
    control_flow_graph.unconditional_edge(head, tail).unwrap();
    control_flow_graph.set_entry(head).unwrap();
    control_flow_graph.set_exit(tail).unwrap();

    let analysis = LiveLocals {
        lattice: UnionLattice::new(16),
    };
    let sets = analysis.lattice();
    let options = OptionsBuilder::new().direction(Direction::Backward).build();

    let facts = fixed_point(&analysis, &control_flow_graph, sets.top(), &options).unwrap();

    assert_eq!(facts.direction(), Direction::Backward);
    assert_eq!(
        facts.fact_after(ProgramPoint::instruction(tail, 1)).unwrap(),
        &sets.top()
    );
    assert_eq!(
        facts.fact_before(ProgramPoint::instruction(tail, 1)).unwrap(),
        &sets.singleton(local(2))
    );
    assert_eq!(
        facts.fact_before(ProgramPoint::instruction(tail, 0)).unwrap(),
        &sets.from_values([local(0), local(2)])
    );
    assert_eq!(
        facts.fact_after(ProgramPoint::instruction(head, 1)).unwrap(),
        &sets.from_values([local(0), local(2)])
    );
    assert_eq!(
        facts.fact_before(ProgramPoint::instruction(head, 0)).unwrap(),
        &sets.singleton(local(2))
    );

    // The same analysis through the backward entry point, whatever the
    // direction in the options.
    let again =
        fixed_point_backward(&analysis, &control_flow_graph, sets.top(), &Options::new()).unwrap();
    assert_eq!(again.iter().collect::<Vec<_>>(), facts.iter().collect::<Vec<_>>());
}

#[test]
fn facts_dump_to_json() {
    let control_flow_graph = nop_blocks(2, &[(0, 1)]);
    let analysis = BlockConstants::new([(0, 42)]);

    let facts = fixed_point(&analysis, &control_flow_graph, Maybe::absent(), &Options::new()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&facts.to_json().unwrap()).unwrap();

    assert_eq!(json["facts"][1]["before"], serde_json::json!({ "Value": 42 }));
}
