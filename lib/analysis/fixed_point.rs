//! A worklist driver for monotone data-flow analyses.
//!
//! An analysis supplies a `Lattice` and a transfer function. The driver
//! tracks one fact before and one fact after every `ProgramPoint` of a
//! `ControlFlowGraph`, all starting at top, and applies the transfer function
//! until no fact changes.
//!
//! Each visit of a point meets the facts flowing into it, applies the
//! transfer function, and if the outgoing fact changed, queues every point
//! that depends on it. Facts only descend, and every lattice has finite
//! height, so the driver terminates. Two guards turn a broken analysis into
//! an error instead of a hang: a per-point iteration budget, and an optional
//! check that every updated fact lies below the fact it replaces.

use crate::analysis::{Direction, FactStore, Options};
use crate::graph::{Graph, NullEdge, NullVertex};
use crate::il::{ControlFlowGraph, ProgramPoint, RefProgramPoint};
use crate::lattice::{DeepCopy, Lattice, SemiLattice};
use crate::Error;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// The element type of an analysis' lattice.
pub type Fact<A> = <<A as FixedPointAnalysis>::Lattice as SemiLattice>::Element;

/// A data-flow analysis the driver can run.
pub trait FixedPointAnalysis {
    /// The lattice of facts for this analysis.
    type Lattice: Lattice;

    fn lattice(&self) -> &Self::Lattice;

    /// Given the fact flowing into `location`, compute the fact flowing out of
    /// it.
    ///
    /// For a forward analysis the incoming fact holds before `location`, and
    /// for a backward analysis it holds after. This function must be
    /// monotone: a lower incoming fact never yields a higher outgoing fact.
    fn trans(
        &self,
        location: RefProgramPoint,
        fact: &<Self::Lattice as SemiLattice>::Element,
    ) -> Result<<Self::Lattice as SemiLattice>::Element, Error>;
}

impl<'a, A: FixedPointAnalysis> FixedPointAnalysis for &'a A {
    type Lattice = A::Lattice;

    fn lattice(&self) -> &A::Lattice {
        (**self).lattice()
    }

    fn trans(&self, location: RefProgramPoint, fact: &Fact<A>) -> Result<Fact<A>, Error> {
        (**self).trans(location, fact)
    }
}

/// Every program point of a `ControlFlowGraph`, numbered densely, and the
/// graph of control flow between them.
struct PointGraph<'c> {
    points: Vec<ProgramPoint>,
    locations: Vec<RefProgramPoint<'c>>,
    indices: FxHashMap<ProgramPoint, usize>,
    graph: Graph<NullVertex, NullEdge>,
}

impl<'c> PointGraph<'c> {
    fn new(control_flow_graph: &'c ControlFlowGraph) -> Result<PointGraph<'c>, Error> {
        let points = control_flow_graph.points();

        let mut locations = Vec::with_capacity(points.len());
        let mut indices = FxHashMap::default();
        let mut graph = Graph::new();

        for (index, point) in points.iter().enumerate() {
            locations.push(point.apply(control_flow_graph)?);
            indices.insert(*point, index);
            graph.insert_vertex(NullVertex::new(index))?;
        }

        let index = |point: ProgramPoint| -> Result<usize, Error> {
            indices
                .get(&point)
                .copied()
                .ok_or(Error::ProgramPointNotFound(point))
        };

        // Edges between consecutive instructions of a block
        for block in control_flow_graph.blocks() {
            let block_points = block.points();
            for pair in block_points.windows(2) {
                graph.insert_edge(NullEdge::new(index(pair[0])?, index(pair[1])?))?;
            }
        }

        // Edges between blocks
        for edge in control_flow_graph.edges() {
            let head = control_flow_graph.block(edge.head())?.last_point();
            let tail = control_flow_graph.block(edge.tail())?.first_point();
            graph.insert_edge(NullEdge::new(index(head)?, index(tail)?))?;
        }

        Ok(PointGraph {
            points,
            locations,
            indices,
            graph,
        })
    }

    fn index(&self, point: ProgramPoint) -> Result<usize, Error> {
        self.indices
            .get(&point)
            .copied()
            .ok_or(Error::ProgramPointNotFound(point))
    }
}

/// Run `analysis` over `control_flow_graph` in the direction given by
/// `options`.
///
/// `initial` is the fact flowing into the initial point: the first point of
/// the entry block for a forward analysis, or the last point of the exit
/// block for a backward analysis.
pub fn fixed_point<A: FixedPointAnalysis>(
    analysis: A,
    control_flow_graph: &ControlFlowGraph,
    initial: Fact<A>,
    options: &Options,
) -> Result<FactStore<Fact<A>>, Error> {
    let initial_point = match options.direction() {
        Direction::Forward => control_flow_graph.entry_block()?.first_point(),
        Direction::Backward => control_flow_graph.exit_block()?.last_point(),
    };

    let point_graph = PointGraph::new(control_flow_graph)?;

    // Facts flow along the edges of flow_graph, whatever the direction.
    let reversed;
    let flow_graph = match options.direction() {
        Direction::Forward => &point_graph.graph,
        Direction::Backward => {
            reversed = point_graph.graph.reverse()?;
            &reversed
        }
    };

    let lattice = analysis.lattice();
    let initial_index = point_graph.index(initial_point)?;
    let num_points = point_graph.points.len();

    let mut incoming: Vec<Fact<A>> = (0..num_points).map(|_| lattice.top()).collect();
    let mut outgoing: Vec<Fact<A>> = (0..num_points).map(|_| lattice.top()).collect();
    let mut visits: Vec<usize> = vec![0; num_points];

    let mut queue: VecDeque<usize> = flow_graph
        .compute_reverse_post_order(initial_index)?
        .into_iter()
        .collect();
    let mut queued: FxHashSet<usize> = queue.iter().copied().collect();

    while let Some(index) = queue.pop_front() {
        if options.is_cancelled() {
            debug!("{} analysis cancelled", options.direction());
            return Err(Error::Cancelled);
        }

        queued.remove(&index);

        let point = point_graph.points[index];

        visits[index] += 1;
        if visits[index] > options.iteration_budget() {
            warn!(
                "{} visits at {}, iteration budget exceeded",
                visits[index], point
            );
            return Err(Error::IterationBudgetExceeded {
                point,
                budget: options.iteration_budget(),
            });
        }

        let fact_in = {
            let mut fact_in = if index == initial_index {
                initial.deep_copy()
            } else {
                lattice.top()
            };
            for dependency in flow_graph.predecessor_indices(index)? {
                fact_in = lattice.meet(&fact_in, &outgoing[dependency]);
            }
            fact_in
        };

        let fact_out = analysis.trans(point_graph.locations[index], &fact_in)?;

        trace!("visit {} at {}: {:?} -> {:?}", visits[index], point, fact_in, fact_out);

        incoming[index] = fact_in;

        if fact_out == outgoing[index] {
            continue;
        }

        if options.verify_monotonicity() && !lattice.less_or_equal(&fact_out, &outgoing[index]) {
            warn!(
                "fact at {} rose from {:?} to {:?}",
                point, outgoing[index], fact_out
            );
            return Err(Error::NonMonotoneTransfer(point));
        }

        outgoing[index] = fact_out;

        for dependent in flow_graph.successor_indices(index)? {
            if queued.insert(dependent) {
                queue.push_back(dependent);
            }
        }
    }

    let total_visits: usize = visits.iter().sum();
    debug!(
        "{} analysis converged over {} points after {} visits",
        options.direction(),
        num_points,
        total_visits
    );

    let (before, after) = match options.direction() {
        Direction::Forward => (incoming, outgoing),
        Direction::Backward => (outgoing, incoming),
    };

    Ok(FactStore::new(
        options.direction(),
        point_graph.points,
        before,
        after,
        visits,
    ))
}

/// Run `analysis` forward from the entry of `control_flow_graph`, whatever
/// the direction in `options`.
pub fn fixed_point_forward<A: FixedPointAnalysis>(
    analysis: A,
    control_flow_graph: &ControlFlowGraph,
    initial: Fact<A>,
    options: &Options,
) -> Result<FactStore<Fact<A>>, Error> {
    let mut options = options.clone();
    options.set_direction(Direction::Forward);
    fixed_point(analysis, control_flow_graph, initial, &options)
}

/// Run `analysis` backward from the exit of `control_flow_graph`, whatever
/// the direction in `options`.
pub fn fixed_point_backward<A: FixedPointAnalysis>(
    analysis: A,
    control_flow_graph: &ControlFlowGraph,
    initial: Fact<A>,
    options: &Options,
) -> Result<FactStore<Fact<A>>, Error> {
    let mut options = options.clone();
    options.set_direction(Direction::Backward);
    fixed_point(analysis, control_flow_graph, initial, &options)
}
