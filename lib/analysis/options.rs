use serde::{Deserialize, Serialize};
use std::default;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The direction facts flow through a `ControlFlowGraph`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    /// Facts flow from the entry, along edges. The fact before a point is
    /// the meet of the facts after its predecessors.
    Forward,
    /// Facts flow from the exit, against edges. The fact after a point is
    /// the meet of the facts before its successors.
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Options which change the behavior of the fixed-point driver and of the
/// analyses built on it.
#[derive(Clone, Debug)]
pub struct Options {
    direction: Direction,
    iteration_budget: usize,
    set_cardinality_bound: usize,
    verify_monotonicity: bool,
    cancellation: Option<Arc<AtomicBool>>,
}

impl Options {
    /// Create a new set of Options with the default settings.
    pub fn new() -> Options {
        Options::default()
    }

    /// The direction `fixed_point` runs in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// The number of times any single program point may be visited before
    /// the driver gives up with `Error::IterationBudgetExceeded`.
    ///
    /// With finite-height lattices and monotone transfer functions this is
    /// never reached. Hitting it means a transfer function or a lattice is
    /// broken.
    pub fn iteration_budget(&self) -> usize {
        self.iteration_budget
    }

    pub fn set_iteration_budget(&mut self, iteration_budget: usize) {
        self.iteration_budget = iteration_budget;
    }

    /// The number of values a bounded set may hold before it collapses to
    /// unknown. Read by analyses when they build their `UnionLattice`.
    pub fn set_cardinality_bound(&self) -> usize {
        self.set_cardinality_bound
    }

    pub fn set_set_cardinality_bound(&mut self, set_cardinality_bound: usize) {
        self.set_cardinality_bound = set_cardinality_bound;
    }

    /// Whether the driver checks that every updated fact only descends.
    pub fn verify_monotonicity(&self) -> bool {
        self.verify_monotonicity
    }

    pub fn set_verify_monotonicity(&mut self, verify_monotonicity: bool) {
        self.verify_monotonicity = verify_monotonicity;
    }

    /// A flag which, once set, aborts the analysis with `Error::Cancelled`.
    pub fn set_cancellation(&mut self, cancellation: Arc<AtomicBool>) {
        self.cancellation = Some(cancellation);
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|cancellation| cancellation.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

impl default::Default for Options {
    fn default() -> Options {
        Options {
            direction: Direction::Forward,
            iteration_budget: 1024,
            set_cardinality_bound: 16,
            verify_monotonicity: true,
            cancellation: None,
        }
    }
}

/// Create your options with the builder pattern.
///
/// For more details on the options, see `analysis::Options`
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Create a new builder for analysis options.
    pub fn new() -> OptionsBuilder {
        OptionsBuilder {
            options: Options::default(),
        }
    }

    /// Set the direction. By default this is `Direction::Forward`.
    pub fn direction(mut self, direction: Direction) -> OptionsBuilder {
        self.options.direction = direction;
        self
    }

    /// Set the per-point iteration budget. By default this is 1024.
    pub fn iteration_budget(mut self, iteration_budget: usize) -> OptionsBuilder {
        self.options.iteration_budget = iteration_budget;
        self
    }

    /// Set the set cardinality bound. By default this is 16.
    pub fn set_cardinality_bound(mut self, set_cardinality_bound: usize) -> OptionsBuilder {
        self.options.set_cardinality_bound = set_cardinality_bound;
        self
    }

    /// Set the, "Verify monotonicity," option. By default this is true.
    pub fn verify_monotonicity(mut self, verify_monotonicity: bool) -> OptionsBuilder {
        self.options.verify_monotonicity = verify_monotonicity;
        self
    }

    pub fn cancellation(mut self, cancellation: Arc<AtomicBool>) -> OptionsBuilder {
        self.options.cancellation = Some(cancellation);
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}

impl default::Default for OptionsBuilder {
    fn default() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}
