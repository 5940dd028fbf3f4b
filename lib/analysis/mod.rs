//! Data-flow analysis over IL methods.
//!
//! `fixed_point` runs any `FixedPointAnalysis` to convergence and produces a
//! `FactStore`. The remaining modules are analyses built on it, and a runner
//! which analyzes many methods in parallel.

mod fact_store;
pub mod fixed_point;
mod options;
pub mod parallel;
mod reflection_targets;
mod requires_capability;
mod transfer;

pub use self::fact_store::FactStore;
pub use self::fixed_point::{
    fixed_point, fixed_point_backward, fixed_point_forward, Fact, FixedPointAnalysis,
};
pub use self::options::{Direction, Options, OptionsBuilder};
pub use self::reflection_targets::{reflection_targets, ReflectionSite, Resolution, SymbolicValue};
pub use self::requires_capability::{requires_capability, CapabilityUse, UseStatus};
pub use self::transfer::TransferTable;
