//! Find calls to methods which require a runtime capability, and decide
//! whether each call is safe.
//!
//! A method annotated `Requires { capability, .. }` only works when
//! `capability` is available at runtime, for example when unreferenced code
//! has not been trimmed away. A call to such a method is safe if every path
//! to it passes an `Assume` of the capability, or if the calling method
//! carries the same annotation, which moves the obligation to its own
//! callers.

use crate::analysis::{fixed_point, Options, TransferTable};
use crate::il::{Method, Operation, OperationKind, ProgramPoint};
use crate::lattice::{DeepCopy, DefiniteSet, IntersectionLattice};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a call to a capability-requiring method is guarded.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum UseStatus {
    /// The call can never execute.
    Unreachable,
    /// Every path to the call assumes the capability.
    Guarded,
    /// The calling method requires the capability itself.
    SuppressedByCaller,
    /// Some path reaches the call without the capability.
    Unguarded,
}

impl fmt::Display for UseStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UseStatus::Unreachable => write!(f, "unreachable"),
            UseStatus::Guarded => write!(f, "guarded"),
            UseStatus::SuppressedByCaller => write!(f, "suppressed by caller"),
            UseStatus::Unguarded => write!(f, "unguarded"),
        }
    }
}

/// One call to a method requiring one capability.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CapabilityUse {
    point: ProgramPoint,
    callee: String,
    capability: String,
    message: String,
    status: UseStatus,
}

impl CapabilityUse {
    /// The location of the call.
    pub fn point(&self) -> ProgramPoint {
        self.point
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// The message of the callee's annotation.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> UseStatus {
        self.status
    }

    /// Returns `true` if this use needs a warning, or must keep the code it
    /// depends on.
    pub fn is_unguarded(&self) -> bool {
        self.status == UseStatus::Unguarded
    }
}

impl fmt::Display for CapabilityUse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} call {} requires {}: {}",
            self.point, self.callee, self.capability, self.status
        )
    }
}

// The capabilities assumed on every path to a point.
fn assumed_capabilities() -> TransferTable<IntersectionLattice<String>> {
    TransferTable::new(IntersectionLattice::new()).with(
        OperationKind::Assume,
        |location, fact: &DefiniteSet<String>| match location.operation() {
            Some(Operation::Assume { capability }) => {
                Ok(IntersectionLattice::new().insert(fact, capability.clone()))
            }
            _ => Ok(fact.deep_copy()),
        },
    )
}

/// Classify every call in `method` to a method annotated `Requires`.
pub fn requires_capability(method: &Method, options: &Options) -> Result<Vec<CapabilityUse>, Error> {
    let control_flow_graph = method.control_flow_graph();
    let analysis = assumed_capabilities();

    // Nothing is assumed on entry.
    let initial = IntersectionLattice::new().empty();
    let facts = fixed_point::fixed_point_forward(&analysis, control_flow_graph, initial, options)?;

    let mut uses = Vec::new();
    for point in facts.points() {
        let callee = match control_flow_graph.point(*point)?.operation() {
            Some(Operation::Call { callee, .. }) => callee,
            _ => continue,
        };

        for (capability, message) in callee.requirements() {
            let status = if !facts.is_reachable(*point)? {
                UseStatus::Unreachable
            } else if method.requires(capability).is_some() {
                UseStatus::SuppressedByCaller
            } else if facts.fact_before(*point)?.contains(&capability.to_string()) {
                UseStatus::Guarded
            } else {
                UseStatus::Unguarded
            };

            trace!("{} in {}: {} {}", point, method.name(), callee, status);

            uses.push(CapabilityUse {
                point: *point,
                callee: callee.name().to_string(),
                capability: capability.to_string(),
                message: message.to_string(),
                status,
            });
        }
    }

    Ok(uses)
}
