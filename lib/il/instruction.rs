use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An `Instruction` represents location, and non-semantical information about
/// an `Operation`.
///
/// An `instruction` gives location to an `Operation`.
///
/// Methods are provided to create `Instruction` by calling equivalent methods
/// on `Block`, so you should never need to create an `Instruction` directly.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Instruction {
    operation: Operation,
    index: usize,
}

impl Instruction {
    /// Create a new instruction with the given index and operation.
    pub(crate) fn new(index: usize, operation: Operation) -> Instruction {
        Instruction { operation, index }
    }

    /// Get the `Operation` for this `Instruction`
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Get the `OperationKind` for this `Instruction`
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Get the index for this `Instruction`.
    ///
    /// An `Instruction` index is assigned by its parent `Block` and uniquely
    /// identifies the `Instruction` within the `Block`.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02X} {}", self.index, self.operation)
    }
}
