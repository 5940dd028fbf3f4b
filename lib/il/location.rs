//! Locations within a `ControlFlowGraph`.
//!
//! `ProgramPoint` is an owned location, independent of any graph, and is what
//! facts are keyed by. `RefProgramPoint` is a `ProgramPoint` applied to a
//! `ControlFlowGraph`, giving access to the `Block` and `Instruction` it names.

use crate::il::*;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a `ControlFlowGraph` where a fact is tracked.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ProgramPoint {
    /// The instruction with index `instruction` in block `block`.
    Instruction { block: usize, instruction: usize },
    /// A block with no instructions.
    EmptyBlock { block: usize },
}

impl ProgramPoint {
    pub fn instruction(block: usize, instruction: usize) -> ProgramPoint {
        ProgramPoint::Instruction { block, instruction }
    }

    pub fn empty_block(block: usize) -> ProgramPoint {
        ProgramPoint::EmptyBlock { block }
    }

    /// The index of the `Block` this point lives in.
    pub fn block(&self) -> usize {
        match *self {
            ProgramPoint::Instruction { block, .. } | ProgramPoint::EmptyBlock { block } => block,
        }
    }

    /// Apply this `ProgramPoint` to a `ControlFlowGraph`.
    pub fn apply<'p>(
        &self,
        control_flow_graph: &'p ControlFlowGraph,
    ) -> Result<RefProgramPoint<'p>, Error> {
        let block = control_flow_graph.block(self.block())?;
        match *self {
            ProgramPoint::Instruction { instruction, .. } => {
                let instruction = block
                    .instruction(instruction)
                    .ok_or(Error::ProgramPointNotFound(*self))?;
                Ok(RefProgramPoint::new(block, Some(instruction)))
            }
            ProgramPoint::EmptyBlock { .. } => {
                if !block.is_empty() {
                    return Err(Error::ProgramPointNotFound(*self));
                }
                Ok(RefProgramPoint::new(block, None))
            }
        }
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ProgramPoint::Instruction { block, instruction } => {
                write!(f, "0x{:X}:{:02X}", block, instruction)
            }
            ProgramPoint::EmptyBlock { block } => write!(f, "0x{:X}:empty", block),
        }
    }
}

/// A `ProgramPoint` applied to a `ControlFlowGraph`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RefProgramPoint<'p> {
    block: &'p Block,
    instruction: Option<&'p Instruction>,
}

impl<'p> RefProgramPoint<'p> {
    pub(crate) fn new(block: &'p Block, instruction: Option<&'p Instruction>) -> RefProgramPoint<'p> {
        RefProgramPoint { block, instruction }
    }

    /// Get the owned `ProgramPoint` for this location.
    pub fn point(&self) -> ProgramPoint {
        match self.instruction {
            Some(instruction) => ProgramPoint::instruction(self.block.index(), instruction.index()),
            None => ProgramPoint::empty_block(self.block.index()),
        }
    }

    /// Get the `Block` this location is in.
    pub fn block(&self) -> &'p Block {
        self.block
    }

    /// If this location is an `Instruction`, get that `Instruction`.
    pub fn instruction(&self) -> Option<&'p Instruction> {
        self.instruction
    }

    /// If this location is an `Instruction`, get its `Operation`.
    pub fn operation(&self) -> Option<&'p Operation> {
        self.instruction.map(|instruction| instruction.operation())
    }
}

impl<'p> fmt::Display for RefProgramPoint<'p> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.instruction {
            Some(instruction) => write!(f, "0x{:X}:{}", self.block.index(), instruction),
            None => write!(f, "0x{:X}:empty", self.block.index()),
        }
    }
}
