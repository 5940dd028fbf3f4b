//! A `Block` is a sequence of `Instruction` with one entry and one exit.

use crate::graph;
use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A basic block.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Block {
    /// The index of the block.
    index: usize,
    /// an internal counter for the next block-unique instruction.
    next_instruction_index: usize,
    /// The instructions for this block.
    instructions: Vec<Instruction>,
}

impl Block {
    pub(crate) fn new(index: usize) -> Block {
        Block {
            index,
            next_instruction_index: 0,
            instructions: Vec::new(),
        }
    }

    fn new_instruction_index(&mut self) -> usize {
        let instruction_index = self.next_instruction_index;
        self.next_instruction_index = instruction_index + 1;
        instruction_index
    }

    fn push(&mut self, operation: Operation) -> &mut Instruction {
        let index = self.new_instruction_index();
        self.instructions.push(Instruction::new(index, operation));
        // the vec is non-empty, we just pushed
        let last = self.instructions.len() - 1;
        &mut self.instructions[last]
    }

    /// Returns the index of this block
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if this block has no instructions
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns this block's instructions
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns an instruction by index
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions
            .iter()
            .find(|instruction| instruction.index() == index)
    }

    /// Returns the `ProgramPoint` where execution of this block begins
    pub fn first_point(&self) -> ProgramPoint {
        match self.instructions.first() {
            Some(instruction) => ProgramPoint::instruction(self.index, instruction.index()),
            None => ProgramPoint::empty_block(self.index),
        }
    }

    /// Returns the `ProgramPoint` where execution of this block ends
    pub fn last_point(&self) -> ProgramPoint {
        match self.instructions.last() {
            Some(instruction) => ProgramPoint::instruction(self.index, instruction.index()),
            None => ProgramPoint::empty_block(self.index),
        }
    }

    /// Returns every `ProgramPoint` in this block, in execution order
    pub fn points(&self) -> Vec<ProgramPoint> {
        if self.instructions.is_empty() {
            return vec![ProgramPoint::empty_block(self.index)];
        }
        self.instructions
            .iter()
            .map(|instruction| ProgramPoint::instruction(self.index, instruction.index()))
            .collect()
    }

    /// Adds an assign operation to the end of this block.
    pub fn assign(&mut self, dst: Local, src: Operand) -> &mut Instruction {
        self.push(Operation::assign(dst, src))
    }

    /// Adds a load operation to the end of this block.
    pub fn load(&mut self, dst: Local) -> &mut Instruction {
        self.push(Operation::load(dst))
    }

    /// Adds a call operation to the end of this block.
    pub fn call(
        &mut self,
        callee: MethodRef,
        args: Vec<Operand>,
        dst: Option<Local>,
    ) -> &mut Instruction {
        self.push(Operation::call(callee, args, dst))
    }

    /// Adds an assume operation to the end of this block.
    pub fn assume<S: Into<String>>(&mut self, capability: S) -> &mut Instruction {
        self.push(Operation::assume(capability))
    }

    /// Adds a return operation to the end of this block.
    pub fn ret(&mut self, value: Option<Operand>) -> &mut Instruction {
        self.push(Operation::ret(value))
    }

    /// Adds a nop operation to the end of this block.
    pub fn nop(&mut self) -> &mut Instruction {
        self.push(Operation::nop())
    }
}

impl graph::Vertex for Block {
    fn index(&self) -> usize {
        self.index
    }

    fn dot_label(&self) -> String {
        format!("{}", self)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[ Block: 0x{:X} ]", self.index)?;
        for instruction in self.instructions() {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
