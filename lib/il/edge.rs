//! An `Edge` is a direct edge between `Block` in `ControlFlowGraph`
//!
//! Edges carry no condition. A branch taken only when a capability check
//! succeeds is expressed with `Operation::Assume` at the head of the guarded
//! block.
//!
//! To create a new edge, call `ControlFlowGraph::unconditional_edge`.

use crate::graph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge between IL blocks
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Default)]
pub struct Edge {
    head: usize,
    tail: usize,
}

impl Edge {
    pub(crate) fn new(head: usize, tail: usize) -> Edge {
        Edge { head, tail }
    }

    /// Retrieve the index of the head `Vertex` for this `Edge`.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Retrieve the index of the tail `Vertex` for this `Edge`.
    pub fn tail(&self) -> usize {
        self.tail
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(0x{:X}->0x{:X})", self.head, self.tail)
    }
}

impl graph::Edge for Edge {
    fn head(&self) -> usize {
        self.head
    }

    fn tail(&self) -> usize {
        self.tail
    }

    fn dot_label(&self) -> String {
        String::new()
    }
}
