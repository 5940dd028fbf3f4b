use crate::lattice::DeepCopy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A method-local storage slot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Local {
    index: usize,
}

impl Local {
    pub fn new(index: usize) -> Local {
        Local { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl DeepCopy for Local {}

impl fmt::Display for Local {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "loc{}", self.index)
    }
}

/// A value read by an `Operation`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operand {
    Local(Local),
    /// A string literal.
    Str(String),
    /// A type token, i.e. `typeof(T)`.
    Type(String),
    Null,
}

impl Operand {
    /// If this operand reads a `Local`, get that `Local`.
    pub fn local(&self) -> Option<&Local> {
        match self {
            Operand::Local(local) => Some(local),
            Operand::Str(_) | Operand::Type(_) | Operand::Null => None,
        }
    }
}

impl From<Local> for Operand {
    fn from(local: Local) -> Operand {
        Operand::Local(local)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Local(local) => local.fmt(f),
            Operand::Str(value) => write!(f, "{:?}", value),
            Operand::Type(type_name) => write!(f, "typeof({})", type_name),
            Operand::Null => write!(f, "null"),
        }
    }
}
