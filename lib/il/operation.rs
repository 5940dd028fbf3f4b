use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An IL Operation updates some state.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operation {
    /// Copy the operand `src` into the local `dst`.
    Assign { dst: Local, src: Operand },
    /// Place a value this method cannot see into `dst`.
    Load { dst: Local },
    /// Invoke `callee`, optionally placing its result into `dst`.
    Call {
        callee: MethodRef,
        args: Vec<Operand>,
        dst: Option<Local>,
    },
    /// Control only reaches this point when `capability` is available.
    Assume { capability: String },
    /// Leave the method.
    Return { value: Option<Operand> },
    /// Do nothing.
    Nop,
}

/// The kind of an `Operation`, used to key transfer function tables.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum OperationKind {
    Assign,
    Load,
    Call,
    Assume,
    Return,
    Nop,
}

impl Operation {
    /// Create a new `Operation::Assign`.
    pub fn assign(dst: Local, src: Operand) -> Operation {
        Operation::Assign { dst, src }
    }

    /// Create a new `Operation::Load`.
    pub fn load(dst: Local) -> Operation {
        Operation::Load { dst }
    }

    /// Create a new `Operation::Call`.
    pub fn call(callee: MethodRef, args: Vec<Operand>, dst: Option<Local>) -> Operation {
        Operation::Call { callee, args, dst }
    }

    /// Create a new `Operation::Assume`.
    pub fn assume<S: Into<String>>(capability: S) -> Operation {
        Operation::Assume {
            capability: capability.into(),
        }
    }

    /// Create a new `Operation::Return`.
    pub fn ret(value: Option<Operand>) -> Operation {
        Operation::Return { value }
    }

    /// Create a new `Operation::Nop`.
    pub fn nop() -> Operation {
        Operation::Nop
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Assign { .. } => OperationKind::Assign,
            Operation::Load { .. } => OperationKind::Load,
            Operation::Call { .. } => OperationKind::Call,
            Operation::Assume { .. } => OperationKind::Assume,
            Operation::Return { .. } => OperationKind::Return,
            Operation::Nop => OperationKind::Nop,
        }
    }

    /// Get the `Local` written by this `Operation`, if any.
    pub fn local_written(&self) -> Option<&Local> {
        match self {
            Operation::Assign { dst, .. } | Operation::Load { dst } => Some(dst),
            Operation::Call { dst, .. } => dst.as_ref(),
            Operation::Assume { .. } | Operation::Return { .. } | Operation::Nop => None,
        }
    }

    /// Get every `Local` read by this `Operation`.
    pub fn locals_read(&self) -> Vec<&Local> {
        match self {
            Operation::Assign { src, .. } => src.local().into_iter().collect(),
            Operation::Call { args, .. } => args.iter().filter_map(|arg| arg.local()).collect(),
            Operation::Return { value } => value.iter().filter_map(|v| v.local()).collect(),
            Operation::Load { .. } | Operation::Assume { .. } | Operation::Nop => Vec::new(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Assign { dst, src } => write!(f, "{} = {}", dst, src),
            Operation::Load { dst } => write!(f, "{} = load", dst),
            Operation::Call { callee, args, dst } => {
                if let Some(dst) = dst {
                    write!(f, "{} = ", dst)?;
                }
                let args = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "call {}({})", callee, args)
            }
            Operation::Assume { capability } => write!(f, "assume {}", capability),
            Operation::Return { value: Some(value) } => write!(f, "ret {}", value),
            Operation::Return { value: None } => write!(f, "ret"),
            Operation::Nop => write!(f, "nop"),
        }
    }
}
