//! The intermediate language consumed by `ilflow` analyses.
//!
//! This is a deliberately small IL: just enough structure for the fixed-point
//! engine to walk a method body, and for the bundled client analyses to
//! recognize the operations that matter when deciding what can be trimmed.
//!
//! # Components of the IL
//!
//! ## `Local` and `Operand`
//!
//! A `Local` is a method-local storage slot. An `Operand` is what an
//! `Operation` reads: a `Local`, a string literal, a type token, or `null`.
//!
//! ## `Operation`
//!
//! * `Assign`: copies an `Operand` into a `Local`.
//! * `Load`: places a value the method cannot see into a `Local` (a field, a
//! parameter, the heap).
//! * `Call`: invokes a `MethodRef`. The callee carries the `Annotation`s the
//! analyses care about.
//! * `Assume`: control only reaches this point when a runtime check for a
//! capability succeeded. Guarded branches are lowered to an `Assume` at the
//! head of the guarded block.
//! * `Return`: leaves the method.
//! * `Nop`: does nothing, but still has a location.
//!
//! ## `Instruction`, `Block`, `Edge`, `ControlFlowGraph`
//!
//! An `Instruction` gives an `Operation` a position in a `Block`. Blocks are
//! joined by `Edge`s in a `ControlFlowGraph`, which may contain cycles. You
//! should not create an `Instruction` explicitly, but instead call the methods
//! over `Block` for the `Operation` you wish to emit.
//!
//! ## `ProgramPoint`
//!
//! Every `Instruction`, and every `Block` with no instructions, is a
//! `ProgramPoint`. Facts computed by the fixed-point engine are keyed by
//! `ProgramPoint`.

mod annotation;
mod block;
mod control_flow_graph;
mod edge;
mod instruction;
mod local;
mod location;
mod method;
mod operation;

pub use self::annotation::*;
pub use self::block::*;
pub use self::control_flow_graph::*;
pub use self::edge::*;
pub use self::instruction::*;
pub use self::local::*;
pub use self::location::*;
pub use self::method::*;
pub use self::operation::*;

/// A convenience function to create a new `Local`.
pub fn local(index: usize) -> Local {
    Local::new(index)
}

/// A convenience function to create an `Operand` reading a `Local`.
pub fn operand_local(index: usize) -> Operand {
    Operand::Local(Local::new(index))
}

/// A convenience function to create a string literal `Operand`.
pub fn operand_str<S: Into<String>>(value: S) -> Operand {
    Operand::Str(value.into())
}

/// A convenience function to create a type token `Operand`.
pub fn operand_type<S: Into<String>>(type_name: S) -> Operand {
    Operand::Type(type_name.into())
}
