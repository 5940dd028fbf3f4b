//! Ilflow: lattices and monotone data-flow analysis over IL methods.
//!
//! Ilflow is the analysis core of a trimming tool. It decides which code
//! guarded by a runtime capability is safe, and which members a reflection
//! call may name, by running data-flow analyses to a fixed point.
//!
//! * [`lattice`] holds the algebra of facts: the `Lattice` traits and the
//! combinators which build large lattices from small ones.
//! * [`il`] is the program representation analyses run over: methods, their
//! control flow graphs, and the program points facts are tracked at.
//! * [`analysis`] holds the fixed-point driver, the `FactStore` it produces,
//! and the analyses built on it.
//!
//! ```
//! use ilflow::analysis::{self, Options};
//! use ilflow::il;
//!
//! # fn main() -> Result<(), ilflow::Error> {
//! let mut control_flow_graph = il::ControlFlowGraph::new();
//! let index = {
//!     let block = control_flow_graph.new_block()?;
//!     block.assume("UnreferencedCode");
//!     block.call(
//!         il::MethodRef::new("Assembly.GetTypes").with_annotation(il::Annotation::Requires {
//!             capability: "UnreferencedCode".to_string(),
//!             message: "Types might be removed".to_string(),
//!         }),
//!         vec![],
//!         None,
//!     );
//!     block.index()
//! };
//! control_flow_graph.set_entry(index)?;
//!
//! let method = il::Method::new("Program.Main", control_flow_graph);
//! let uses = analysis::requires_capability(&method, &Options::new())?;
//! assert!(uses.iter().all(|u| !u.is_unguarded()));
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod analysis;
mod error;
pub mod graph;
pub mod il;
pub mod lattice;

#[cfg(test)]
mod tests;

pub use error::Error;
