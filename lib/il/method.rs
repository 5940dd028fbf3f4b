use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A method body, the unit of analysis.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Method {
    name: String,
    annotations: Vec<Annotation>,
    control_flow_graph: ControlFlowGraph,
}

impl Method {
    /// Create a new `Method`
    pub fn new<S: Into<String>>(name: S, control_flow_graph: ControlFlowGraph) -> Method {
        Method {
            name: name.into(),
            annotations: Vec::new(),
            control_flow_graph,
        }
    }

    /// Add an `Annotation` to this `Method`.
    pub fn with_annotation(mut self, annotation: Annotation) -> Method {
        self.annotations.push(annotation);
        self
    }

    /// Get the name of this `Method`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// If this method is itself annotated as requiring `capability`, get the
    /// message of that annotation.
    pub fn requires(&self, capability: &str) -> Option<&str> {
        requirements(&self.annotations)
            .find(|(required, _)| *required == capability)
            .map(|(_, message)| message)
    }

    /// Return the `ControlFlowGraph` for this `Method`.
    pub fn control_flow_graph(&self) -> &ControlFlowGraph {
        &self.control_flow_graph
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for annotation in &self.annotations {
            writeln!(f, "{}", annotation)?;
        }
        writeln!(f, "method {}", self.name)?;
        write!(f, "{}", self.control_flow_graph)
    }
}
