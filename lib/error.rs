use crate::il::ProgramPoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Analysis cancelled")]
    Cancelled,
    #[error("Control flow graph has no entry block")]
    ControlFlowGraphEntryNotFound,
    #[error("Control flow graph has no exit block")]
    ControlFlowGraphExitNotFound,
    #[error("{0}")]
    Custom(String),
    #[error("Graph edge not found: (0x{0:x}, 0x{1:x})")]
    GraphEdgeNotFound(usize, usize),
    #[error("Graph vertex not found: 0x{0:x}")]
    GraphVertexNotFound(usize),
    #[error("Iteration budget of {budget} visits exceeded at {point}")]
    IterationBudgetExceeded { point: ProgramPoint, budget: usize },
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Analysis of method {method} failed: {source}")]
    Method {
        method: String,
        #[source]
        source: Box<Error>,
    },
    #[error("Transfer function is not monotone at {0}")]
    NonMonotoneTransfer(ProgramPoint),
    #[error("Program point not found: {0}")]
    ProgramPointNotFound(ProgramPoint),
}

impl Error {
    /// Wrap this error with the name of the method whose analysis it aborted.
    pub fn in_method<S: Into<String>>(self, method: S) -> Error {
        Error::Method {
            method: method.into(),
            source: Box::new(self),
        }
    }

    /// Returns `true` if this error signals a bug in the engine or in a client
    /// analysis, as opposed to a problem with the program being analyzed.
    ///
    /// These errors abort the current method's analysis and are reported as
    /// internal errors, never as user-facing warnings.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Error::IterationBudgetExceeded { .. } | Error::NonMonotoneTransfer(_) => true,
            Error::Method { source, .. } => source.is_contract_violation(),
            _ => false,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Error {
        Error::Custom(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
