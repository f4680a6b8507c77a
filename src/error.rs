// Error taxonomy of the network layer

use std::path::PathBuf;

use crate::domain::{SolutionStatus, SolverError};
use crate::network::NodeId;

/// Malformed or internally inconsistent network definition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Connection #{index} ({from} -> {to}) references unknown node '{missing}'")]
    UnknownNode {
        index: usize,
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("Invalid cost {value} for {subject}: costs must be finite and non-negative")]
    InvalidCost { subject: String, value: f64 },

    #[error("Unsupported file extension: \"{0}\"")]
    UnsupportedFormat(String),

    #[error("Malformed definition in '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Inconsistent solution data: {0}")]
    InconsistentSolution(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Well-formed problem without a usable assignment
    #[error("No solution ({status}): {message}")]
    NoSolution {
        status: SolutionStatus,
        message: String,
    },

    #[error(transparent)]
    Engine(#[from] SolverError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NetworkError {
    pub fn is_no_solution(&self) -> bool {
        matches!(self, NetworkError::NoSolution { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, NetworkError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
