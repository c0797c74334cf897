//! Error types for the retrace crate

use crate::identifiers::NodeHandle;
use thiserror::Error;

/// Main error type for the retrace crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("tree already has a root")]
    RootAlreadyExists,

    #[error("tree has no root; create one before stepping")]
    MissingRoot,

    #[error("node handle {index} is out of range (tree holds {len} nodes)")]
    InvalidHandle { index: usize, len: usize },

    #[error("node {handle} has no computed value where one is required")]
    MissingValue { handle: NodeHandle },

    #[error("node {handle} was reached for propagation before being expanded")]
    UndeterminedNode { handle: NodeHandle },

    #[error("tree structure is empty")]
    EmptyStructure,

    #[error("layer {layer} lists {got} degree(s) but the layer above produced {expected} node(s)")]
    LayerShape {
        layer: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid degree '{token}' in layer {layer} (expected a positive integer)")]
    InvalidDegree { layer: usize, token: String },

    #[error("expected {expected} leaf value(s), got {got}")]
    LeafCount { expected: usize, got: usize },

    #[error("invalid leaf value '{token}'")]
    InvalidLeafValue { token: String },

    #[error("no heuristic value for node '{name}'")]
    MissingHeuristic { name: String },

    #[error("edge cost {value} on node '{name}' must be finite and non-negative")]
    InvalidEdgeCost { name: String, value: f64 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
