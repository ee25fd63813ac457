//! Spatial-subsystem error type.

use thiserror::Error;

use wr_core::NodeId;

/// Errors produced by `wr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("malformed route record: {0}")]
    MalformedRecord(String),

    #[error("graph contains a negative-weight cycle reachable from {origin}")]
    NegativeCycle { origin: NodeId },

    #[error("graph has negative edge weights; use the Bellman-Ford solver")]
    NegativeWeight,

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
