use thiserror::Error;

use wr_core::{City, CoreError};
use wr_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("trip configuration error: {0}")]
    Config(String),

    #[error("cannot simulate an empty path")]
    EmptyPath,

    /// Consecutive path cities with no road between them.  Only a corrupt
    /// predecessor map can produce this.
    #[error("path invariant violated: no road from {from} to {to}")]
    BrokenPath { from: City, to: City },

    /// A leg too long for the clock (e.g. a near-zero road speed).
    #[error("clock error: {0}")]
    ClockOverflow(#[from] CoreError),

    #[error("routing error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
