//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a core
//! operation (timestamp parsing, city parsing) can fail inside them.

use thiserror::Error;

/// The error type for `wr-core` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid timestamp {input:?}: expected MM/DD/YYYY HH:MM")]
    Timestamp { input: String },

    #[error("invalid city {0:?}: expected \"name,state\"")]
    City(String),

    #[error("invalid coordinate {0:?}: expected \"lat,lon\"")]
    Coordinate(String),

    #[error("travel time of {hours} h overflows the clock")]
    ClockOverflow { hours: f64 },
}

/// Shorthand result type for `wr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
