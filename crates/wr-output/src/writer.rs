//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, TelemetryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write the rows of one trip, in path order.
    fn write_steps(&mut self, rows: &[TelemetryRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: a second call is a no-op.
    fn finish(&mut self) -> OutputResult<()>;
}
