//! `wr-output` — trip telemetry and report writers.
//!
//! Two backends are provided, one behind a Cargo feature:
//!
//! | Feature   | Backend | Output                                        |
//! |-----------|---------|-----------------------------------------------|
//! | *(none)*  | CSV     | one file, header `City,State,Distance,...`    |
//! | `sqlite`  | SQLite  | `trip_steps` table                            |
//!
//! Both implement [`OutputWriter`] and are fed by [`TelemetryRecorder`],
//! which implements `wr_sim::TripObserver`.  The human-readable printout
//! lives in [`narrative`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use wr_output::{CsvWriter, TelemetryRecorder};
//!
//! let mut recorder = TelemetryRecorder::new();
//! let outcome = planner.plan(&query, &mut recorder)?;
//! recorder.write_to(&mut CsvWriter::new(Path::new("trip.csv"))?)?;
//! print!("{}", wr_output::narrative::render(&outcome)?);
//! ```

pub mod csv;
pub mod error;
pub mod narrative;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::TelemetryRecorder;
pub use row::{TelemetryRow, TELEMETRY_HEADER};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
