//! `TelemetryRecorder`: collects `TripStep`s as `TelemetryRow`s.

use wr_sim::{TripObserver, TripStep};

use crate::row::{TelemetryRow, TELEMETRY_HEADER};
use crate::writer::OutputWriter;
use crate::OutputResult;

/// A [`TripObserver`] that appends one [`TelemetryRow`] per trip step.
///
/// Pure accumulation: nothing is written until [`write_to`][Self::write_to].
/// One recorder may observe several trips; rows are appended in order.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    rows: Vec<TelemetryRow>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TelemetryRow] {
        &self.rows
    }

    pub fn header(&self) -> &'static [&'static str] {
        &TELEMETRY_HEADER
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<TelemetryRow> {
        self.rows
    }

    /// Hand every recorded row to `writer`, then finish it.
    pub fn write_to<W: OutputWriter>(&self, writer: &mut W) -> OutputResult<()> {
        writer.write_steps(&self.rows)?;
        writer.finish()
    }
}

impl TripObserver for TelemetryRecorder {
    fn on_step(&mut self, step: &TripStep) {
        self.rows.push(TelemetryRow::from(step));
    }
}
