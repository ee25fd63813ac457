//! CSV output backend.
//!
//! Writes one file with the header `City,State,Distance,Gallons,Weather,
//! Latitude,Longitude` and one record per trip step.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::row::{TelemetryRow, TELEMETRY_HEADER};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Writes trip telemetry as CSV.
pub struct CsvWriter<W: Write = File> {
    out:      Writer<W>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap any byte sink and write the header row.
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(TELEMETRY_HEADER)?;
        Ok(Self { out, finished: false })
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> OutputResult<W> {
        self.out
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_steps(&mut self, rows: &[TelemetryRow]) -> OutputResult<()> {
        for row in rows {
            self.out.write_record(row.fields())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
