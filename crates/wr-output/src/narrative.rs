//! Human-readable trip printout.
//!
//! ```text
//! Origin: fortwayne, in
//! Departure: 03/14/2024 08:00
//! Starting Latitude: 41.08, Longitude: -85.14
//! fortwayne, in
//! ----> auburn, in --distance 21.00 miles --ETA: 03/14/2024 08:25 --Gallons required: 0.55 --Weather: fair
//!
//! City Attributes for the Shortest Path:
//! City                State               Distance            ...
//!
//! Shortest distance from fortwayne, in to auburn, in: 21.00, total gallons: 0.55
//! Straight-line distance: 19.37 miles
//! End Time: 03/14/2024 08:25
//! ```

use std::io::Write;

use wr_core::format_timestamp;
use wr_sim::{TripOutcome, TripReport};

use crate::row::{TelemetryRow, TELEMETRY_HEADER};
use crate::OutputResult;

const COLUMN_WIDTH: usize = 20;

/// Write the full printout for `outcome` to `out`.
pub fn write_narrative<W: Write>(out: &mut W, outcome: &TripOutcome) -> OutputResult<()> {
    match outcome {
        TripOutcome::NoPath { origin, destination } => {
            writeln!(out, "No path found from {origin} to {destination}")?;
        }
        TripOutcome::Arrived(report) => {
            write_steps(out, report)?;
            writeln!(out)?;
            write_table(out, report)?;
            writeln!(out)?;
            write_summary(out, report)?;
        }
    }
    Ok(())
}

/// The printout as a `String`.
pub fn render(outcome: &TripOutcome) -> OutputResult<String> {
    let mut buf = Vec::new();
    write_narrative(&mut buf, outcome)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_steps<W: Write>(out: &mut W, report: &TripReport) -> OutputResult<()> {
    writeln!(out, "Origin: {}", report.origin)?;
    writeln!(out, "Departure: {}", format_timestamp(report.departure))?;

    let Some((first, rest)) = report.steps.split_first() else {
        return Ok(());
    };
    if let Some(p) = first.location {
        writeln!(out, "Starting Latitude: {:.2}, Longitude: {:.2}", p.lat, p.lon)?;
    }
    writeln!(out, "{}", first.city)?;
    for step in rest {
        writeln!(
            out,
            "----> {} --distance {:.2} miles --ETA: {} --Gallons required: {:.2} --Weather: {}",
            step.city,
            step.distance,
            format_timestamp(step.arrival),
            step.gallons,
            step.weather,
        )?;
    }
    Ok(())
}

/// Fixed-width attribute table, one row per step.
fn write_table<W: Write>(out: &mut W, report: &TripReport) -> OutputResult<()> {
    writeln!(out, "City Attributes for the Shortest Path:")?;
    write_row(out, TELEMETRY_HEADER)?;
    for step in &report.steps {
        let row = TelemetryRow::from(step);
        let coord = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
        write_row(out, [
            row.city,
            row.state,
            format!("{:.2}", row.distance),
            format!("{:.2}", row.gallons),
            row.weather,
            coord(row.latitude),
            coord(row.longitude),
        ])?;
    }
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: [S; 7]) -> OutputResult<()> {
    let line: String = cells
        .iter()
        .map(|c| format!("{:<width$}", c.as_ref(), width = COLUMN_WIDTH))
        .collect();
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, report: &TripReport) -> OutputResult<()> {
    writeln!(
        out,
        "Shortest distance from {} to {}: {:.2}, total gallons: {:.2}",
        report.origin,
        report.destination,
        report.solver_distance.unwrap_or(report.total_distance),
        report.total_gallons,
    )?;

    let ends = report.steps.first().zip(report.steps.last());
    if let Some((Some(a), Some(b))) = ends.map(|(f, l)| (f.location, l.location)) {
        writeln!(out, "Straight-line distance: {:.2} miles", a.distance_miles(b))?;
    }

    writeln!(out, "End Time: {}", format_timestamp(report.arrival))?;
    Ok(())
}
