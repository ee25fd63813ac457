//! CSV route loader.
//!
//! # CSV format
//!
//! One row per road segment, header row required (and skipped):
//!
//! ```csv
//! state_origin,state_destination,city_origin,city_destination,distance,speed,toll,lanes,gradient
//! IN,IN,Fort Wayne,Auburn,21.4,60,0,4,0.012
//! IN,,Auburn,Angola,25.0,55,0,2,-0.004
//! ```
//!
//! Only columns 0–5 and the gradient column (index 8) are read; anything in
//! between or after is ignored.  An empty state is inherited from the other
//! endpoint (see [`RoadGraphBuilder::add_edge`]).
//!
//! Short rows, unparsable numbers and values the graph rejects are logged
//! and skipped, never fatal.  Only I/O failures abort the load.

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use wr_core::City;

use crate::network::RoadGraphBuilder;
use crate::SpatialResult;

const COL_STATE_ORIGIN: usize = 0;
const COL_STATE_DEST:   usize = 1;
const COL_CITY_ORIGIN:  usize = 2;
const COL_CITY_DEST:    usize = 3;
const COL_DISTANCE:     usize = 4;
const COL_SPEED:        usize = 5;
const COL_GRADIENT:     usize = 8;

/// Outcome counts of one route load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteLoadStats {
    /// Data rows seen (header excluded).
    pub rows:       usize,
    /// Rows that added a new road.
    pub loaded:     usize,
    /// Valid rows for a road that already existed.
    pub duplicates: usize,
    /// Rows dropped as malformed.
    pub skipped:    usize,
}

/// Load routes from a CSV file into `builder`.
pub fn load_routes_csv(path: &Path, builder: &mut RoadGraphBuilder) -> SpatialResult<RouteLoadStats> {
    let file = std::fs::File::open(path)?;
    let stats = load_routes_reader(file, builder)?;
    info!(
        path = %path.display(),
        loaded = stats.loaded,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        "routes loaded"
    );
    Ok(stats)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R, builder: &mut RoadGraphBuilder) -> SpatialResult<RouteLoadStats> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stats = RouteLoadStats::default();

    for result in csv_reader.records() {
        stats.rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable route row");
                stats.skipped += 1;
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        if record.len() <= COL_GRADIENT {
            warn!(line, fields = record.len(), "skipping short route row");
            stats.skipped += 1;
            continue;
        }

        let numbers = (
            parse_f64(&record[COL_DISTANCE]),
            parse_f64(&record[COL_SPEED]),
            parse_f64(&record[COL_GRADIENT]),
        );
        let (Some(distance), Some(speed), Some(gradient)) = numbers else {
            warn!(line, "skipping route row with unparsable numeric field");
            stats.skipped += 1;
            continue;
        };

        let origin      = City::new(&record[COL_CITY_ORIGIN], &record[COL_STATE_ORIGIN]);
        let destination = City::new(&record[COL_CITY_DEST], &record[COL_STATE_DEST]);
        if origin.name().is_empty() || destination.name().is_empty() {
            warn!(line, "skipping route row with empty city name");
            stats.skipped += 1;
            continue;
        }

        match builder.add_edge(origin, destination, distance, speed, gradient) {
            Ok(true)  => stats.loaded += 1,
            Ok(false) => stats.duplicates += 1,
            Err(e) => {
                warn!(line, error = %e, "skipping route row");
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}
