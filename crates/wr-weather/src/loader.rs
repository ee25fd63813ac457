//! CSV weather loader.
//!
//! # CSV format
//!
//! One row per city.  The header names the hour of each condition column;
//! the last two columns are coordinates.
//!
//! ```csv
//! State,City,03/14/2024 8:00,03/14/2024 9:00,03/14/2024 10:00,Latitude,Longitude
//! IN,Fort Wayne,Fair,Partly Cloudy,Light Rain,41.0793,-85.1394
//! IN,Auburn,Cloudy,Cloudy,Fog,41.3670,-85.0586
//! ```
//!
//! Hour labels use `MM/DD/YYYY H:MM`.  A label that does not parse fails the
//! whole load, since every row would be misaligned.  Data rows with the wrong
//! field count or unusable coordinates are logged and skipped.  Empty
//! condition cells are left out, so those hours read as `unknown`.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use wr_core::{parse_timestamp, City, GeoPoint};

use crate::{WeatherError, WeatherResult, WeatherTable};

const COL_STATE:  usize = 0;
const COL_CITY:   usize = 1;
const FIRST_HOUR: usize = 2;
/// State, city, latitude, longitude.
const FIXED_COLUMNS: usize = 4;

/// Outcome counts of one weather load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherLoadStats {
    /// Data rows seen (header excluded).
    pub rows:    usize,
    /// Rows ingested.
    pub cities:  usize,
    /// Non-empty (city, hour) cells ingested.
    pub slots:   usize,
    /// Rows dropped as malformed.
    pub skipped: usize,
}

/// Load hourly conditions and city coordinates from a CSV file.
pub fn load_weather_csv(path: &Path, table: &mut WeatherTable) -> WeatherResult<WeatherLoadStats> {
    let file = std::fs::File::open(path)?;
    let stats = load_weather_reader(file, table)?;
    info!(
        path = %path.display(),
        cities = stats.cities,
        slots = stats.slots,
        skipped = stats.skipped,
        "weather loaded"
    );
    Ok(stats)
}

/// Like [`load_weather_csv`] but accepts any `Read` source.
pub fn load_weather_reader<R: Read>(reader: R, table: &mut WeatherTable) -> WeatherResult<WeatherLoadStats> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.len() < FIXED_COLUMNS {
        return Err(WeatherError::Header(format!(
            "expected at least {FIXED_COLUMNS} columns (state, city, ..., latitude, longitude), found {}",
            header.len()
        )));
    }
    let hours = parse_hour_labels(&header)?;
    let lat_col = header.len() - 2;
    let lon_col = header.len() - 1;

    let mut stats = WeatherLoadStats::default();

    for result in csv_reader.records() {
        stats.rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable weather row");
                stats.skipped += 1;
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != header.len() {
            warn!(line, fields = record.len(), expected = header.len(), "skipping weather row with wrong field count");
            stats.skipped += 1;
            continue;
        }

        let city = City::new(&record[COL_CITY], &record[COL_STATE]);
        if city.name().is_empty() {
            warn!(line, "skipping weather row with empty city name");
            stats.skipped += 1;
            continue;
        }

        let pos = match (record[lat_col].parse::<f64>(), record[lon_col].parse::<f64>()) {
            (Ok(lat), Ok(lon)) if GeoPoint::new(lat, lon).is_valid() => GeoPoint::new(lat, lon),
            _ => {
                warn!(line, %city, "skipping weather row with invalid coordinates");
                stats.skipped += 1;
                continue;
            }
        };

        for (offset, &hour) in hours.iter().enumerate() {
            let condition = &record[FIRST_HOUR + offset];
            if !condition.is_empty() {
                table.ingest(&city, hour, condition);
                stats.slots += 1;
            }
        }
        table.set_location(&city, pos);
        stats.cities += 1;
    }

    Ok(stats)
}

fn parse_hour_labels(header: &csv::StringRecord) -> WeatherResult<Vec<NaiveDateTime>> {
    header
        .iter()
        .skip(FIRST_HOUR)
        .take(header.len() - FIXED_COLUMNS)
        .map(|label| {
            parse_timestamp(label)
                .map_err(|e| WeatherError::Header(format!("hour column {label:?}: {e}")))
        })
        .collect()
}
