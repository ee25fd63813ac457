//! Plain data row type written by output backends.

use chrono::NaiveDateTime;

use wr_sim::TripStep;

/// Column names of the telemetry report, in order.
pub const TELEMETRY_HEADER: [&str; 7] =
    ["City", "State", "Distance", "Gallons", "Weather", "Latitude", "Longitude"];

/// One city of a simulated trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRow {
    pub city:      String,
    pub state:     String,
    /// Base miles of the road into this city (0 for the origin).
    pub distance:  f64,
    pub gallons:   f64,
    pub weather:   String,
    /// `None` when the city has no known coordinates.
    pub latitude:  Option<f64>,
    pub longitude: Option<f64>,
    /// Not part of the CSV report; kept for the SQLite table.
    pub arrival:   NaiveDateTime,
}

impl TelemetryRow {
    /// The seven report fields as text.  Gallons carry two decimals; missing
    /// coordinates are empty.
    pub fn fields(&self) -> [String; 7] {
        let coord = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        [
            self.city.clone(),
            self.state.clone(),
            self.distance.to_string(),
            format!("{:.2}", self.gallons),
            self.weather.clone(),
            coord(self.latitude),
            coord(self.longitude),
        ]
    }
}

impl From<&TripStep> for TelemetryRow {
    fn from(step: &TripStep) -> Self {
        Self {
            city:      step.city.name().to_owned(),
            state:     step.city.state().to_owned(),
            distance:  step.distance,
            gallons:   step.gallons,
            weather:   step.weather.clone(),
            latitude:  step.latitude(),
            longitude: step.longitude(),
            arrival:   step.arrival,
        }
    }
}
