//! Per-city hourly weather.
//!
//! Conditions are stored per calendar hour.  Both ingestion and lookup
//! truncate the timestamp to the start of its hour, so a query at 09:47 sees
//! the 09:00 observation.  A city or hour with no observation reads as
//! [`UNKNOWN_CONDITION`].

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;

use wr_core::{normalize_label, truncate_to_hour, City, GeoPoint};

/// Condition reported when no observation covers the queried hour.
pub const UNKNOWN_CONDITION: &str = "unknown";

/// City × hour → condition label, plus per-city coordinates.
///
/// Built once at load time, then read-only.
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    hourly:    FxHashMap<City, FxHashMap<NaiveDateTime, String>>,
    locations: FxHashMap<City, GeoPoint>,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the condition observed for `city` during the hour containing
    /// `at`.  The label is normalized; a later call for the same hour wins.
    pub fn ingest(&mut self, city: &City, at: NaiveDateTime, condition: &str) {
        self.hourly
            .entry(city.clone())
            .or_default()
            .insert(truncate_to_hour(at), normalize_label(condition));
    }

    /// Condition for `city` during the hour containing `at`, or
    /// [`UNKNOWN_CONDITION`].
    pub fn lookup(&self, city: &City, at: NaiveDateTime) -> &str {
        self.hourly
            .get(city)
            .and_then(|hours| hours.get(&truncate_to_hour(at)))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CONDITION)
    }

    pub fn set_location(&mut self, city: &City, pos: GeoPoint) {
        self.locations.insert(city.clone(), pos);
    }

    pub fn location(&self, city: &City) -> Option<GeoPoint> {
        self.locations.get(city).copied()
    }

    /// Every city with known coordinates.
    pub fn locations(&self) -> impl Iterator<Item = (&City, GeoPoint)> + '_ {
        self.locations.iter().map(|(c, &p)| (c, p))
    }

    pub fn contains_city(&self, city: &City) -> bool {
        self.hourly.contains_key(city) || self.locations.contains_key(city)
    }

    /// Number of cities with at least one observation.
    pub fn city_count(&self) -> usize {
        self.hourly.len()
    }

    /// Total number of (city, hour) observations.
    pub fn slot_count(&self) -> usize {
        self.hourly.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }
}
