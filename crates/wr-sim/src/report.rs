//! Trip results.

use chrono::NaiveDateTime;

use wr_core::{City, GeoPoint, NodeId};

/// One city's first visit along a simulated trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TripStep {
    pub city: City,
    /// Base miles of the road used to arrive here (0 for the origin).
    pub distance: f64,
    /// Gallons burnt on that road (0 for the origin).
    pub gallons: f64,
    /// Condition looked up when the road was entered.
    pub weather: String,
    pub location: Option<GeoPoint>,
    /// Clock after arriving.
    pub arrival: NaiveDateTime,
}

impl TripStep {
    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|p| p.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|p| p.lon)
    }
}

/// Everything known about one completed trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TripReport {
    pub origin:      City,
    pub destination: City,
    /// Node sequence from the solver, origin first.
    pub path:        Vec<NodeId>,
    /// First-visit rows in path order, origin first.
    pub steps:       Vec<TripStep>,
    pub departure:   NaiveDateTime,
    /// Estimated time of arrival at the destination.
    pub arrival:     NaiveDateTime,
    /// Sum of base road miles walked.
    pub total_distance: f64,
    pub total_gallons:  f64,
    /// Shortest-path distance reported by the solver.
    pub solver_distance: Option<f64>,
}

/// Result of a trip query.  "No path" is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", rename_all = "snake_case"))]
pub enum TripOutcome {
    Arrived(TripReport),
    NoPath { origin: City, destination: City },
}

impl TripOutcome {
    pub fn report(&self) -> Option<&TripReport> {
        match self {
            TripOutcome::Arrived(r) => Some(r),
            TripOutcome::NoPath { .. } => None,
        }
    }

    pub fn is_no_path(&self) -> bool {
        matches!(self, TripOutcome::NoPath { .. })
    }
}
