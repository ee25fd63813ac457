//! Trip configuration.
//!
//! Typically built from defaults plus CLI flags, or loaded from a JSON file
//! by the application (with the `serde` feature).  Missing fields take their
//! defaults.

use wr_core::RoundingPolicy;
use wr_weather::PenaltyTable;

use crate::{SimError, SimResult};

/// Fuel economy assumed for every vehicle, miles per gallon.
pub const DEFAULT_MPG: f64 = 38.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TripConfig {
    /// Miles per gallon used for fuel estimates.  Default: 38.
    pub mpg: f64,

    /// How fractional travel hours advance the clock.  Default: truncate to
    /// whole minutes.
    pub rounding: RoundingPolicy,

    /// Condition → extra miles.
    pub penalties: PenaltyTable,
}

impl TripConfig {
    /// Check the values a config file could get wrong.
    pub fn validate(&self) -> SimResult<()> {
        if !self.mpg.is_finite() || self.mpg <= 0.0 {
            return Err(SimError::Config(format!("mpg must be positive, got {}", self.mpg)));
        }
        Ok(())
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            mpg:       DEFAULT_MPG,
            rounding:  RoundingPolicy::default(),
            penalties: PenaltyTable::default(),
        }
    }
}
