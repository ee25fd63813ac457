//! Simulated time.
//!
//! # Design
//!
//! Trips are replayed against wall-clock timestamps because weather is
//! keyed by calendar hour.  Timestamps are naive (no time zone): every input
//! file uses the local time of the region it describes.
//!
//! `SimClock` advances by fractional travel hours.  How the fraction is
//! turned into clock time is a [`RoundingPolicy`]:
//!
//! | Policy     | Applied to            | Example: 0.2583 h (15.5 min) |
//! |------------|-----------------------|------------------------------|
//! | `Truncate` | whole minutes, floor  | +15 min                      |
//! | `Nearest`  | whole minutes, round  | +16 min                      |
//! | `Exact`    | whole seconds, round  | +15 min 30 s                 |
//!
//! `Truncate` is the default: per-leg sub-minute remainders are dropped, so
//! long trips with many short legs finish slightly early.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::{CoreError, CoreResult};

/// Input/output timestamp layout, e.g. `03/14/2024 09:30`.
///
/// Parsing accepts unpadded fields (`3/4/2024 9:05`).
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Parse a `MM/DD/YYYY HH:MM` timestamp.  Surrounding whitespace is ignored.
pub fn parse_timestamp(s: &str) -> CoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| CoreError::Timestamp { input: s.to_owned() })
}

/// Format a timestamp as `MM/DD/YYYY HH:MM`.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Zero the minutes, seconds and sub-second part of `t`.
#[inline]
pub fn truncate_to_hour(t: NaiveDateTime) -> NaiveDateTime {
    let into_hour = TimeDelta::seconds(i64::from(t.minute() * 60 + t.second()))
        + TimeDelta::nanoseconds(i64::from(t.nanosecond()));
    t - into_hour
}

// ── RoundingPolicy ────────────────────────────────────────────────────────────

/// How a fractional travel duration is applied to the clock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoundingPolicy {
    /// Whole minutes, fraction dropped.
    #[default]
    Truncate,
    /// Whole minutes, rounded half away from zero.
    Nearest,
    /// Whole seconds, rounded.
    Exact,
}

impl RoundingPolicy {
    /// Convert `hours` into a clock delta.  Negative and non-finite inputs
    /// produce a zero delta.
    ///
    /// # Errors
    /// [`CoreError::ClockOverflow`] if the duration does not fit a
    /// `TimeDelta`.
    pub fn delta(self, hours: f64) -> CoreResult<TimeDelta> {
        if !hours.is_finite() || hours <= 0.0 {
            return Ok(TimeDelta::zero());
        }
        let delta = match self {
            RoundingPolicy::Truncate => TimeDelta::try_minutes((hours * 60.0) as i64),
            RoundingPolicy::Nearest  => TimeDelta::try_minutes((hours * 60.0).round() as i64),
            RoundingPolicy::Exact    => TimeDelta::try_seconds((hours * 3_600.0).round() as i64),
        };
        delta.ok_or(CoreError::ClockOverflow { hours })
    }
}

impl std::str::FromStr for RoundingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(RoundingPolicy::Truncate),
            "nearest"  => Ok(RoundingPolicy::Nearest),
            "exact"    => Ok(RoundingPolicy::Exact),
            other => Err(format!("unknown rounding policy {other:?} (truncate|nearest|exact)")),
        }
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The running timestamp of one simulated trip.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.  It
/// never moves backwards: [`advance_hours`](Self::advance_hours) ignores
/// negative durations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimClock {
    start:    NaiveDateTime,
    current:  NaiveDateTime,
    rounding: RoundingPolicy,
}

impl SimClock {
    pub fn new(start: NaiveDateTime, rounding: RoundingPolicy) -> Self {
        Self { start, current: start, rounding }
    }

    #[inline]
    pub fn now(&self) -> NaiveDateTime {
        self.current
    }

    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Advance by `hours` of travel and return the delta actually applied.
    ///
    /// # Errors
    /// [`CoreError::ClockOverflow`] if the duration or the resulting
    /// timestamp is out of range.  The clock is left unchanged.
    pub fn advance_hours(&mut self, hours: f64) -> CoreResult<TimeDelta> {
        let delta = self.rounding.delta(hours)?;
        self.current = self
            .current
            .checked_add_signed(delta)
            .ok_or(CoreError::ClockOverflow { hours })?;
        Ok(delta)
    }

    /// Time elapsed since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> TimeDelta {
        self.current - self.start
    }

    /// Break elapsed time into (days, hours, minutes).
    pub fn elapsed_dhm(&self) -> (i64, i64, i64) {
        let mins = self.elapsed().num_minutes().max(0);
        (mins / 1_440, (mins % 1_440) / 60, mins % 60)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (+{}d {:02}:{:02})", format_timestamp(self.current), d, h, m)
    }
}
