//! Trip observer trait for progress reporting and data collection.

use chrono::NaiveDateTime;

use wr_core::City;

use crate::{TripReport, TripStep};

/// Callbacks invoked while a trip is planned and simulated.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: live printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl TripObserver for Printer {
///     fn on_step(&mut self, step: &TripStep) {
///         println!("{} at {}", step.city, step.arrival);
///     }
/// }
/// ```
pub trait TripObserver {
    /// Called once before the first step, with the normalized origin.
    fn on_departure(&mut self, _origin: &City, _at: NaiveDateTime) {}

    /// Called for each first visit, origin included, in path order.
    fn on_step(&mut self, _step: &TripStep) {}

    /// Called once after the destination is reached.
    fn on_arrival(&mut self, _report: &TripReport) {}

    /// Called instead of everything above when no path exists.
    fn on_no_path(&mut self, _origin: &City, _destination: &City) {}
}

/// A [`TripObserver`] that does nothing.
pub struct NoopObserver;

impl TripObserver for NoopObserver {}

impl<O: TripObserver + ?Sized> TripObserver for &mut O {
    fn on_departure(&mut self, origin: &City, at: NaiveDateTime) {
        (**self).on_departure(origin, at);
    }

    fn on_step(&mut self, step: &TripStep) {
        (**self).on_step(step);
    }

    fn on_arrival(&mut self, report: &TripReport) {
        (**self).on_arrival(report);
    }

    fn on_no_path(&mut self, origin: &City, destination: &City) {
        (**self).on_no_path(origin, destination);
    }
}
