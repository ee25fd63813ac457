//! `wr-sim` — turn a shortest path into a timed, weather-aware trip.
//!
//! # Flow
//!
//! ```text
//! TripQuery ──► TripPlanner ──► PathSolver::solve ──► reconstruct
//!                   │                                      │
//!                   └──────────── TripSimulator ◄──────────┘
//!                                      │
//!                          TripObserver callbacks, TripReport
//! ```
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`config`]    | `TripConfig` (mpg, rounding, penalty table)            |
//! | [`context`]   | `TripContext`, read-only inputs shared by all queries  |
//! | [`simulator`] | `TripSimulator`, `LegCost`                             |
//! | [`planner`]   | `TripPlanner`, `TripQuery`                             |
//! | [`report`]    | `TripStep`, `TripReport`, `TripOutcome`                |
//! | [`observer`]  | `TripObserver`, `NoopObserver`                         |
//! | [`error`]     | `SimError`, `SimResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `plan_batch` runs queries on Rayon worker threads.      |
//! | `serde`    | Derives on `TripConfig`; `Serialize` on trip results.   |

pub mod config;
pub mod context;
pub mod error;
pub mod observer;
pub mod planner;
pub mod report;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use config::{TripConfig, DEFAULT_MPG};
pub use context::TripContext;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, TripObserver};
pub use planner::{TripPlanner, TripQuery};
pub use report::{TripOutcome, TripReport, TripStep};
pub use simulator::{LegCost, TripSimulator};
