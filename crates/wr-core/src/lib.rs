//! `wr-core` — foundational types for the `weatherroute` trip simulator.
//!
//! This crate is a dependency of every other `wr-*` crate.  It intentionally
//! has no `wr-*` dependencies and minimal external ones (only `chrono` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`city`]        | `City` identity, label normalization                  |
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`time`]        | `SimClock`, `RoundingPolicy`, timestamp parsing       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod city;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use city::{normalize_label, City};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use time::{format_timestamp, parse_timestamp, truncate_to_hour, RoundingPolicy, SimClock, TIMESTAMP_FORMAT};
