//! `wr-spatial` — road network, shortest paths, and route loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `Edge`      |
//! | [`solver`]  | `PathSolver` trait, `Dijkstra`, `BellmanFord`, `SolverKind`, `ShortestPathTree`, `reconstruct` |
//! | [`loader`]  | `load_routes_csv`, `load_routes_reader`                     |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod loader;
pub mod network;
pub mod solver;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_routes_csv, load_routes_reader, RouteLoadStats};
pub use network::{Edge, RoadGraph, RoadGraphBuilder};
pub use solver::{reconstruct, BellmanFord, Dijkstra, PathSolver, ShortestPathTree, SolverKind};
