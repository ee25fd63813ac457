//! Read-only inputs passed to every trip query.

use wr_core::{GeoPoint, NodeId};
use wr_spatial::RoadGraph;
use wr_weather::WeatherTable;

use crate::TripConfig;

/// The loaded network, weather and configuration for a run.
///
/// Nothing here is mutated after load, so one context can serve any number
/// of queries, including concurrent ones.  All per-query state (shortest-path
/// tree, visited set, clock) lives inside the query call.
#[derive(Clone, Copy)]
pub struct TripContext<'a> {
    pub graph:   &'a RoadGraph,
    pub weather: &'a WeatherTable,
    pub config:  &'a TripConfig,
}

impl<'a> TripContext<'a> {
    #[inline]
    pub fn new(graph: &'a RoadGraph, weather: &'a WeatherTable, config: &'a TripConfig) -> Self {
        Self { graph, weather, config }
    }

    /// Coordinates of `node`: from the graph if attached at build time,
    /// otherwise from the weather table.
    pub fn location(&self, node: NodeId) -> Option<GeoPoint> {
        self.graph
            .location(node)
            .or_else(|| self.weather.location(self.graph.city(node)))
    }
}
