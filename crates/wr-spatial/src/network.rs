//! Road network representation and builder.
//!
//! # Data layout
//!
//! Cities are interned into dense `NodeId`s.  Outgoing edges use
//! **Compressed Sparse Row (CSR)** format: given a `NodeId n`, its edges
//! occupy the slice
//!
//! ```text
//! edges[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! and an `EdgeId` is a position in `edges`.  Within one source node the
//! edges keep their insertion order, so neighbor iteration is stable across
//! runs.
//!
//! # Undirected roads
//!
//! Every road is stored as two directed edges with identical weights.  The
//! builder refuses a second road between the same pair of cities in either
//! direction, so each ordered pair has at most one edge.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the cities that have coordinates answers
//! nearest-city queries, e.g. to resolve a GPS fix to a trip origin.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use wr_core::{City, EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// One direction of a road segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to:   NodeId,
    /// Length in miles.  Positive unless the graph allows negative weights.
    pub distance: f64,
    /// Travel speed in miles per hour.  Always positive.
    pub speed: f64,
    /// Signed elevation factor applied to the weather-adjusted distance.
    pub gradient: f64,
}

// ── R-tree city entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct CityEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for CityEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CityEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// closest city; not a physical distance.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus a spatial index.
///
/// Immutable once built; share it by reference across queries.  Construct
/// with [`RoadGraphBuilder`].
pub struct RoadGraph {
    cities: Vec<City>,
    index:  FxHashMap<City, NodeId>,

    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    /// All directed edges, grouped by source node, indexed by `EdgeId`.
    edges: Vec<Edge>,

    negative_weights: bool,
    spatial_idx:      RTree<CityEntry>,
}

impl RoadGraph {
    /// A graph with no cities.  Every query against it reports "no path".
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.cities.len()
    }

    /// Number of directed edges (twice the number of roads).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// `true` if any edge has a negative distance.
    pub fn has_negative_weights(&self) -> bool {
        self.negative_weights
    }

    // ── City lookup ───────────────────────────────────────────────────────

    /// The `NodeId` of `city`, if it appears in any road.
    pub fn node(&self, city: &City) -> Option<NodeId> {
        self.index.get(city).copied()
    }

    /// # Panics
    /// Panics if `node` is out of range.
    pub fn city(&self, node: NodeId) -> &City {
        &self.cities[node.index()]
    }

    pub fn cities(&self) -> impl Iterator<Item = (NodeId, &City)> + '_ {
        self.cities.iter().enumerate().map(|(i, c)| (NodeId::from_index(i), c))
    }

    pub fn location(&self, node: NodeId) -> Option<GeoPoint> {
        self.cities.get(node.index()).and_then(|c| c.location)
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing edges of `node`.  Empty for unknown nodes.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> &[Edge] {
        match self.edge_range(node) {
            Some((start, end)) => &self.edges[start..end],
            None => &[],
        }
    }

    /// `EdgeId`s of the outgoing edges of `node`.
    #[inline]
    pub fn out_edge_ids(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = self.edge_range(node).unwrap_or((0, 0));
        (start..end).map(|i| EdgeId::from_index(i))
    }

    /// Outgoing edges of `city`.  Empty for cities not in the graph.
    pub fn neighbors(&self, city: &City) -> &[Edge] {
        match self.node(city) {
            Some(n) => self.out_edges(n),
            None => &[],
        }
    }

    /// # Panics
    /// Panics if `edge` is out of range.
    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.index()]
    }

    /// Every directed edge, in `EdgeId` order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge `from → to`, if the two cities are adjacent.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.out_edges(from).iter().find(|e| e.to == to)
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> Option<(usize, usize)> {
        if node.index() >= self.node_count() {
            return None;
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        Some((start, end))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The city with coordinates closest to `pos`.
    ///
    /// Returns `None` if no city has a location.
    pub fn nearest_city(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use wr_core::City;
/// use wr_spatial::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// let gary = City::new("Gary", "IN");
/// let chicago = City::new("Chicago", "IL");
/// assert!(b.add_edge(gary.clone(), chicago.clone(), 29.0, 55.0, 0.0).unwrap());
/// assert!(!b.add_edge(chicago, gary, 29.0, 55.0, 0.0).unwrap()); // reverse already present
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // both directions
/// ```
pub struct RoadGraphBuilder {
    cities:         Vec<City>,
    index:          FxHashMap<City, NodeId>,
    raw_edges:      Vec<Edge>,
    /// Unordered pairs `(min, max)` that already have a road.
    pairs:          FxHashSet<(NodeId, NodeId)>,
    allow_negative: bool,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            cities:         Vec::new(),
            index:          FxHashMap::default(),
            raw_edges:      Vec::new(),
            pairs:          FxHashSet::default(),
            allow_negative: false,
        }
    }

    /// Pre-allocate for the expected number of cities and roads.
    pub fn with_capacity(cities: usize, roads: usize) -> Self {
        let mut b = Self::new();
        b.cities.reserve(cities);
        b.index.reserve(cities);
        b.raw_edges.reserve(roads * 2);
        b.pairs.reserve(roads);
        b
    }

    /// Accept finite negative distances.  Only the Bellman-Ford solver can
    /// route over such a graph.
    pub fn allow_negative_weights(mut self) -> Self {
        self.allow_negative = true;
        self
    }

    /// Intern `city`, returning its `NodeId`.  A location on `city` is kept
    /// if the stored entry has none yet.
    pub fn add_city(&mut self, city: City) -> NodeId {
        if let Some(&id) = self.index.get(&city) {
            let stored = &mut self.cities[id.index()];
            if stored.location.is_none() {
                stored.location = city.location;
            }
            return id;
        }
        let id = NodeId::from_index(self.cities.len());
        self.index.insert(city.clone(), id);
        self.cities.push(city);
        id
    }

    /// Add an undirected road between `source` and `destination`.
    ///
    /// An empty state on either endpoint is filled from the other endpoint
    /// before the cities are interned.
    ///
    /// Returns `Ok(true)` if the road was added, `Ok(false)` if a road between
    /// the two cities already exists (in either direction).
    ///
    /// # Errors
    /// [`SpatialError::MalformedRecord`] for a self-loop, a non-finite
    /// value, a non-positive speed, a gradient of -1 or below, or a
    /// non-positive distance (unless
    /// [`allow_negative_weights`](Self::allow_negative_weights) was set).
    pub fn add_edge(
        &mut self,
        mut source:      City,
        mut destination: City,
        distance: f64,
        speed:    f64,
        gradient: f64,
    ) -> SpatialResult<bool> {
        source.inherit_state(&destination);
        destination.inherit_state(&source);

        if source == destination {
            return Err(SpatialError::MalformedRecord(format!("road from {source} to itself")));
        }
        self.validate(&source, &destination, distance, speed, gradient)?;

        let a = self.add_city(source);
        let b = self.add_city(destination);
        if !self.pairs.insert((a.min(b), a.max(b))) {
            return Ok(false);
        }

        self.raw_edges.push(Edge { from: a, to: b, distance, speed, gradient });
        self.raw_edges.push(Edge { from: b, to: a, distance, speed, gradient });
        Ok(true)
    }

    fn validate(
        &self,
        source:      &City,
        destination: &City,
        distance: f64,
        speed:    f64,
        gradient: f64,
    ) -> SpatialResult<()> {
        let bad = |what: String| {
            Err(SpatialError::MalformedRecord(format!("{source} - {destination}: {what}")))
        };
        if !distance.is_finite() || (!self.allow_negative && distance <= 0.0) {
            return bad(format!("invalid distance {distance}"));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return bad(format!("invalid speed {speed}"));
        }
        // A grade of -100% or steeper would make the driven distance
        // non-positive.
        if !gradient.is_finite() || gradient <= -1.0 {
            return bad(format!("invalid gradient {gradient}"));
        }
        Ok(())
    }

    /// Attach coordinates to a city already added.  Returns `false` if the
    /// city is unknown (weather files often list cities with no roads).
    pub fn set_location(&mut self, city: &City, pos: GeoPoint) -> bool {
        match self.index.get(city) {
            Some(&id) => {
                self.cities[id.index()].location = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn node_count(&self) -> usize { self.cities.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the stable edge sort + O(N log N) for
    /// the R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.cities.len();

        // Stable: keeps insertion order among edges of the same source.
        let mut edges = self.raw_edges;
        edges.sort_by_key(|e| e.from);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edges.len());

        let negative_weights = edges.iter().any(|e| e.distance < 0.0);

        let entries: Vec<CityEntry> = self
            .cities
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                c.location.map(|pos| CityEntry { point: [pos.lat, pos.lon], id: NodeId::from_index(i) })
            })
            .collect();
        let located = entries.len();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(
            cities = node_count,
            edges = edges.len(),
            located,
            negative_weights,
            "road graph built"
        );

        RoadGraph {
            cities: self.cities,
            index: self.index,
            node_out_start,
            edges,
            negative_weights,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
