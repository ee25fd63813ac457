//! Shortest-path solvers and path reconstruction.
//!
//! # Pluggability
//!
//! `wr-sim` calls solvers through the [`PathSolver`] trait.  Two strategies
//! ship here:
//!
//! | Solver          | Weights        | Complexity       | Negative cycle      |
//! |-----------------|----------------|------------------|---------------------|
//! | [`Dijkstra`]    | non-negative   | O((V+E) log V)   | n/a (rejected)      |
//! | [`BellmanFord`] | any finite     | O(V·E)           | `NegativeCycle` err |
//!
//! [`SolverKind`] selects one at runtime (CLI flag, config file).
//!
//! Both compute the full shortest-path tree from the origin rather than
//! stopping at a destination, so one tree can answer every destination.
//!
//! # Ties
//!
//! Equal tentative distances are resolved by whichever relaxation happened
//! first.  For Dijkstra that is frontier order, where equal costs pop by
//! ascending `NodeId`; for Bellman-Ford it is `EdgeId` order.  The
//! resulting paths have equal length but may differ between the two solvers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use wr_core::{EdgeId, NodeId};

use crate::network::RoadGraph;
use crate::{SpatialError, SpatialResult};

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Predecessor map produced by one solver run, rooted at `origin`.
///
/// A node other than the origin with no predecessor is unreachable.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    origin:    NodeId,
    dist:      Vec<f64>,
    prev:      Vec<NodeId>,
    prev_edge: Vec<EdgeId>,
}

impl ShortestPathTree {
    fn new(node_count: usize, origin: NodeId) -> Self {
        let mut dist = vec![f64::INFINITY; node_count];
        dist[origin.index()] = 0.0;
        Self {
            origin,
            dist,
            prev:      vec![NodeId::INVALID; node_count],
            prev_edge: vec![EdgeId::INVALID; node_count],
        }
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Shortest distance from the origin, `None` if unreachable.
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.dist.get(node.index()).copied().filter(|d| d.is_finite())
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Parent of `node` in the tree.  `None` for the origin and for
    /// unreachable nodes.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.prev.get(node.index()).copied().filter(|p| p.is_valid())
    }

    /// The edge used to reach `node`.
    pub fn predecessor_edge(&self, node: NodeId) -> Option<EdgeId> {
        self.prev_edge.get(node.index()).copied().filter(|e| e.is_valid())
    }

    /// Every `(node, parent)` pair of the tree.
    pub fn predecessors(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.prev
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_valid())
            .map(|(i, &p)| (NodeId::from_index(i), p))
    }

    /// Ordered path from the origin to `destination`; see [`reconstruct`].
    pub fn path_to(&self, destination: NodeId) -> Vec<NodeId> {
        reconstruct(self, destination)
    }

    #[inline]
    fn relax(&mut self, graph: &RoadGraph, edge: EdgeId) -> bool {
        let e = graph.edge(edge);
        let candidate = self.dist[e.from.index()] + e.distance;
        if candidate < self.dist[e.to.index()] {
            self.dist[e.to.index()] = candidate;
            self.prev[e.to.index()] = e.from;
            self.prev_edge[e.to.index()] = edge;
            true
        } else {
            false
        }
    }
}

// ── Path reconstruction ───────────────────────────────────────────────────────

/// Walk predecessors back from `destination` to the tree's origin.
///
/// Returns the path in origin → destination order, `[origin]` if
/// `destination` is the origin, and an empty `Vec` if it is unreachable.
pub fn reconstruct(tree: &ShortestPathTree, destination: NodeId) -> Vec<NodeId> {
    if destination.index() >= tree.prev.len() {
        return Vec::new();
    }

    let mut path = vec![destination];
    let mut cur = destination;
    while cur != tree.origin {
        match tree.predecessor(cur) {
            // A path can't visit more nodes than the graph has.
            Some(p) if path.len() <= tree.prev.len() => {
                path.push(p);
                cur = p;
            }
            _ => return Vec::new(),
        }
    }
    path.reverse();
    path
}

// ── PathSolver trait ──────────────────────────────────────────────────────────

/// A single-source shortest-path strategy.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one solver can serve queries on
/// several rayon workers.
pub trait PathSolver: Send + Sync {
    /// Compute the shortest-path tree rooted at `origin`.
    fn solve(&self, graph: &RoadGraph, origin: NodeId) -> SpatialResult<ShortestPathTree>;

    /// Short human-readable name for logs.
    fn name(&self) -> &'static str;
}

fn check_origin(graph: &RoadGraph, origin: NodeId) -> SpatialResult<()> {
    if origin.index() < graph.node_count() {
        Ok(())
    } else {
        Err(SpatialError::NodeNotFound(origin))
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Dijkstra's algorithm with a binary-heap frontier and lazy deletion.
///
/// Refuses graphs that carry negative weights
/// ([`SpatialError::NegativeWeight`]).
#[derive(Copy, Clone, Debug, Default)]
pub struct Dijkstra;

/// Min-heap entry.  `Ord` is reversed so `BinaryHeap` (a max-heap) pops the
/// smallest cost first; equal costs pop by ascending `NodeId`.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PathSolver for Dijkstra {
    fn solve(&self, graph: &RoadGraph, origin: NodeId) -> SpatialResult<ShortestPathTree> {
        check_origin(graph, origin)?;
        if graph.has_negative_weights() {
            return Err(SpatialError::NegativeWeight);
        }

        let n = graph.node_count();
        let mut tree    = ShortestPathTree::new(n, origin);
        let mut visited = vec![false; n];

        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 0.0, node: origin });

        let mut settled = 0usize;
        while let Some(Frontier { node, .. }) = heap.pop() {
            // Stale entry for a node already settled.
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            settled += 1;

            for edge in graph.out_edge_ids(node) {
                if tree.relax(graph, edge) {
                    let to = graph.edge(edge).to;
                    heap.push(Frontier { cost: tree.dist[to.index()], node: to });
                }
            }
        }

        debug!(solver = "dijkstra", %origin, settled, "shortest-path tree complete");
        Ok(tree)
    }

    fn name(&self) -> &'static str {
        "dijkstra"
    }
}

// ── Bellman-Ford ──────────────────────────────────────────────────────────────

/// Bellman-Ford relaxation over every edge, with negative-cycle detection.
///
/// Runs up to `|V| - 1` passes (stopping early once a pass changes nothing),
/// then one verification pass.  Any edge that still relaxes means a
/// negative-weight cycle is reachable from the origin and the solve fails
/// with [`SpatialError::NegativeCycle`].
#[derive(Copy, Clone, Debug, Default)]
pub struct BellmanFord;

impl PathSolver for BellmanFord {
    fn solve(&self, graph: &RoadGraph, origin: NodeId) -> SpatialResult<ShortestPathTree> {
        check_origin(graph, origin)?;

        let n = graph.node_count();
        let mut tree = ShortestPathTree::new(n, origin);
        let edge_ids = || (0..graph.edge_count()).map(|i| EdgeId::from_index(i));

        let mut passes = 0usize;
        for _ in 1..n {
            passes += 1;
            let mut updated = false;
            for edge in edge_ids() {
                // Unreached sources stay at +inf; inf + w never improves.
                updated |= tree.relax(graph, edge);
            }
            if !updated {
                break;
            }
        }

        let cyclic = edge_ids().any(|edge| {
            let e = graph.edge(edge);
            tree.dist[e.from.index()] + e.distance < tree.dist[e.to.index()]
        });
        if cyclic {
            debug!(solver = "bellman-ford", %origin, passes, "negative cycle detected");
            return Err(SpatialError::NegativeCycle { origin });
        }

        debug!(solver = "bellman-ford", %origin, passes, "shortest-path tree complete");
        Ok(tree)
    }

    fn name(&self) -> &'static str {
        "bellman-ford"
    }
}

// ── SolverKind ────────────────────────────────────────────────────────────────

/// Runtime choice between the two solvers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SolverKind {
    #[default]
    Dijkstra,
    BellmanFord,
}

impl PathSolver for SolverKind {
    fn solve(&self, graph: &RoadGraph, origin: NodeId) -> SpatialResult<ShortestPathTree> {
        match self {
            SolverKind::Dijkstra    => Dijkstra.solve(graph, origin),
            SolverKind::BellmanFord => BellmanFord.solve(graph, origin),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SolverKind::Dijkstra    => Dijkstra.name(),
            SolverKind::BellmanFord => BellmanFord.name(),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "dijkstra" => Ok(SolverKind::Dijkstra),
            "bellman-ford" | "bellmanford" => Ok(SolverKind::BellmanFord),
            other => Err(format!("unknown solver {other:?} (dijkstra|bellman-ford)")),
        }
    }
}
