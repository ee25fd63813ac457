//! End-to-end trip queries: resolve cities, solve, reconstruct, simulate.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use wr_core::City;
use wr_spatial::{reconstruct, PathSolver, SolverKind};

use crate::{
    NoopObserver, SimResult, TripContext, TripObserver, TripOutcome, TripSimulator,
};

/// One origin → destination request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub origin:      City,
    pub destination: City,
    pub departure:   NaiveDateTime,
}

impl TripQuery {
    pub fn new(origin: City, destination: City, departure: NaiveDateTime) -> Self {
        Self { origin, destination, departure }
    }
}

/// Answers [`TripQuery`]s against a shared [`TripContext`].
///
/// Generic over the solver so tests can pin a concrete algorithm; the
/// application uses [`SolverKind`] to choose at runtime.
pub struct TripPlanner<'a, S: PathSolver = SolverKind> {
    ctx:    TripContext<'a>,
    solver: S,
}

impl<'a, S: PathSolver> TripPlanner<'a, S> {
    pub fn new(ctx: TripContext<'a>, solver: S) -> Self {
        Self { ctx, solver }
    }

    pub fn context(&self) -> TripContext<'a> {
        self.ctx
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Plan and simulate one trip.
    ///
    /// Cities missing from the graph and unreachable destinations both yield
    /// [`TripOutcome::NoPath`].  Solver failures (negative cycle, negative
    /// weights under Dijkstra) and broken paths are errors.
    pub fn plan<O: TripObserver>(
        &self,
        query:    &TripQuery,
        observer: &mut O,
    ) -> SimResult<TripOutcome> {
        let graph = self.ctx.graph;
        let no_path = |observer: &mut O| -> SimResult<TripOutcome> {
            observer.on_no_path(&query.origin, &query.destination);
            Ok(TripOutcome::NoPath {
                origin:      query.origin.clone(),
                destination: query.destination.clone(),
            })
        };

        let (Some(origin), Some(destination)) =
            (graph.node(&query.origin), graph.node(&query.destination))
        else {
            warn!(
                origin = %query.origin,
                destination = %query.destination,
                "city not in road network"
            );
            return no_path(observer);
        };

        let tree = self.solver.solve(graph, origin)?;
        debug!(solver = self.solver.name(), origin = %query.origin, "shortest-path tree built");

        let path = reconstruct(&tree, destination);
        if path.is_empty() {
            info!(origin = %query.origin, destination = %query.destination, "no path found");
            return no_path(observer);
        }

        let mut report = TripSimulator::new(self.ctx).simulate(
            &path,
            query.departure,
            destination,
            observer,
        )?;
        report.solver_distance = tree.distance(destination);

        info!(
            origin = %report.origin,
            destination = %report.destination,
            stops = report.steps.len(),
            miles = report.total_distance,
            gallons = report.total_gallons,
            "trip simulated"
        );
        observer.on_arrival(&report);
        Ok(TripOutcome::Arrived(report))
    }

    /// Answer many queries, each with fresh per-query state.
    ///
    /// Results are returned in query order.  With the `parallel` Cargo
    /// feature the queries run on Rayon's thread pool.
    pub fn plan_batch(&self, queries: &[TripQuery]) -> Vec<SimResult<TripOutcome>> {
        #[cfg(not(feature = "parallel"))]
        {
            queries
                .iter()
                .map(|q| self.plan(q, &mut NoopObserver))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            queries
                .par_iter()
                .map(|q| self.plan(q, &mut NoopObserver))
                .collect()
        }
    }
}
