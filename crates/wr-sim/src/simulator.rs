//! Temporal walk of a solved path.
//!
//! For each consecutive pair `(prev, city)` of the path:
//!
//! 1. Look up the road `prev → city` in the graph.
//! 2. Look up the weather at `city` for the current clock hour.
//! 3. Inflate the base distance by the condition penalty, then by the grade.
//! 4. Advance the clock by `adjusted / speed` hours and burn
//!    `adjusted / mpg` gallons.
//! 5. Emit a [`TripStep`] the first time `city` is seen.
//!
//! The walk stops after the first arrival at the destination.

use chrono::NaiveDateTime;
use rustc_hash::FxHashSet;
use tracing::{debug, error};

use wr_core::{NodeId, SimClock};
use wr_spatial::Edge;

use crate::{SimError, SimResult, TripContext, TripObserver, TripReport, TripStep};

// ── LegCost ───────────────────────────────────────────────────────────────────

/// Cost of driving one road under one weather condition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegCost {
    /// Base distance plus the weather penalty.
    pub effective_distance: f64,
    /// Effective distance scaled by `1 + gradient`.
    pub adjusted_distance: f64,
    pub hours: f64,
    pub gallons: f64,
}

impl LegCost {
    pub fn compute(edge: &Edge, penalty: f64, mpg: f64) -> Self {
        let effective_distance = edge.distance + penalty;
        let adjusted_distance = effective_distance * (1.0 + edge.gradient);
        Self {
            effective_distance,
            adjusted_distance,
            hours:   adjusted_distance / edge.speed,
            gallons: adjusted_distance / mpg,
        }
    }
}

// ── TripSimulator ─────────────────────────────────────────────────────────────

/// Walks a node path through time against the weather table.
pub struct TripSimulator<'a> {
    ctx: TripContext<'a>,
}

/// Accumulator threaded through the legs of one walk.
struct Walk {
    clock:          SimClock,
    total_gallons:  f64,
    total_distance: f64,
    visited:        FxHashSet<NodeId>,
    steps:          Vec<TripStep>,
}

impl<'a> TripSimulator<'a> {
    pub fn new(ctx: TripContext<'a>) -> Self {
        Self { ctx }
    }

    /// Simulate `path` departing at `departure` and stopping at the first
    /// arrival at `destination`.
    ///
    /// The origin is emitted as the first step with zero distance and fuel,
    /// its weather looked up at the departure hour.  A single-node path is a
    /// zero-length trip.
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptyPath`] if `path` is empty.
    /// - [`SimError::BrokenPath`] if two consecutive nodes share no road.
    /// - [`SimError::ClockOverflow`] if a leg's travel time does not fit the
    ///   clock.
    pub fn simulate<O: TripObserver>(
        &self,
        path:        &[NodeId],
        departure:   NaiveDateTime,
        destination: NodeId,
        observer:    &mut O,
    ) -> SimResult<TripReport> {
        let &origin = path.first().ok_or(SimError::EmptyPath)?;
        let graph = self.ctx.graph;

        let mut walk = Walk {
            clock:          SimClock::new(departure, self.ctx.config.rounding),
            total_gallons:  0.0,
            total_distance: 0.0,
            visited:        FxHashSet::default(),
            steps:          Vec::with_capacity(path.len()),
        };

        observer.on_departure(graph.city(origin), departure);
        let weather = self.ctx.weather.lookup(graph.city(origin), departure).to_owned();
        let first = self.step(origin, 0.0, 0.0, weather, departure);
        walk.visited.insert(origin);
        observer.on_step(&first);
        walk.steps.push(first);

        // Cut the path just after the first arrival at the destination.
        let end = path
            .iter()
            .skip(1)
            .position(|&n| n == destination)
            .map_or(path.len(), |i| i + 2);

        path[..end]
            .windows(2)
            .try_for_each(|pair| self.leg(&mut walk, pair[0], pair[1], &mut *observer))?;

        Ok(TripReport {
            origin:          graph.city(origin).clone(),
            destination:     graph.city(destination).clone(),
            path:            path[..end].to_vec(),
            steps:           walk.steps,
            departure,
            arrival:         walk.clock.now(),
            total_distance:  walk.total_distance,
            total_gallons:   walk.total_gallons,
            solver_distance: None,
        })
    }

    fn leg<O: TripObserver>(
        &self,
        walk:     &mut Walk,
        prev:     NodeId,
        city:     NodeId,
        observer: &mut O,
    ) -> SimResult<()> {
        let graph = self.ctx.graph;
        let edge = graph.edge_between(prev, city).ok_or_else(|| {
            error!(from = %graph.city(prev), to = %graph.city(city), "path has no road between consecutive cities");
            SimError::BrokenPath {
                from: graph.city(prev).clone(),
                to:   graph.city(city).clone(),
            }
        })?;

        let entered = walk.clock.now();
        let condition = self.ctx.weather.lookup(graph.city(city), entered);
        let penalty = self.ctx.config.penalties.penalty(condition);
        let cost = LegCost::compute(edge, penalty, self.ctx.config.mpg);

        walk.clock.advance_hours(cost.hours).inspect_err(|e| {
            error!(from = %graph.city(prev), to = %graph.city(city), error = %e, "leg overflows the clock");
        })?;
        walk.total_gallons += cost.gallons;
        walk.total_distance += edge.distance;

        debug!(
            from = %graph.city(prev),
            to = %graph.city(city),
            weather = condition,
            adjusted = cost.adjusted_distance,
            hours = cost.hours,
            "leg"
        );

        if walk.visited.insert(city) {
            let step = self.step(city, edge.distance, cost.gallons, condition.to_owned(), walk.clock.now());
            observer.on_step(&step);
            walk.steps.push(step);
        }
        Ok(())
    }

    fn step(
        &self,
        node:     NodeId,
        distance: f64,
        gallons:  f64,
        weather:  String,
        arrival:  NaiveDateTime,
    ) -> TripStep {
        TripStep {
            city: self.ctx.graph.city(node).clone(),
            distance,
            gallons,
            weather,
            location: self.ctx.location(node),
            arrival,
        }
    }
}
