//! Unit tests for wr-sim.

#[cfg(test)]
mod helpers {
    use chrono::{NaiveDate, NaiveDateTime};

    use wr_core::{City, NodeId};
    use wr_spatial::{RoadGraph, RoadGraphBuilder};

    use crate::{TripObserver, TripReport, TripStep};

    pub fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    pub fn city(name: &str) -> City {
        City::new(name, "in")
    }

    /// Triangle A–B 10, B–C 5, A–C 20 plus a separate D–E road.
    /// Speed 50 everywhere, no grade.
    pub fn graph() -> RoadGraph {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(city("a"), city("b"), 10.0, 50.0, 0.0).unwrap();
        b.add_edge(city("b"), city("c"), 5.0, 50.0, 0.0).unwrap();
        b.add_edge(city("a"), city("c"), 20.0, 50.0, 0.0).unwrap();
        b.add_edge(city("d"), city("e"), 7.0, 50.0, 0.0).unwrap();
        b.build()
    }

    pub fn node(g: &RoadGraph, name: &str) -> NodeId {
        g.node(&city(name)).unwrap()
    }

    pub fn names(steps: &[TripStep]) -> Vec<&str> {
        steps.iter().map(|s| s.city.name()).collect()
    }

    /// Counts every callback.
    #[derive(Default)]
    pub struct Recorder {
        pub departures: usize,
        pub steps:      Vec<String>,
        pub arrivals:   usize,
        pub no_paths:   usize,
    }

    impl TripObserver for Recorder {
        fn on_departure(&mut self, _origin: &City, _at: NaiveDateTime) {
            self.departures += 1;
        }
        fn on_step(&mut self, step: &TripStep) {
            self.steps.push(step.city.name().to_owned());
        }
        fn on_arrival(&mut self, _report: &TripReport) {
            self.arrivals += 1;
        }
        fn on_no_path(&mut self, _origin: &City, _destination: &City) {
            self.no_paths += 1;
        }
    }
}

// ── LegCost ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod leg_cost {
    use wr_core::City;
    use wr_spatial::RoadGraphBuilder;
    use wr_weather::PenaltyTable;

    use crate::LegCost;

    #[test]
    fn cloudy_uphill_leg() {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(City::new("a", "in"), City::new("b", "in"), 10.0, 50.0, 0.1).unwrap();
        let g = b.build();
        let edge = &g.edges()[0];

        let penalty = PenaltyTable::default().penalty("cloudy");
        let cost = LegCost::compute(edge, penalty, 38.0);

        assert_eq!(cost.effective_distance, 13.0);
        assert!((cost.adjusted_distance - 14.3).abs() < 1e-9);
        assert!((cost.hours - 14.3 / 50.0).abs() < 1e-9);
        assert!((cost.gallons - 14.3 / 38.0).abs() < 1e-9);
    }

    #[test]
    fn downhill_shrinks_distance() {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(City::new("a", "in"), City::new("b", "in"), 10.0, 50.0, -0.2).unwrap();
        let g = b.build();

        let cost = LegCost::compute(&g.edges()[0], 0.0, 38.0);
        assert!((cost.adjusted_distance - 8.0).abs() < 1e-9);
    }
}

// ── TripSimulator ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod simulator {
    use wr_core::{CoreError, GeoPoint, RoundingPolicy};
    use wr_spatial::RoadGraphBuilder;
    use wr_weather::WeatherTable;

    use crate::{NoopObserver, SimError, TripConfig, TripContext, TripSimulator};
    use super::helpers::{city, graph, names, node, ts, Recorder};

    #[test]
    fn walks_path_and_totals() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b"), node(&g, "c")];

        let report = sim.simulate(&path, ts(8, 0), path[2], &mut NoopObserver).unwrap();

        assert_eq!(names(&report.steps), ["a", "b", "c"]);
        assert_eq!(report.total_distance, 15.0);
        assert!((report.total_gallons - 15.0 / 38.0).abs() < 1e-9);
        // 10/50 h = 12 min, 5/50 h = 6 min.
        assert_eq!(report.steps[1].arrival, ts(8, 12));
        assert_eq!(report.arrival, ts(8, 18));
        assert_eq!(report.departure, ts(8, 0));
    }

    #[test]
    fn origin_step_is_free() {
        let g = graph();
        let mut w = WeatherTable::new();
        w.ingest(&city("a"), ts(8, 0), "Mist");
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b")];

        let report = sim.simulate(&path, ts(8, 30), path[1], &mut NoopObserver).unwrap();
        let first = &report.steps[0];
        assert_eq!(first.city, city("a"));
        assert_eq!(first.distance, 0.0);
        assert_eq!(first.gallons, 0.0);
        assert_eq!(first.weather, "mist");
        assert_eq!(first.arrival, ts(8, 30));
    }

    #[test]
    fn missing_weather_is_unknown_and_free() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b")];

        let report = sim.simulate(&path, ts(8, 0), path[1], &mut NoopObserver).unwrap();
        assert!(report.steps.iter().all(|s| s.weather == "unknown"));
        assert!((report.total_gallons - 10.0 / 38.0).abs() < 1e-9);
        assert!(report.arrival > report.departure);
    }

    #[test]
    fn weather_read_at_entry_hour() {
        let g = graph();
        let mut w = WeatherTable::new();
        w.ingest(&city("c"), ts(0, 0), "fair");
        w.ingest(&city("c"), ts(1, 0), "fog");
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b"), node(&g, "c")];

        // a→b takes 12 min, so b→c is entered at 01:02 in the fog hour.
        let report = sim.simulate(&path, ts(0, 50), path[2], &mut NoopObserver).unwrap();
        let last = &report.steps[2];
        assert_eq!(last.weather, "fog");
        // (5 + 6) / 50 h = 13.2 min, truncated to 13.
        assert_eq!(last.arrival, ts(1, 15));
        assert!((last.gallons - 11.0 / 38.0).abs() < 1e-9);
        assert_eq!(last.distance, 5.0);
    }

    #[test]
    fn rounding_policy_applies() {
        let g = graph();
        let mut w = WeatherTable::new();
        w.ingest(&city("c"), ts(1, 0), "fog");
        let cfg = TripConfig { rounding: RoundingPolicy::Nearest, ..TripConfig::default() };
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "b"), node(&g, "c")];

        // 13.2 min rounds to 13.
        let report = sim.simulate(&path, ts(1, 0), path[1], &mut NoopObserver).unwrap();
        assert_eq!(report.arrival, ts(1, 13));

        let cfg = TripConfig { rounding: RoundingPolicy::Exact, ..TripConfig::default() };
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let report = sim.simulate(&path, ts(1, 0), path[1], &mut NoopObserver).unwrap();
        assert_eq!(report.arrival, ts(1, 13) + chrono::TimeDelta::seconds(12));
    }

    #[test]
    fn clock_never_rewinds() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "c"), node(&g, "b")];

        let report = sim.simulate(&path, ts(23, 50), path[2], &mut NoopObserver).unwrap();
        assert!(report.steps.windows(2).all(|p| p[0].arrival <= p[1].arrival));
        assert!(report.arrival >= report.departure);
    }

    #[test]
    fn revisits_cost_but_do_not_emit() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b"), node(&g, "a"), node(&g, "c")];

        let mut rec = Recorder::default();
        let report = sim.simulate(&path, ts(8, 0), path[3], &mut rec).unwrap();
        assert_eq!(names(&report.steps), ["a", "b", "c"]);
        assert_eq!(rec.steps, ["a", "b", "c"]);
        assert_eq!(rec.departures, 1);
        assert_eq!(report.total_distance, 40.0);
        assert!((report.total_gallons - 40.0 / 38.0).abs() < 1e-9);
    }

    #[test]
    fn stops_at_first_arrival() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b"), node(&g, "c"), node(&g, "b")];

        let report = sim.simulate(&path, ts(8, 0), node(&g, "b"), &mut NoopObserver).unwrap();
        assert_eq!(report.path, [node(&g, "a"), node(&g, "b")]);
        assert_eq!(names(&report.steps), ["a", "b"]);
        assert_eq!(report.total_distance, 10.0);
        assert_eq!(report.arrival, ts(8, 12));
    }

    #[test]
    fn single_node_path_is_zero_length() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let a = node(&g, "a");

        let report = sim.simulate(&[a], ts(8, 0), a, &mut NoopObserver).unwrap();
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.total_distance, 0.0);
        assert_eq!(report.arrival, ts(8, 0));
    }

    #[test]
    fn empty_path_is_error() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));

        let err = sim.simulate(&[], ts(8, 0), node(&g, "a"), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::EmptyPath));
    }

    #[test]
    fn broken_path_is_error() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "d")];

        let err = sim.simulate(&path, ts(8, 0), path[1], &mut NoopObserver).unwrap_err();
        match err {
            SimError::BrokenPath { from, to } => {
                assert_eq!(from, city("a"));
                assert_eq!(to, city("d"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn crawling_leg_is_clock_error() {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(city("a"), city("b"), 1e6, 1e-9, 0.0).unwrap();
        let g = b.build();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b")];

        let mut rec = Recorder::default();
        let err = sim.simulate(&path, ts(8, 0), path[1], &mut rec).unwrap_err();
        assert!(matches!(err, SimError::ClockOverflow(CoreError::ClockOverflow { .. })));
        // Only the origin was emitted before the failing leg.
        assert_eq!(rec.steps, ["a"]);
    }

    #[test]
    fn coordinates_fall_back_to_weather_table() {
        let g = graph();
        let mut w = WeatherTable::new();
        w.set_location(&city("b"), GeoPoint::new(41.07, -85.14));
        let cfg = TripConfig::default();
        let sim = TripSimulator::new(TripContext::new(&g, &w, &cfg));
        let path = [node(&g, "a"), node(&g, "b")];

        let report = sim.simulate(&path, ts(8, 0), path[1], &mut NoopObserver).unwrap();
        assert_eq!(report.steps[0].location, None);
        assert_eq!(report.steps[1].latitude(), Some(41.07));
        assert_eq!(report.steps[1].longitude(), Some(-85.14));
    }
}

// ── TripPlanner ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use wr_core::City;
    use wr_spatial::{BellmanFord, Dijkstra, RoadGraphBuilder, SolverKind, SpatialError};
    use wr_weather::WeatherTable;

    use crate::{
        NoopObserver, SimError, TripConfig, TripContext, TripOutcome, TripPlanner, TripQuery,
    };
    use super::helpers::{city, graph, names, ts, Recorder};

    #[test]
    fn prefers_shorter_detour() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::Dijkstra);

        let q = TripQuery::new(city("a"), city("c"), ts(8, 0));
        let outcome = planner.plan(&q, &mut NoopObserver).unwrap();
        let report = outcome.report().expect("arrived");

        assert_eq!(names(&report.steps), ["a", "b", "c"]);
        assert_eq!(report.solver_distance, Some(15.0));
        assert_eq!(report.total_distance, 15.0);
    }

    #[test]
    fn solvers_agree_on_trip() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let ctx = TripContext::new(&g, &w, &cfg);
        let q = TripQuery::new(city("c"), city("a"), ts(8, 0));

        let d = TripPlanner::new(ctx, Dijkstra).plan(&q, &mut NoopObserver).unwrap();
        let b = TripPlanner::new(ctx, BellmanFord).plan(&q, &mut NoopObserver).unwrap();
        assert_eq!(d, b);
    }

    #[test]
    fn disconnected_is_no_path() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let mut rec = Recorder::default();
        let q = TripQuery::new(city("a"), city("e"), ts(8, 0));
        let outcome = planner.plan(&q, &mut rec).unwrap();

        assert!(outcome.is_no_path());
        assert_eq!(rec.no_paths, 1);
        assert_eq!(rec.departures, 0);
        assert!(rec.steps.is_empty());
    }

    #[test]
    fn unknown_city_is_no_path() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let q = TripQuery::new(city("atlantis"), city("a"), ts(8, 0));
        match planner.plan(&q, &mut NoopObserver).unwrap() {
            TripOutcome::NoPath { origin, destination } => {
                assert_eq!(origin, city("atlantis"));
                assert_eq!(destination, city("a"));
            }
            other => panic!("expected no path, got {other:?}"),
        }
    }

    #[test]
    fn query_cities_are_normalized() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let q = TripQuery::new(City::new(" A ", "IN"), City::new("c", " in"), ts(8, 0));
        assert!(!planner.plan(&q, &mut NoopObserver).unwrap().is_no_path());
    }

    #[test]
    fn origin_equals_destination() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let q = TripQuery::new(city("b"), city("b"), ts(8, 0));
        let outcome = planner.plan(&q, &mut NoopObserver).unwrap();
        let report = outcome.report().expect("arrived");
        assert_eq!(names(&report.steps), ["b"]);
        assert_eq!(report.solver_distance, Some(0.0));
        assert_eq!(report.arrival, ts(8, 0));
    }

    #[test]
    fn observer_sees_whole_trip() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let mut rec = Recorder::default();
        planner.plan(&TripQuery::new(city("a"), city("c"), ts(8, 0)), &mut rec).unwrap();
        assert_eq!(rec.departures, 1);
        assert_eq!(rec.steps, ["a", "b", "c"]);
        assert_eq!(rec.arrivals, 1);
        assert_eq!(rec.no_paths, 0);
    }

    #[test]
    fn negative_cycle_aborts_query() {
        let mut b = RoadGraphBuilder::new().allow_negative_weights();
        b.add_edge(city("a"), city("b"), 1.0, 50.0, 0.0).unwrap();
        b.add_edge(city("b"), city("c"), 1.0, 50.0, 0.0).unwrap();
        b.add_edge(city("c"), city("a"), -5.0, 50.0, 0.0).unwrap();
        let g = b.build();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let ctx = TripContext::new(&g, &w, &cfg);
        let q = TripQuery::new(city("a"), city("c"), ts(8, 0));

        let err = TripPlanner::new(ctx, SolverKind::BellmanFord)
            .plan(&q, &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, SimError::Spatial(SpatialError::NegativeCycle { .. })));

        let err = TripPlanner::new(ctx, SolverKind::Dijkstra)
            .plan(&q, &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, SimError::Spatial(SpatialError::NegativeWeight)));
    }

    #[test]
    fn crawling_road_fails_plan() {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(city("a"), city("b"), 1e6, 1e-9, 0.0).unwrap();
        let g = b.build();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::Dijkstra);

        let q = TripQuery::new(city("a"), city("b"), ts(8, 0));
        let err = planner.plan(&q, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::ClockOverflow(_)));
    }

    #[test]
    fn batch_keeps_query_order() {
        let g = graph();
        let w = WeatherTable::new();
        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::default());

        let queries = [
            TripQuery::new(city("a"), city("c"), ts(8, 0)),
            TripQuery::new(city("a"), city("e"), ts(8, 0)),
            TripQuery::new(city("d"), city("e"), ts(9, 0)),
        ];
        let results = planner.plan_batch(&queries);

        assert_eq!(results.len(), 3);
        let outcomes: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(outcomes[0].report().unwrap().total_distance, 15.0);
        assert!(outcomes[1].is_no_path());
        assert_eq!(outcomes[2].report().unwrap().destination, city("e"));
    }
}

// ── TripConfig ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use wr_core::RoundingPolicy;

    use crate::{SimError, TripConfig, DEFAULT_MPG};

    #[test]
    fn defaults() {
        let cfg = TripConfig::default();
        assert_eq!(cfg.mpg, DEFAULT_MPG);
        assert_eq!(cfg.rounding, RoundingPolicy::Truncate);
        assert_eq!(cfg.penalties.penalty("lightsnow"), 7.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_mpg() {
        for mpg in [0.0, -3.0, f64::NAN] {
            let cfg = TripConfig { mpg, ..TripConfig::default() };
            assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
        }
    }
}
