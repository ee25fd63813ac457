//! Tests for wr-output.

#[cfg(test)]
mod helpers {
    use chrono::{NaiveDate, NaiveDateTime};

    use wr_core::{City, GeoPoint};
    use wr_sim::{TripConfig, TripContext, TripOutcome, TripPlanner, TripQuery};
    use wr_spatial::{RoadGraphBuilder, SolverKind};
    use wr_weather::WeatherTable;

    use crate::{TelemetryRecorder, TelemetryRow};

    pub fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    pub fn city(name: &str) -> City {
        City::new(name, "in")
    }

    pub fn row(city: &str, gallons: f64, lat: Option<f64>) -> TelemetryRow {
        TelemetryRow {
            city:      city.to_owned(),
            state:     "in".to_owned(),
            distance:  12.5,
            gallons,
            weather:   "fair".to_owned(),
            latitude:  lat,
            longitude: lat.map(|l| -l),
            arrival:   ts(8, 0),
        }
    }

    /// Plan fortwayne → auburn → angola (weather at auburn only) and return
    /// the outcome plus everything the recorder saw.
    pub fn trip(to: &str) -> (TripOutcome, TelemetryRecorder) {
        let mut b = RoadGraphBuilder::new();
        b.add_edge(city("fortwayne"), city("auburn"), 26.0, 60.0, 0.0).unwrap();
        b.add_edge(city("auburn"), city("angola"), 30.0, 60.0, 0.0).unwrap();
        b.add_edge(city("muncie"), city("anderson"), 19.0, 60.0, 0.0).unwrap();
        b.set_location(&city("fortwayne"), GeoPoint::new(41.08, -85.14));
        b.set_location(&city("angola"), GeoPoint::new(41.63, -85.00));
        let g = b.build();

        let mut w = WeatherTable::new();
        w.ingest(&city("auburn"), ts(8, 0), "lightrain");

        let cfg = TripConfig::default();
        let planner = TripPlanner::new(TripContext::new(&g, &w, &cfg), SolverKind::Dijkstra);

        let mut rec = TelemetryRecorder::new();
        let q = TripQuery::new(city("fortwayne"), city(to), ts(8, 0));
        let outcome = planner.plan(&q, &mut rec).unwrap();
        (outcome, rec)
    }
}

// ── TelemetryRecorder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod recorder {
    use super::helpers::trip;

    #[test]
    fn one_row_per_step() {
        let (outcome, rec) = trip("angola");
        let report = outcome.report().unwrap();

        assert_eq!(rec.rows().len(), report.steps.len());
        let cities: Vec<_> = rec.rows().iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["fortwayne", "auburn", "angola"]);

        let auburn = &rec.rows()[1];
        assert_eq!(auburn.state, "in");
        assert_eq!(auburn.distance, 26.0);
        assert_eq!(auburn.weather, "lightrain");
        // (26 + 4) / 38
        assert!((auburn.gallons - 30.0 / 38.0).abs() < 1e-9);
        assert_eq!(auburn.latitude, None);
        assert_eq!(rec.rows()[0].latitude, Some(41.08));
    }

    #[test]
    fn header_columns() {
        let (_, rec) = trip("angola");
        assert_eq!(
            rec.header(),
            ["City", "State", "Distance", "Gallons", "Weather", "Latitude", "Longitude"]
        );
    }

    #[test]
    fn no_path_records_nothing() {
        let (outcome, rec) = trip("muncie");
        assert!(outcome.is_no_path());
        assert!(rec.is_empty());
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;
    use super::helpers::{row, trip};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_and_rows() {
        let mut w = CsvWriter::from_writer(Vec::new()).unwrap();
        w.write_steps(&[row("a", 0.0, Some(41.5)), row("b", 1.0 / 3.0, None)]).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "City,State,Distance,Gallons,Weather,Latitude,Longitude");
        assert_eq!(lines[1], "a,in,12.5,0.00,fair,41.5,-41.5");
        assert_eq!(lines[2], "b,in,12.5,0.33,fair,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn file_created_with_header() {
        let dir = tmp();
        let path = dir.path().join("trip.csv");
        let mut w = CsvWriter::new(&path).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["City", "State", "Distance", "Gallons", "Weather", "Latitude", "Longitude"]);
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(&dir.path().join("trip.csv")).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn recorder_to_file() {
        let dir = tmp();
        let path = dir.path().join("trip.csv");
        let (_, rec) = trip("angola");
        rec.write_to(&mut CsvWriter::new(&path).unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "fortwayne");
        assert_eq!(&rows[0][2], "0");
        assert_eq!(&rows[0][3], "0.00");
        assert_eq!(&rows[0][5], "41.08");
        assert_eq!(&rows[1][3], "0.79");
        assert_eq!(&rows[1][4], "lightrain");
        assert_eq!(&rows[1][5], "");
        assert_eq!(&rows[2][0], "angola");
    }
}

// ── Narrative ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod narrative {
    use crate::narrative::{render, write_narrative};
    use super::helpers::trip;

    #[test]
    fn render_matches_writer() {
        for to in ["angola", "anderson"] {
            let (outcome, _) = trip(to);
            let mut buf = Vec::new();
            write_narrative(&mut buf, &outcome).unwrap();
            assert_eq!(render(&outcome).unwrap(), String::from_utf8(buf).unwrap());
        }
    }

    #[test]
    fn no_path_message() {
        let (outcome, _) = trip("anderson");
        assert_eq!(render(&outcome).unwrap(), "No path found from fortwayne, in to anderson, in\n");
    }

    #[test]
    fn arrived_printout() {
        let (outcome, _) = trip("angola");
        let text = render(&outcome).unwrap();

        assert!(text.starts_with("Origin: fortwayne, in\nDeparture: 03/14/2024 08:00\n"));
        assert!(text.contains("Starting Latitude: 41.08, Longitude: -85.14\n"));
        // 30 adjusted miles at 60 mph = 30 min.
        assert!(text.contains(
            "----> auburn, in --distance 26.00 miles --ETA: 03/14/2024 08:30 \
             --Gallons required: 0.79 --Weather: lightrain\n"
        ));
        assert!(text.contains("City Attributes for the Shortest Path:\n"));
        assert!(text.contains("Shortest distance from fortwayne, in to angola, in: 56.00, total gallons: 1.58\n"));
        assert!(text.contains("Straight-line distance: "));
        assert!(text.trim_end().ends_with("End Time: 03/14/2024 09:00"));
    }

    #[test]
    fn table_is_fixed_width() {
        let (outcome, _) = trip("angola");
        let text = render(&outcome).unwrap();
        let header = text
            .lines()
            .find(|l| l.starts_with("City                State"))
            .expect("table header");
        assert_eq!(&header[..20], "City                ");
        assert_eq!(&header[20..40], "State               ");
        assert!(header.ends_with("Longitude"));

        let auburn = text.lines().find(|l| l.starts_with("auburn ")).unwrap();
        assert_eq!(&auburn[40..45], "26.00");
        assert_eq!(&auburn[80..89], "lightrain");
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;
    use tempfile::TempDir;

    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;
    use super::helpers::{row, trip};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn db_created() {
        let dir = tmp();
        let mut w = SqliteWriter::new(&dir.path().join("trips.db")).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("trips.db").exists());
    }

    #[test]
    fn steps_stored_in_order() {
        let (_, rec) = trip("angola");
        let mut w = SqliteWriter::with_connection(Connection::open_in_memory().unwrap()).unwrap();
        rec.write_to(&mut w).unwrap();

        let conn = w.connection();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trip_steps WHERE trip = 0", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let (city, weather, lat): (String, String, Option<f64>) = conn
            .query_row(
                "SELECT city, weather, latitude FROM trip_steps WHERE trip = 0 AND seq = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(city, "auburn");
        assert_eq!(weather, "lightrain");
        assert_eq!(lat, None);
    }

    #[test]
    fn trips_numbered_across_reopen() {
        let dir = tmp();
        let path = dir.path().join("trips.db");
        {
            let mut w = SqliteWriter::new(&path).unwrap();
            w.write_steps(&[row("a", 1.0, None)]).unwrap();
            w.write_steps(&[row("b", 1.0, None)]).unwrap();
            w.finish().unwrap();
        }
        let mut w = SqliteWriter::new(&path).unwrap();
        w.write_steps(&[row("c", 1.0, Some(40.0))]).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(&path).unwrap();
        let city: String = conn
            .query_row("SELECT city FROM trip_steps WHERE trip = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(city, "c");
    }
}
