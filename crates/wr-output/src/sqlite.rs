//! SQLite output backend (feature `sqlite`).
//!
//! One `trip_steps` table.  Each `write_steps` call is one trip and gets the
//! next `trip` number; `seq` is the step's position within the trip.

use std::path::Path;

use rusqlite::Connection;

use wr_core::format_timestamp;

use crate::writer::OutputWriter;
use crate::{OutputResult, TelemetryRow};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS trip_steps (
        trip      INTEGER NOT NULL,
        seq       INTEGER NOT NULL,
        city      TEXT    NOT NULL,
        state     TEXT    NOT NULL,
        distance  REAL    NOT NULL,
        gallons   REAL    NOT NULL,
        weather   TEXT    NOT NULL,
        latitude  REAL,
        longitude REAL,
        arrival   TEXT    NOT NULL,
        PRIMARY KEY (trip, seq)
    );";

/// Writes trip telemetry to an SQLite database.
pub struct SqliteWriter {
    conn:      Connection,
    next_trip: i64,
    finished:  bool,
}

impl SqliteWriter {
    /// Open (or create) the database at `path` and initialise the schema.
    ///
    /// Trip numbers continue after any trips already in the table.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Use an already-open connection (e.g. `Connection::open_in_memory`).
    pub fn with_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(SCHEMA)?;
        let next_trip: i64 =
            conn.query_row("SELECT COALESCE(MAX(trip) + 1, 0) FROM trip_steps", [], |r| r.get(0))?;
        Ok(Self { conn, next_trip, finished: false })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl OutputWriter for SqliteWriter {
    fn write_steps(&mut self, rows: &[TelemetryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let trip = self.next_trip;
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trip_steps \
                 (trip, seq, city, state, distance, gallons, weather, latitude, longitude, arrival) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (seq, row) in rows.iter().enumerate() {
                stmt.execute(rusqlite::params![
                    trip,
                    seq as i64,
                    row.city,
                    row.state,
                    row.distance,
                    row.gallons,
                    row.weather,
                    row.latitude,
                    row.longitude,
                    format_timestamp(row.arrival),
                ])?;
            }
        }
        tx.commit()?;
        self.next_trip += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}
