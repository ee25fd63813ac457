//! trip — plan and simulate one weather-aware road trip.
//!
//! Loads a route CSV and an hourly weather CSV, finds the shortest road path
//! between two cities, then drives it hour by hour: every leg is slowed and
//! lengthened by the weather at the city being entered and by the road grade.
//!
//! ```text
//! trip --routes data/routes.csv --weather data/weather.csv \
//!      --from "Fort Wayne,IN" --to "Angola,IN" --start "03/14/2024 08:00"
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::{ArgAction, Parser};
use tracing::info;
use tracing::level_filters::LevelFilter;

use wr_core::{City, GeoPoint, RoundingPolicy, parse_timestamp};
use wr_output::{CsvWriter, TelemetryRecorder, narrative};
use wr_sim::{TripConfig, TripContext, TripPlanner, TripQuery};
use wr_spatial::{RoadGraph, RoadGraphBuilder, SolverKind, load_routes_csv};
use wr_weather::{PenaltyTable, WeatherTable, load_weather_csv};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Route CSV (state_origin, state_destination, city_origin, city_destination, distance, speed, .., gradient).
    #[arg(long)]
    routes: PathBuf,

    /// Hourly weather CSV (State, City, hour labels.., Latitude, Longitude).
    #[arg(long)]
    weather: PathBuf,

    /// Origin as "CITY,STATE".
    #[arg(long, required_unless_present = "from_coords", conflicts_with = "from_coords")]
    from: Option<City>,

    /// Origin as "LAT,LON", snapped to the nearest city with known coordinates.
    #[arg(long, allow_hyphen_values = true)]
    from_coords: Option<GeoPoint>,

    /// Destination as "CITY,STATE".
    #[arg(long)]
    to: City,

    /// Departure time, "MM/DD/YYYY HH:MM".
    #[arg(long, value_parser = parse_timestamp)]
    start: NaiveDateTime,

    /// dijkstra | bellman-ford
    #[arg(long, default_value_t = SolverKind::Dijkstra)]
    solver: SolverKind,

    /// truncate | nearest | exact (overrides the config file).
    #[arg(long)]
    rounding: Option<RoundingPolicy>,

    /// JSON trip configuration (mpg, rounding, penalties).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Two-column condition,penalty CSV (overrides the config file).
    #[arg(long)]
    penalties: Option<PathBuf>,

    /// Write the per-city telemetry CSV here.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the telemetry rows to this SQLite database (needs the
    /// `sqlite` feature).
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Print the outcome as JSON instead of the narrative.
    #[arg(long)]
    json: bool,

    /// -v info, -vv debug, -vvv trace.  Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<TripConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TripConfig::default(),
    };
    if let Some(path) = &args.penalties {
        config.penalties = PenaltyTable::from_csv(path)
            .with_context(|| format!("loading penalties {}", path.display()))?;
    }
    if let Some(rounding) = args.rounding {
        config.rounding = rounding;
    }
    config.validate()?;
    Ok(config)
}

fn load_inputs(args: &Args) -> Result<(RoadGraph, WeatherTable)> {
    let mut builder = RoadGraphBuilder::new();
    if args.solver == SolverKind::BellmanFord {
        builder = builder.allow_negative_weights();
    }
    let routes = load_routes_csv(&args.routes, &mut builder)
        .with_context(|| format!("loading routes {}", args.routes.display()))?;

    let mut weather = WeatherTable::new();
    let slots = load_weather_csv(&args.weather, &mut weather)
        .with_context(|| format!("loading weather {}", args.weather.display()))?;

    let located = weather
        .locations()
        .filter(|&(city, pos)| builder.set_location(city, pos))
        .count();

    let graph = builder.build();
    info!(
        cities = graph.node_count(),
        roads = routes.loaded,
        skipped_routes = routes.skipped,
        weather_slots = slots.slots,
        located,
        "inputs loaded"
    );
    if graph.is_empty() {
        bail!("no usable roads in {}", args.routes.display());
    }
    Ok((graph, weather))
}

fn resolve_origin(args: &Args, graph: &RoadGraph) -> Result<City> {
    if let Some(city) = &args.from {
        return Ok(city.clone());
    }
    let Some(pos) = args.from_coords else {
        bail!("either --from or --from-coords is required");
    };
    let node = graph
        .nearest_city(pos)
        .with_context(|| format!("no city with coordinates near {pos}"))?;
    let city = graph.city(node).clone();
    info!(%pos, %city, "origin snapped to nearest city");
    Ok(city)
}

fn write_outputs(args: &Args, recorder: &TelemetryRecorder) -> Result<()> {
    if let Some(path) = &args.out {
        write_csv(path, recorder)?;
    }
    #[cfg(feature = "sqlite")]
    if let Some(path) = &args.sqlite {
        let mut writer = wr_output::SqliteWriter::new(path)?;
        recorder.write_to(&mut writer)?;
        info!(path = %path.display(), rows = recorder.rows().len(), "sqlite written");
    }
    #[cfg(not(feature = "sqlite"))]
    if let Some(path) = &args.sqlite {
        bail!("{} not written: built without the `sqlite` feature", path.display());
    }
    Ok(())
}

fn write_csv(path: &Path, recorder: &TelemetryRecorder) -> Result<()> {
    let mut writer = CsvWriter::new(path)
        .with_context(|| format!("creating {}", path.display()))?;
    recorder.write_to(&mut writer)?;
    info!(path = %path.display(), rows = recorder.rows().len(), "telemetry written");
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let t0 = Instant::now();
    let config = load_config(&args)?;
    let (graph, weather) = load_inputs(&args)?;
    let origin = resolve_origin(&args, &graph)?;

    let planner = TripPlanner::new(TripContext::new(&graph, &weather, &config), args.solver);
    let query = TripQuery::new(origin, args.to.clone(), args.start);

    let mut recorder = TelemetryRecorder::new();
    let outcome = planner.plan(&query, &mut recorder)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &outcome)?;
        writeln!(out)?;
    } else {
        narrative::write_narrative(&mut out, &outcome)?;
    }

    write_outputs(&args, &recorder)?;
    info!(solver = %args.solver, elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    Ok(())
}
