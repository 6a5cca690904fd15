// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Deserialize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};
use x_atc_core::apt_dat::AptDatParser;
use x_atc_core::controller::{ArrivalRequest, DepartureRequest};
use x_atc_core::weather::decode_metar;
use x_atc_core::{
    AircraftPerformanceProfile, ApproachSummary, AtcController, FixTable, FlightContext,
    FlightPhase, LatLon, RunwaySummary, SelectionResult, SidSummary, SimState, StarSummary,
    VectorInstruction, VectoringConfig, WeatherInfo,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the vectoring config (JSON)
    #[arg(short, long, env = "X_ATC_CONFIG")]
    config: Option<PathBuf>,

    /// Log selection and vectoring decisions
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a flight and replay its departure and arrival tracks
    Simulate { scenario: PathBuf },
    /// Decode a METAR report
    Metar { raw: String },
    /// Write the default vectoring config
    InitConfig,
}

#[derive(Deserialize)]
struct FlightPlan {
    callsign: String,
    origin: String,
    destination: String,
    #[serde(default)]
    route: Vec<String>,
}

#[derive(Deserialize)]
struct FixEntry {
    ident: String,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeatherInput {
    Metar(String),
    Decoded(WeatherInfo),
}

impl WeatherInput {
    fn resolve(&self) -> WeatherInfo {
        match self {
            WeatherInput::Metar(raw) => decode_metar(raw).weather,
            WeatherInput::Decoded(info) => info.clone(),
        }
    }
}

#[derive(Deserialize)]
struct Scenario {
    flight: FlightPlan,
    aircraft: AircraftPerformanceProfile,
    #[serde(default)]
    fixes: Vec<FixEntry>,
    /// CSV of `ident,lat,lon`, relative to the scenario file
    #[serde(default)]
    fix_file: Option<PathBuf>,
    /// apt.dat used when a runway list is left empty
    #[serde(default)]
    apt_dat: Option<PathBuf>,
    #[serde(default)]
    origin_runways: Vec<RunwaySummary>,
    #[serde(default)]
    destination_runways: Vec<RunwaySummary>,
    #[serde(default)]
    sids: Vec<SidSummary>,
    #[serde(default)]
    stars: Vec<StarSummary>,
    #[serde(default)]
    approaches: Vec<ApproachSummary>,
    #[serde(default)]
    origin_weather: Option<WeatherInput>,
    #[serde(default)]
    destination_weather: Option<WeatherInput>,
    #[serde(default)]
    departure_track: Vec<SimState>,
    #[serde(default)]
    arrival_track: Vec<SimState>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);

    let config_path = cli.config.unwrap_or_else(VectoringConfig::default_path);

    match &cli.command {
        Commands::Simulate { scenario } => {
            let config = VectoringConfig::load(&config_path)?;
            info!("Vectoring config from {:?}", config_path);
            simulate(scenario, config)?;
        }
        Commands::Metar { raw } => {
            let decoded = decode_metar(raw);
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Commands::InitConfig => {
            VectoringConfig::default().save(&config_path)?;
            println!("Wrote default vectoring config to {:?}", config_path);
        }
    }

    Ok(())
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read scenario {:?}", path))?;
    let scenario: Scenario = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {:?}", path))?;
    info!(
        "Scenario {:?}: {} {} -> {}, {} departure / {} arrival ticks",
        path,
        scenario.flight.callsign,
        scenario.flight.origin,
        scenario.flight.destination,
        scenario.departure_track.len(),
        scenario.arrival_track.len()
    );
    Ok(scenario)
}

fn build_fix_table(scenario: &Scenario, base: &Path) -> Result<FixTable> {
    let mut fixes = match &scenario.fix_file {
        Some(file) => FixTable::from_csv_file(base.join(file))
            .with_context(|| format!("Failed to load fixes from {:?}", file))?,
        None => FixTable::new(),
    };
    for fix in &scenario.fixes {
        fixes.insert(&fix.ident, LatLon::new(fix.lat, fix.lon));
    }
    debug!("{} fixes available", fixes.len());
    Ok(fixes)
}

fn runways_for(
    listed: &[RunwaySummary],
    apt_dat: Option<&Path>,
    icao: &str,
) -> Result<Vec<RunwaySummary>> {
    match apt_dat {
        Some(path) if listed.is_empty() => {
            info!("Loading {} runways from {:?}", icao, path);
            AptDatParser::runways_from_file(path, icao)
                .with_context(|| format!("Failed to read runways for {} from {:?}", icao, path))
        }
        _ => Ok(listed.to_vec()),
    }
}

fn print_selection<T>(label: &str, result: Option<&SelectionResult<T>>) {
    if let Some(result) = result {
        println!("  {:<10} {:?}: {}", label, result.mode, result.reason);
    }
}

fn print_instruction(tag: &str, tick: usize, instruction: &VectorInstruction) {
    let heading = instruction
        .heading
        .map_or_else(|| "---".to_string(), |h| format!("{:03}", h));
    let altitude = instruction
        .altitude_ft
        .map_or_else(|| "-----".to_string(), |a| format!("{:>5}", a));
    println!("[{} {:>3}] hdg {} alt {}  {}", tag, tick, heading, altitude, instruction.phrase);
}

fn simulate(path: &Path, config: VectoringConfig) -> Result<()> {
    let scenario = load_scenario(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let apt_dat = scenario.apt_dat.as_ref().map(|p| base.join(p));

    let fixes = build_fix_table(&scenario, base)?;
    let origin_runways = runways_for(&scenario.origin_runways, apt_dat.as_deref(), &scenario.flight.origin)?;
    let destination_runways = runways_for(
        &scenario.destination_runways,
        apt_dat.as_deref(),
        &scenario.flight.destination,
    )?;
    let origin_weather = scenario.origin_weather.as_ref().map(WeatherInput::resolve).unwrap_or_default();
    let destination_weather = scenario
        .destination_weather
        .as_ref()
        .map(WeatherInput::resolve)
        .unwrap_or_default();

    let plan = &scenario.flight;
    let atc = AtcController::new(config, fixes);
    let mut ctx = FlightContext::new(&plan.callsign, &plan.origin, &plan.destination, plan.route.clone());

    atc.plan_departure(
        &mut ctx,
        &DepartureRequest {
            runways: &origin_runways,
            sids: &scenario.sids,
            aircraft: &scenario.aircraft,
            weather: &origin_weather,
        },
    );
    atc.plan_arrival(
        &mut ctx,
        &ArrivalRequest {
            runways: &destination_runways,
            stars: &scenario.stars,
            approaches: &scenario.approaches,
            aircraft: &scenario.aircraft,
            weather: &destination_weather,
        },
    );

    println!("{} {} -> {}", ctx.callsign, ctx.origin, ctx.destination);
    if let Some(code) = ctx.squawk {
        println!("  squawk     {:04}", code);
    }
    print_selection("runway", ctx.departure_runway_selection.as_ref());
    print_selection("SID", ctx.sid.as_ref());
    print_selection("runway", ctx.arrival_runway_selection.as_ref());
    print_selection("STAR", ctx.star.as_ref());
    print_selection("approach", ctx.approach.as_ref());

    ctx.phase = FlightPhase::Departure;
    for (tick, sim) in scenario.departure_track.iter().enumerate() {
        if let Some(instruction) = atc.tick(&mut ctx, sim) {
            print_instruction("DEP", tick, &instruction);
        }
    }

    ctx.phase = FlightPhase::Arrival;
    for (tick, sim) in scenario.arrival_track.iter().enumerate() {
        if let Some(instruction) = atc.tick(&mut ctx, sim) {
            print_instruction("ARR", tick, &instruction);
        }
    }

    if ctx.arrival_vectoring.cleared_for_approach {
        ctx.phase = FlightPhase::Landed;
    }
    println!("Final phase: {:?}", ctx.phase);
    Ok(())
}
