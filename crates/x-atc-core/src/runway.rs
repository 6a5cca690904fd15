// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Wind- and performance-based runway selection.

use crate::geo::{wind_components, WindComponents};
use crate::types::{AircraftPerformanceProfile, RunwaySummary, SelectionResult, WeatherInfo};
use log::{debug, info};

/// Runway must be at least this multiple of the aircraft's required distance.
const LENGTH_MARGIN: f64 = 1.3;
const HEADWIND_WEIGHT: f64 = 2.0;
const CROSSWIND_WEIGHT: f64 = 0.5;
const LENGTH_BONUS_CAP: f64 = 50.0;
const IMC_ILS_BONUS: f64 = 40.0;
const PREFERRED_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayRole {
    Departure,
    Arrival,
}

impl RunwayRole {
    fn label(self) -> &'static str {
        match self {
            RunwayRole::Departure => "departure",
            RunwayRole::Arrival => "arrival",
        }
    }
}

pub fn runway_wind(runway: &RunwaySummary, weather: &WeatherInfo) -> WindComponents {
    match weather.wind_direction_deg {
        Some(dir) => wind_components(dir, weather.wind_speed_kt, runway.true_heading_deg),
        None => WindComponents::CALM,
    }
}

/// Why a runway was rejected, or `None` when it is usable.
pub fn rejection_reason(
    runway: &RunwaySummary,
    role: RunwayRole,
    aircraft: &AircraftPerformanceProfile,
    weather: &WeatherInfo,
) -> Option<String> {
    let wind = runway_wind(runway, weather);
    if wind.tailwind_kt() > aircraft.max_tailwind_kt {
        return Some(format!("tailwind {:.0} kt", wind.tailwind_kt()));
    }
    if wind.crosswind_kt.abs() > aircraft.max_crosswind_kt {
        return Some(format!("crosswind {:.0} kt", wind.crosswind_kt.abs()));
    }
    let required = match role {
        RunwayRole::Departure => aircraft.takeoff_distance_ft,
        RunwayRole::Arrival => aircraft.landing_distance_ft,
    };
    if runway.length_ft < required * LENGTH_MARGIN {
        return Some(format!("too short ({:.0} ft)", runway.length_ft));
    }
    if role == RunwayRole::Arrival && weather.is_imc() && !(runway.has_ils || runway.has_rnav) {
        return Some("no instrument approach in IMC".to_string());
    }
    None
}

pub fn score_runway(runway: &RunwaySummary, role: RunwayRole, weather: &WeatherInfo) -> f64 {
    let wind = runway_wind(runway, weather);
    let mut score = HEADWIND_WEIGHT * wind.headwind_kt - CROSSWIND_WEIGHT * wind.crosswind_kt.abs()
        + (runway.length_ft / 100.0).min(LENGTH_BONUS_CAP);

    if role == RunwayRole::Arrival && weather.is_imc() && runway.has_ils {
        score += IMC_ILS_BONUS;
    }
    let preferred = match role {
        RunwayRole::Departure => runway.preferred_departure,
        RunwayRole::Arrival => runway.preferred_arrival,
    };
    if preferred {
        score += PREFERRED_BONUS;
    }
    score
}

pub fn select_departure_runway(
    runways: &[RunwaySummary],
    aircraft: &AircraftPerformanceProfile,
    weather: &WeatherInfo,
) -> SelectionResult<RunwaySummary> {
    select_runway(runways, RunwayRole::Departure, aircraft, weather)
}

pub fn select_arrival_runway(
    runways: &[RunwaySummary],
    aircraft: &AircraftPerformanceProfile,
    weather: &WeatherInfo,
) -> SelectionResult<RunwaySummary> {
    select_runway(runways, RunwayRole::Arrival, aircraft, weather)
}

pub fn select_runway(
    runways: &[RunwaySummary],
    role: RunwayRole,
    aircraft: &AircraftPerformanceProfile,
    weather: &WeatherInfo,
) -> SelectionResult<RunwaySummary> {
    if runways.is_empty() {
        return SelectionResult::vectors(format!("No {} runways available", role.label()));
    }

    // Ties keep the earlier runway: only a strictly greater score replaces the leader.
    let mut best: Option<(&RunwaySummary, f64)> = None;
    for runway in runways {
        if let Some(reason) = rejection_reason(runway, role, aircraft, weather) {
            debug!("Runway {} rejected for {}: {}", runway.ident, role.label(), reason);
            continue;
        }
        let score = score_runway(runway, role, weather);
        debug!("Runway {} {} score={:.1}", runway.ident, role.label(), score);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((runway, score));
        }
    }

    if let Some((runway, score)) = best {
        let wind = runway_wind(runway, weather);
        info!("Selected {} runway {} (score {:.1})", role.label(), runway.ident, score);
        return SelectionResult::published(
            runway.clone(),
            format!(
                "Runway {} best for {}: headwind {:.0} kt, crosswind {:.0} kt, score {:.1}",
                runway.ident,
                role.label(),
                wind.headwind_kt,
                wind.crosswind_kt.abs(),
                score
            ),
        );
    }

    fallback_runway(runways, role, weather)
}

/// Least tailwind, then longest. Ignores every other limit.
fn fallback_runway(
    runways: &[RunwaySummary],
    role: RunwayRole,
    weather: &WeatherInfo,
) -> SelectionResult<RunwaySummary> {
    let mut best: Option<(&RunwaySummary, f64)> = None;
    for runway in runways {
        let tailwind = runway_wind(runway, weather).tailwind_kt();
        let better = match best {
            None => true,
            Some((current, current_tail)) => {
                tailwind < current_tail
                    || (tailwind == current_tail && runway.length_ft > current.length_ft)
            }
        };
        if better {
            best = Some((runway, tailwind));
        }
    }

    match best {
        Some((runway, tailwind)) => {
            log::warn!(
                "No {} runway within aircraft limits; falling back to {}",
                role.label(),
                runway.ident
            );
            SelectionResult::published(
                runway.clone(),
                format!(
                    "No runway within limits; fallback to runway {} (tailwind {:.0} kt, {:.0} ft)",
                    runway.ident, tailwind, runway.length_ft
                ),
            )
        }
        None => SelectionResult::vectors(format!("No {} runways available", role.label())),
    }
}
