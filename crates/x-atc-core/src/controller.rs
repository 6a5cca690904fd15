// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Per-tick entry point tying selection and vectoring together.

use crate::arrival::ArrivalVectoring;
use crate::config::VectoringConfig;
use crate::departure::DepartureVectoring;
use crate::navdata::WaypointLookup;
use crate::procedures::{select_approach, select_sid, select_star};
use crate::runway::{select_arrival_runway, select_departure_runway};
use crate::squawk;
use crate::types::{
    AircraftPerformanceProfile, ApproachSummary, FlightContext, FlightPhase, RunwaySummary,
    SidSummary, SimState, StarSummary, VectorInstruction, WeatherInfo,
};
use log::info;

/// Candidates for the departure end of a flight.
pub struct DepartureRequest<'a> {
    pub runways: &'a [RunwaySummary],
    pub sids: &'a [SidSummary],
    pub aircraft: &'a AircraftPerformanceProfile,
    pub weather: &'a WeatherInfo,
}

/// Candidates for the arrival end of a flight.
pub struct ArrivalRequest<'a> {
    pub runways: &'a [RunwaySummary],
    pub stars: &'a [StarSummary],
    pub approaches: &'a [ApproachSummary],
    pub aircraft: &'a AircraftPerformanceProfile,
    pub weather: &'a WeatherInfo,
}

/// Shared, stateless controller. All per-flight state lives on [`FlightContext`].
pub struct AtcController<L> {
    departure: DepartureVectoring,
    arrival: ArrivalVectoring,
    lookup: L,
}

impl<L: WaypointLookup> AtcController<L> {
    pub fn new(config: VectoringConfig, lookup: L) -> Self {
        Self {
            departure: DepartureVectoring::new(config.clone()),
            arrival: ArrivalVectoring::new(config),
            lookup,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Picks the departure runway and SID once; later calls keep the cached result.
    /// Also hands out a squawk code if the flight has none.
    pub fn plan_departure(&self, ctx: &mut FlightContext, request: &DepartureRequest<'_>) {
        if ctx.departure_runway_selection.is_none() {
            let result = select_departure_runway(request.runways, request.aircraft, request.weather);
            ctx.departure_runway = result.selection.clone();
            ctx.departure_runway_selection = Some(result);
        }

        if ctx.sid.is_none() {
            let runway = ctx.departure_runway.as_ref().map(|r| r.ident.as_str());
            let result = select_sid(&ctx.origin, runway, &ctx.route, request.sids);
            info!("{}: departure {:?}: {}", ctx.callsign, result.mode, result.reason);
            ctx.sid = Some(result);
        }

        if ctx.squawk.is_none() {
            let code = squawk::generate(&mut rand::thread_rng());
            info!("{}: squawk {:04}", ctx.callsign, code);
            ctx.squawk = Some(code);
        }
    }

    /// Picks the arrival runway, STAR and approach once; later calls keep the cached result.
    pub fn plan_arrival(&self, ctx: &mut FlightContext, request: &ArrivalRequest<'_>) {
        if ctx.arrival_runway_selection.is_none() {
            let result = select_arrival_runway(request.runways, request.aircraft, request.weather);
            ctx.arrival_runway = result.selection.clone();
            ctx.arrival_runway_selection = Some(result);
        }

        let runway = ctx.arrival_runway.as_ref().map(|r| r.ident.clone());
        if ctx.star.is_none() {
            let result = select_star(&ctx.destination, runway.as_deref(), &ctx.route, request.stars);
            info!("{}: arrival {:?}: {}", ctx.callsign, result.mode, result.reason);
            ctx.star = Some(result);
        }

        if ctx.approach.is_none() {
            let result = select_approach(
                &ctx.destination,
                runway.as_deref(),
                request.weather,
                ctx.selected_star(),
                request.approaches,
            );
            info!("{}: approach {:?}: {}", ctx.callsign, result.mode, result.reason);
            ctx.approach = Some(result);
        }
    }

    /// Runs the vectoring machine for the current phase and records what was cleared.
    pub fn tick(&self, ctx: &mut FlightContext, sim: &SimState) -> Option<VectorInstruction> {
        let instruction = match ctx.phase {
            FlightPhase::Departure => self.departure.next_instruction(ctx, sim, &self.lookup),
            FlightPhase::Arrival => self.arrival.next_instruction(ctx, sim, &self.lookup),
            FlightPhase::Preflight | FlightPhase::Enroute | FlightPhase::Landed => None,
        }?;

        if let Some(heading) = instruction.heading {
            ctx.cleared_heading = Some(heading);
        }
        if let Some(altitude) = instruction.altitude_ft {
            ctx.cleared_altitude_ft = Some(altitude);
        }
        // Own navigation and approach clearances release the assigned heading.
        if instruction.heading.is_none() && instruction.altitude_ft.is_none() {
            ctx.cleared_heading = None;
        }
        Some(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navdata::FixTable;
    use crate::types::{LatLon, SelectionMode};

    fn controller() -> AtcController<FixTable> {
        let mut fixes = FixTable::new();
        fixes.insert("MERIT", LatLon::new(0.5, 0.0));
        AtcController::new(VectoringConfig::default(), fixes)
    }

    fn runway(ident: &str, heading: f64) -> RunwaySummary {
        RunwaySummary {
            ident: ident.into(),
            true_heading_deg: heading,
            length_ft: 10000.0,
            has_ils: true,
            has_rnav: false,
            preferred_departure: false,
            preferred_arrival: false,
        }
    }

    fn aircraft() -> AircraftPerformanceProfile {
        AircraftPerformanceProfile {
            max_tailwind_kt: 10.0,
            max_crosswind_kt: 25.0,
            takeoff_distance_ft: 6000.0,
            landing_distance_ft: 5000.0,
        }
    }

    #[test]
    fn test_plan_departure_caches_selection() {
        let atc = controller();
        let mut ctx = FlightContext::new("JBU 9", "KJFK", "KBOS", vec!["MERIT".into()]);
        let runways = vec![runway("04L", 40.0), runway("22R", 220.0)];
        let weather = WeatherInfo {
            wind_direction_deg: Some(220.0),
            wind_speed_kt: 12.0,
            ..Default::default()
        };
        let request = DepartureRequest {
            runways: &runways,
            sids: &[],
            aircraft: &aircraft(),
            weather: &weather,
        };

        atc.plan_departure(&mut ctx, &request);
        assert_eq!(ctx.departure_runway.as_ref().unwrap().ident, "22R");
        assert_eq!(ctx.sid.as_ref().unwrap().mode, SelectionMode::Vectors);
        let squawk = ctx.squawk.unwrap();

        // Wind shift after planning does not change the cached choice
        let shifted = WeatherInfo {
            wind_direction_deg: Some(40.0),
            ..weather.clone()
        };
        let request = DepartureRequest {
            weather: &shifted,
            ..request
        };
        atc.plan_departure(&mut ctx, &request);
        assert_eq!(ctx.departure_runway.as_ref().unwrap().ident, "22R");
        assert_eq!(ctx.squawk, Some(squawk));
    }

    #[test]
    fn test_tick_dispatches_by_phase() {
        let atc = controller();
        let mut ctx = FlightContext::new("JBU 9", "KJFK", "KBOS", vec!["MERIT".into()]);
        ctx.departure_runway = Some(runway("26", 260.0));
        let sim = SimState {
            lat: 0.0,
            lon: 0.0,
            altitude_ft: 800.0,
            heading_deg: 260.0,
            ground_speed_kt: 150.0,
            on_ground: false,
        };

        assert!(atc.tick(&mut ctx, &sim).is_none());

        ctx.phase = FlightPhase::Departure;
        let instr = atc.tick(&mut ctx, &sim).unwrap();
        assert_eq!(instr.heading, Some(260));
        assert_eq!(ctx.cleared_heading, Some(260));
        assert_eq!(ctx.cleared_altitude_ft, Some(3000));
    }
}
