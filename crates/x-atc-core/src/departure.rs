// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Departure vectoring: runway-heading climb, turn toward the first fix, then own navigation.

use crate::config::VectoringConfig;
use crate::geo::{bearing, distance_nm, heading_difference, normalize_heading, turn_direction};
use crate::navdata::WaypointLookup;
use crate::phraseology;
use crate::types::{DepartureVectoringState, FlightContext, LatLon, SimState, VectorInstruction};
use log::{debug, info};

pub struct DepartureInputs<'a> {
    pub callsign: &'a str,
    pub runway_heading: Option<f64>,
    /// First route fix with its resolved position, if any.
    pub first_fix: Option<(&'a str, LatLon)>,
    pub sim: &'a SimState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureStage {
    RunwayHeading,
    Vectoring,
    OwnNavigation,
}

impl DepartureVectoringState {
    pub fn stage(&self) -> DepartureStage {
        if self.resumed_own_navigation {
            DepartureStage::OwnNavigation
        } else if self.left_runway_heading {
            DepartureStage::Vectoring
        } else {
            DepartureStage::RunwayHeading
        }
    }
}

fn runway_heading_climb(inputs: &DepartureInputs<'_>, config: &VectoringConfig) -> VectorInstruction {
    let altitude = config.initial_climb_altitude_ft;
    VectorInstruction {
        heading: inputs.runway_heading.map(normalize_heading),
        altitude_ft: Some(altitude),
        phrase: phraseology::runway_heading_climb(inputs.callsign, altitude),
    }
}

pub fn step(
    state: &DepartureVectoringState,
    inputs: &DepartureInputs<'_>,
    config: &VectoringConfig,
) -> (DepartureVectoringState, Option<VectorInstruction>) {
    if state.resumed_own_navigation {
        return (state.clone(), None);
    }

    let sim = inputs.sim;
    let Some((fix_name, fix)) = inputs.first_fix else {
        // No usable route: keep them on runway heading up to the initial altitude.
        let instruction = (sim.altitude_ft < config.initial_climb_altitude_ft as f64)
            .then(|| runway_heading_climb(inputs, config));
        return (state.clone(), instruction);
    };

    let mut next = state.clone();
    let to_fix = bearing(sim.lat, sim.lon, fix.lat, fix.lon);

    if !next.left_runway_heading {
        if sim.altitude_ft < config.turn_altitude_ft as f64 {
            return (next, Some(runway_heading_climb(inputs, config)));
        }

        info!("{}: leaving runway heading toward {} ({:03})", inputs.callsign, fix_name, to_fix);
        next.left_runway_heading = true;
        next.target_heading = Some(to_fix);
        let altitude = config.departure_altitude_ft;
        let phrase = format!(
            "{}, climb and maintain {}.",
            phraseology::turn_heading(inputs.callsign, turn_direction(sim.heading_deg, to_fix as f64), to_fix),
            altitude
        );
        return (
            next,
            Some(VectorInstruction {
                heading: Some(to_fix),
                altitude_ft: Some(altitude),
                phrase,
            }),
        );
    }

    let distance = distance_nm(sim.lat, sim.lon, fix.lat, fix.lon);
    if distance <= config.own_navigation_range_nm {
        info!("{}: {:.1} NM from {}, resuming own navigation", inputs.callsign, distance, fix_name);
        next.resumed_own_navigation = true;
        return (
            next,
            Some(VectorInstruction {
                heading: None,
                altitude_ft: None,
                phrase: phraseology::resume_own_navigation(inputs.callsign, fix_name),
            }),
        );
    }

    if heading_difference(sim.heading_deg, to_fix as f64) > config.departure_heading_tolerance_deg {
        debug!("{}: off course to {}, re-vectoring {:03}", inputs.callsign, fix_name, to_fix);
        next.target_heading = Some(to_fix);
        let phrase = format!(
            "{}.",
            phraseology::turn_heading(inputs.callsign, turn_direction(sim.heading_deg, to_fix as f64), to_fix)
        );
        return (
            next,
            Some(VectorInstruction {
                heading: Some(to_fix),
                altitude_ft: None,
                phrase,
            }),
        );
    }

    (next, None)
}

/// Departure vectoring bound to a config. Holds no per-flight state.
#[derive(Debug, Clone, Default)]
pub struct DepartureVectoring {
    pub config: VectoringConfig,
}

impl DepartureVectoring {
    pub fn new(config: VectoringConfig) -> Self {
        Self { config }
    }

    pub fn next_instruction<L: WaypointLookup + ?Sized>(
        &self,
        ctx: &mut FlightContext,
        sim: &SimState,
        lookup: &L,
    ) -> Option<VectorInstruction> {
        let first_fix = ctx.route.first().and_then(|ident| {
            let resolved = lookup.resolve(ident);
            if resolved.is_none() {
                debug!("{}: first fix {} not found in nav data", ctx.callsign, ident);
            }
            resolved.map(|pos| (ident.as_str(), pos))
        });

        let inputs = DepartureInputs {
            callsign: &ctx.callsign,
            runway_heading: ctx.departure_runway.as_ref().map(|r| r.true_heading_deg),
            first_fix,
            sim,
        };
        let (next, instruction) = step(&ctx.departure_vectoring, &inputs, &self.config);
        ctx.departure_vectoring = next;
        instruction
    }
}
