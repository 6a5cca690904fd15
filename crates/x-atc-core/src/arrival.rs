// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Arrival vectoring: position the aircraft, set up the intercept, clear the approach.
//!
//! `step` is a pure transition over [`ArrivalVectoringState`]; [`ArrivalVectoring`]
//! wraps it with the waypoint lookup and writes the new state back to the flight.

use crate::config::VectoringConfig;
use crate::geo::{bearing, distance_nm, heading_difference, normalize_heading, turn_direction};
use crate::navdata::WaypointLookup;
use crate::phraseology;
use crate::types::{
    ApproachSummary, ArrivalPhase, ArrivalVectoringState, FlightContext, LatLon, SimState,
    VectorInstruction,
};
use log::{debug, info, warn};

pub struct ArrivalInputs<'a> {
    pub callsign: &'a str,
    pub runway: &'a str,
    pub approach: Option<&'a ApproachSummary>,
    pub sim: &'a SimState,
}

impl ArrivalInputs<'_> {
    fn approach_kind(&self) -> &'static str {
        self.approach.map_or("ILS", |a| a.clearance_kind())
    }
}

/// Stores the intercept point and final course on a fresh state.
pub fn initialize(
    state: &ArrivalVectoringState,
    intercept: LatLon,
    final_course: f64,
) -> ArrivalVectoringState {
    ArrivalVectoringState {
        intercept_lat: Some(intercept.lat),
        intercept_lon: Some(intercept.lon),
        final_course: Some(final_course),
        ..state.clone()
    }
}

pub fn step(
    state: &ArrivalVectoringState,
    inputs: &ArrivalInputs<'_>,
    config: &VectoringConfig,
) -> (ArrivalVectoringState, Option<VectorInstruction>) {
    if state.cleared_for_approach {
        return (state.clone(), None);
    }
    let (Some(point), Some(course)) = (state.intercept_point(), state.final_course) else {
        return (state.clone(), None);
    };

    let sim = inputs.sim;
    let mut next = state.clone();
    let distance = distance_nm(sim.lat, sim.lon, point.lat, point.lon);

    if next.phase == ArrivalPhase::Positioning {
        if distance > config.intercept_range_nm {
            return (next, positioning_instruction(inputs, point, config));
        }
        info!(
            "{}: {:.1} NM from intercept point, turning to intercept",
            inputs.callsign, distance
        );
        next.phase = ArrivalPhase::Intercepting;
    }

    if next.phase == ArrivalPhase::Intercepting {
        // Distance to the intercept point stands in for cross-track distance.
        if distance > config.established_range_nm {
            let target = normalize_heading(course - config.intercept_offset_deg);
            let altitude = config.intercept_altitude_ft;
            let phrase = format!(
                "{}, descend and maintain {}, vectors {} approach runway {}.",
                phraseology::turn_heading(inputs.callsign, turn_direction(sim.heading_deg, target as f64), target),
                altitude,
                inputs.approach_kind(),
                inputs.runway
            );
            return (
                next,
                Some(VectorInstruction {
                    heading: Some(target),
                    altitude_ft: Some(altitude),
                    phrase,
                }),
            );
        }
        info!("{}: established near final course", inputs.callsign);
        next.phase = ArrivalPhase::Established;
    }

    if heading_difference(sim.heading_deg, course) > config.final_heading_tolerance_deg {
        let heading = normalize_heading(course);
        let altitude = config.final_altitude_ft;
        let phrase = format!(
            "{}, maintain {} until established.",
            phraseology::turn_heading(inputs.callsign, turn_direction(sim.heading_deg, course), heading),
            altitude
        );
        return (
            next,
            Some(VectorInstruction {
                heading: Some(heading),
                altitude_ft: Some(altitude),
                phrase,
            }),
        );
    }

    info!(
        "{}: cleared {} approach runway {}",
        inputs.callsign,
        inputs.approach_kind(),
        inputs.runway
    );
    next.cleared_for_approach = true;
    let phrase = phraseology::cleared_approach(inputs.callsign, inputs.approach_kind(), inputs.runway);
    (
        next,
        Some(VectorInstruction {
            heading: None,
            altitude_ft: None,
            phrase,
        }),
    )
}

fn positioning_instruction(
    inputs: &ArrivalInputs<'_>,
    point: LatLon,
    config: &VectoringConfig,
) -> Option<VectorInstruction> {
    let sim = inputs.sim;
    let to_point = bearing(sim.lat, sim.lon, point.lat, point.lon);
    let altitude = config.positioning_altitude_ft;

    if heading_difference(sim.heading_deg, to_point as f64) > config.positioning_heading_tolerance_deg {
        let phrase = format!(
            "{}, descend and maintain {}.",
            phraseology::turn_heading(inputs.callsign, turn_direction(sim.heading_deg, to_point as f64), to_point),
            altitude
        );
        return Some(VectorInstruction {
            heading: Some(to_point),
            altitude_ft: Some(altitude),
            phrase,
        });
    }

    if sim.altitude_ft > altitude as f64 {
        return Some(VectorInstruction {
            heading: None,
            altitude_ft: Some(altitude),
            phrase: phraseology::descend(inputs.callsign, altitude),
        });
    }
    None
}

/// Arrival vectoring bound to a config. Holds no per-flight state.
#[derive(Debug, Clone, Default)]
pub struct ArrivalVectoring {
    pub config: VectoringConfig,
}

impl ArrivalVectoring {
    pub fn new(config: VectoringConfig) -> Self {
        Self { config }
    }

    /// Next instruction for this tick, or `None` to continue the previous clearance.
    pub fn next_instruction<L: WaypointLookup + ?Sized>(
        &self,
        ctx: &mut FlightContext,
        sim: &SimState,
        lookup: &L,
    ) -> Option<VectorInstruction> {
        if ctx.arrival_vectoring.cleared_for_approach {
            return None;
        }

        let runway = match ctx.arrival_runway.as_ref() {
            Some(r) => r,
            None => {
                debug!("{}: no arrival runway assigned; no vectors", ctx.callsign);
                return None;
            }
        };

        if ctx.arrival_vectoring.intercept_point().is_none() {
            let Some(last_fix) = ctx.route.last() else {
                debug!("{}: empty route; cannot derive intercept point", ctx.callsign);
                return None;
            };
            let Some(point) = lookup.resolve(last_fix) else {
                warn!("{}: intercept fix {} not found in nav data", ctx.callsign, last_fix);
                return None;
            };
            debug!(
                "{}: intercept point {} ({:.4}, {:.4}) final course {:.0}",
                ctx.callsign, last_fix, point.lat, point.lon, runway.true_heading_deg
            );
            ctx.arrival_vectoring = initialize(&ctx.arrival_vectoring, point, runway.true_heading_deg);
        }

        let inputs = ArrivalInputs {
            callsign: &ctx.callsign,
            runway: &runway.ident,
            approach: ctx.selected_approach(),
            sim,
        };
        let (next, instruction) = step(&ctx.arrival_vectoring, &inputs, &self.config);
        debug_assert!(next.phase >= ctx.arrival_vectoring.phase);
        ctx.arrival_vectoring = next;
        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navdata::FixTable;
    use crate::types::RunwaySummary;

    // Intercept fix at the origin; final course 090.
    fn state_at_origin() -> ArrivalVectoringState {
        initialize(&ArrivalVectoringState::default(), LatLon::new(0.0, 0.0), 90.0)
    }

    fn sim(lat: f64, lon: f64, alt: f64, hdg: f64) -> SimState {
        SimState {
            lat,
            lon,
            altitude_ft: alt,
            heading_deg: hdg,
            ground_speed_kt: 220.0,
            on_ground: false,
        }
    }

    fn inputs<'a>(sim: &'a SimState) -> ArrivalInputs<'a> {
        ArrivalInputs {
            callsign: "BAW 12",
            runway: "09",
            approach: None,
            sim,
        }
    }

    #[test]
    fn test_positioning_turn_and_descend() {
        // 20 NM due west of the fix: bearing 090, flying 070 (20 degrees off)
        let s = sim(0.0, -20.0 / 60.0, 8000.0, 70.0);
        let (next, instr) = step(&state_at_origin(), &inputs(&s), &VectoringConfig::default());

        let instr = instr.unwrap();
        assert_eq!(next.phase, ArrivalPhase::Positioning);
        assert_eq!(instr.heading, Some(90));
        assert_eq!(instr.altitude_ft, Some(7000));
        assert!(instr.phrase.contains("turn right heading 090"));
    }

    #[test]
    fn test_positioning_descend_only_then_silent() {
        let s = sim(0.0, -20.0 / 60.0, 9000.0, 95.0);
        let (_, instr) = step(&state_at_origin(), &inputs(&s), &VectoringConfig::default());
        let instr = instr.unwrap();
        assert_eq!(instr.heading, None);
        assert_eq!(instr.altitude_ft, Some(7000));

        let s = sim(0.0, -20.0 / 60.0, 7000.0, 95.0);
        let (_, instr) = step(&state_at_origin(), &inputs(&s), &VectoringConfig::default());
        assert!(instr.is_none());
    }

    #[test]
    fn test_falls_through_to_intercept_same_tick() {
        let s = sim(0.0, -10.0 / 60.0, 6000.0, 90.0);
        let (next, instr) = step(&state_at_origin(), &inputs(&s), &VectoringConfig::default());

        assert_eq!(next.phase, ArrivalPhase::Intercepting);
        let instr = instr.unwrap();
        assert_eq!(instr.heading, Some(0));
        assert_eq!(instr.altitude_ft, Some(5000));
    }

    #[test]
    fn test_established_turn_then_cleared() {
        let config = VectoringConfig::default();
        // Inside 2 NM but heading well off the final course
        let s = sim(0.0, -1.0 / 60.0, 4000.0, 40.0);
        let (next, instr) = step(&state_at_origin(), &inputs(&s), &config);
        assert_eq!(next.phase, ArrivalPhase::Established);
        assert!(!next.cleared_for_approach);
        let instr = instr.unwrap();
        assert_eq!(instr.heading, Some(90));
        assert_eq!(instr.altitude_ft, Some(4000));
        assert!(instr.phrase.contains("until established"));

        let s = sim(0.0, -0.5 / 60.0, 4000.0, 86.0);
        let (cleared, instr) = step(&next, &inputs(&s), &config);
        assert!(cleared.cleared_for_approach);
        let instr = instr.unwrap();
        assert_eq!(instr.heading, None);
        assert_eq!(instr.phrase, "BAW one two, cleared ILS approach runway 09.");
    }

    #[test]
    fn test_cleared_is_terminal() {
        let mut state = state_at_origin();
        state.phase = ArrivalPhase::Established;
        state.cleared_for_approach = true;

        for (lat, lon, hdg) in [(0.0, -1.0, 270.0), (0.5, 0.5, 10.0), (0.0, 0.0, 90.0)] {
            let s = sim(lat, lon, 9000.0, hdg);
            let (next, instr) = step(&state, &inputs(&s), &VectoringConfig::default());
            assert!(instr.is_none());
            assert_eq!(next, state);
        }
    }

    #[test]
    fn test_uninitialized_state_is_inert() {
        let s = sim(0.0, -1.0, 9000.0, 0.0);
        let state = ArrivalVectoringState::default();
        let (next, instr) = step(&state, &inputs(&s), &VectoringConfig::default());
        assert!(instr.is_none());
        assert_eq!(next, state);
    }

    fn arrival_context(route: &[&str]) -> FlightContext {
        let mut ctx = FlightContext::new(
            "DAL 45",
            "KJFK",
            "KBOS",
            route.iter().map(|s| s.to_string()).collect(),
        );
        ctx.arrival_runway = Some(RunwaySummary {
            ident: "09".into(),
            true_heading_deg: 90.0,
            length_ft: 9000.0,
            has_ils: true,
            has_rnav: false,
            preferred_departure: false,
            preferred_arrival: false,
        });
        ctx
    }

    #[test]
    fn test_wrapper_initializes_from_last_route_fix() {
        let mut fixes = FixTable::new();
        fixes.insert("FINAL", LatLon::new(0.0, 0.0));
        let mut ctx = arrival_context(&["MERIT", "final"]);

        let vectoring = ArrivalVectoring::default();
        let s = sim(0.0, -20.0 / 60.0, 8000.0, 70.0);
        let instr = vectoring.next_instruction(&mut ctx, &s, &fixes);

        assert!(instr.is_some());
        assert_eq!(ctx.arrival_vectoring.final_course, Some(90.0));
        assert_eq!(ctx.arrival_vectoring.intercept_point(), Some(LatLon::new(0.0, 0.0)));
    }

    #[test]
    fn test_wrapper_degrades_without_nav_data() {
        let fixes = FixTable::new();
        let vectoring = ArrivalVectoring::default();
        let s = sim(0.0, -1.0, 8000.0, 70.0);

        let mut unresolved = arrival_context(&["NOWHERE"]);
        assert!(vectoring.next_instruction(&mut unresolved, &s, &fixes).is_none());
        assert_eq!(unresolved.arrival_vectoring, ArrivalVectoringState::default());

        let mut empty = arrival_context(&[]);
        assert!(vectoring.next_instruction(&mut empty, &s, &fixes).is_none());

        let mut no_runway = arrival_context(&["NOWHERE"]);
        no_runway.arrival_runway = None;
        assert!(vectoring.next_instruction(&mut no_runway, &s, &fixes).is_none());
    }
}
