// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Instantaneous aircraft state, supplied fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: f64,
    pub heading_deg: f64,
    #[serde(default)]
    pub ground_speed_kt: f64,
    #[serde(default)]
    pub on_ground: bool,
}

impl SimState {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorInstruction {
    /// Assigned heading 0-359, `None` when the heading is unchanged.
    pub heading: Option<u16>,
    /// Assigned altitude in feet, `None` when the altitude is unchanged.
    pub altitude_ft: Option<i32>,
    pub phrase: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightPhase {
    #[default]
    Preflight,
    Departure,
    Enroute,
    Arrival,
    Landed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwaySummary {
    pub ident: String,
    pub true_heading_deg: f64,
    pub length_ft: f64,
    /// ILS or localizer available on this end.
    #[serde(default)]
    pub has_ils: bool,
    #[serde(default)]
    pub has_rnav: bool,
    #[serde(default)]
    pub preferred_departure: bool,
    #[serde(default)]
    pub preferred_arrival: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftPerformanceProfile {
    pub max_tailwind_kt: f64,
    pub max_crosswind_kt: f64,
    pub takeoff_distance_ft: f64,
    pub landing_distance_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Direction the wind blows from. `None` for variable or unreported wind.
    #[serde(default)]
    pub wind_direction_deg: Option<f64>,
    #[serde(default)]
    pub wind_speed_kt: f64,
    #[serde(default)]
    pub ceiling_ft: Option<i32>,
    #[serde(default)]
    pub visibility_m: Option<i32>,
    /// Flight is operating under instrument flight rules.
    #[serde(default)]
    pub ifr: bool,
}

impl WeatherInfo {
    /// Instrument meteorological conditions.
    pub fn is_imc(&self) -> bool {
        let low_ceiling = self.ceiling_ft.is_some_and(|c| (1..=999).contains(&c));
        let low_visibility = self.visibility_m.is_some_and(|v| (1..=4799).contains(&v));
        low_ceiling || low_visibility || self.ifr
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidSummary {
    pub airport: String,
    pub ident: String,
    /// Empty or "ALL" when the SID serves every runway.
    #[serde(default)]
    pub runway: String,
    #[serde(default)]
    pub exit_fix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSummary {
    pub airport: String,
    pub ident: String,
    #[serde(default)]
    pub runway: String,
    #[serde(default)]
    pub entry_fix: String,
    #[serde(default)]
    pub exit_fix: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachSummary {
    pub airport: String,
    pub ident: String,
    pub runway: String,
    /// ARINC 424 style type code: "I" (ILS), "L" (localizer), "R" (RNAV), "V" (VOR)...
    #[serde(default)]
    pub type_code: String,
    #[serde(default)]
    pub has_glideslope: bool,
    #[serde(default)]
    pub is_rnav: bool,
    #[serde(default = "default_true")]
    pub straight_in: bool,
    #[serde(default)]
    pub initial_fix: String,
}

impl ApproachSummary {
    pub fn is_precision(&self) -> bool {
        self.has_glideslope
            || self.type_code.eq_ignore_ascii_case("I")
            || self.type_code.eq_ignore_ascii_case("ILS")
    }

    /// Short name used in clearances.
    pub fn clearance_kind(&self) -> &'static str {
        if self.is_precision() {
            "ILS"
        } else if self.is_rnav {
            "RNAV"
        } else {
            "visual"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Published,
    Vectors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult<T> {
    pub mode: SelectionMode,
    pub selection: Option<T>,
    pub reason: String,
}

impl<T> SelectionResult<T> {
    pub fn published(selection: T, reason: impl Into<String>) -> Self {
        Self {
            mode: SelectionMode::Published,
            selection: Some(selection),
            reason: reason.into(),
        }
    }

    pub fn vectors(reason: impl Into<String>) -> Self {
        Self {
            mode: SelectionMode::Vectors,
            selection: None,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ArrivalPhase {
    #[default]
    Positioning,
    Intercepting,
    Established,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrivalVectoringState {
    pub phase: ArrivalPhase,
    pub intercept_lat: Option<f64>,
    pub intercept_lon: Option<f64>,
    pub final_course: Option<f64>,
    pub cleared_for_approach: bool,
}

impl ArrivalVectoringState {
    pub fn intercept_point(&self) -> Option<LatLon> {
        match (self.intercept_lat, self.intercept_lon) {
            (Some(lat), Some(lon)) => Some(LatLon::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepartureVectoringState {
    pub left_runway_heading: bool,
    pub resumed_own_navigation: bool,
    pub target_heading: Option<u16>,
}

/// Everything the engine knows about one simulated flight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightContext {
    pub callsign: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub phase: FlightPhase,
    #[serde(default)]
    pub departure_runway: Option<RunwaySummary>,
    #[serde(default)]
    pub arrival_runway: Option<RunwaySummary>,
    #[serde(default)]
    pub route: Vec<String>,
    #[serde(default)]
    pub departure_runway_selection: Option<SelectionResult<RunwaySummary>>,
    #[serde(default)]
    pub arrival_runway_selection: Option<SelectionResult<RunwaySummary>>,
    #[serde(default)]
    pub sid: Option<SelectionResult<SidSummary>>,
    #[serde(default)]
    pub star: Option<SelectionResult<StarSummary>>,
    #[serde(default)]
    pub approach: Option<SelectionResult<ApproachSummary>>,
    #[serde(default)]
    pub cleared_altitude_ft: Option<i32>,
    #[serde(default)]
    pub cleared_heading: Option<u16>,
    #[serde(default)]
    pub squawk: Option<u16>,
    #[serde(default)]
    pub arrival_vectoring: ArrivalVectoringState,
    #[serde(default)]
    pub departure_vectoring: DepartureVectoringState,
}

impl FlightContext {
    pub fn new(callsign: &str, origin: &str, destination: &str, route: Vec<String>) -> Self {
        Self {
            callsign: callsign.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            route,
            ..Default::default()
        }
    }

    pub fn selected_sid(&self) -> Option<&SidSummary> {
        self.sid.as_ref().and_then(|r| r.selection.as_ref())
    }

    pub fn selected_star(&self) -> Option<&StarSummary> {
        self.star.as_ref().and_then(|r| r.selection.as_ref())
    }

    pub fn selected_approach(&self) -> Option<&ApproachSummary> {
        self.approach.as_ref().and_then(|r| r.selection.as_ref())
    }
}
