// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! METAR decoding into [`WeatherInfo`].

use crate::types::WeatherInfo;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const MPS_TO_KT: f64 = 1.943_84;
const STATUTE_MILE_M: f64 = 1609.344;
/// Reported when visibility is 10 km or more.
const UNLIMITED_VISIBILITY_M: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
}

impl FlightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMetar {
    pub station: Option<String>,
    pub weather: WeatherInfo,
    pub gust_kt: Option<f64>,
    pub category: FlightCategory,
}

fn wind_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(VRB|\d{3})(\d{2,3})(?:G(\d{2,3}))?(KT|MPS)$").unwrap()
    })
}

fn statute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([MP])?(?:(\d+)|(\d+)/(\d+))SM$").unwrap())
}

fn layer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(FEW|SCT|BKN|OVC|VV)(\d{3})").unwrap())
}

fn station_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9]{3}$").unwrap())
}

/// Ceiling/visibility category using the usual FAA thresholds.
pub fn flight_category(ceiling_ft: Option<i32>, visibility_m: Option<i32>) -> FlightCategory {
    let ceiling = ceiling_ft.unwrap_or(i32::MAX);
    let vis_sm = visibility_m.map_or(f64::MAX, |v| v as f64 / STATUTE_MILE_M);

    if ceiling < 500 || vis_sm < 1.0 {
        FlightCategory::Lifr
    } else if ceiling < 1000 || vis_sm < 3.0 {
        FlightCategory::Ifr
    } else if ceiling <= 3000 || vis_sm <= 5.0 {
        FlightCategory::Mvfr
    } else {
        FlightCategory::Vfr
    }
}

/// Decodes the parts of a raw METAR the selectors care about. Unknown groups are skipped.
pub fn decode_metar(raw: &str) -> DecodedMetar {
    let mut weather = WeatherInfo::default();
    let mut station = None;
    let mut gust_kt = None;

    let mut tokens = raw
        .split_whitespace()
        .map(|t| t.trim_end_matches('='))
        .peekable();

    if matches!(tokens.peek(), Some(&"METAR") | Some(&"SPECI")) {
        tokens.next();
    }
    if let Some(first) = tokens.peek() {
        if station_re().is_match(first) {
            station = Some(first.to_string());
            tokens.next();
        }
    }

    let mut pending_whole_miles: Option<f64> = None;
    for token in tokens {
        // Remarks carry nothing the selectors use.
        if token == "RMK" || token == "TEMPO" || token == "BECMG" {
            break;
        }

        if let Some(caps) = wind_re().captures(token) {
            let factor = if &caps[4] == "MPS" { MPS_TO_KT } else { 1.0 };
            weather.wind_direction_deg = caps[1].parse::<f64>().ok();
            weather.wind_speed_kt = caps[2].parse::<f64>().unwrap_or(0.0) * factor;
            gust_kt = caps.get(3).and_then(|g| g.as_str().parse::<f64>().ok()).map(|g| g * factor);
            continue;
        }

        if token == "CAVOK" {
            weather.visibility_m = Some(UNLIMITED_VISIBILITY_M);
            continue;
        }

        if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(v) = token.parse::<i32>() {
                // 0000 is an observed zero, not a missing report
                weather.visibility_m = Some(v.max(1));
            }
            continue;
        }

        // "1 1/2SM" arrives as two tokens
        if token.len() == 1 && token.chars().all(|c| c.is_ascii_digit()) {
            pending_whole_miles = token.parse::<f64>().ok();
            continue;
        }

        if let Some(caps) = statute_re().captures(token) {
            let miles = match (caps.get(2), caps.get(3), caps.get(4)) {
                (Some(whole), _, _) => whole.as_str().parse::<f64>().unwrap_or(0.0),
                (None, Some(num), Some(den)) => {
                    let num = num.as_str().parse::<f64>().unwrap_or(0.0);
                    let den = den.as_str().parse::<f64>().unwrap_or(1.0).max(1.0);
                    pending_whole_miles.unwrap_or(0.0) + num / den
                }
                _ => 0.0,
            };
            weather.visibility_m = Some((miles * STATUTE_MILE_M).round() as i32);
            pending_whole_miles = None;
            continue;
        }
        pending_whole_miles = None;

        if let Some(caps) = layer_re().captures(token) {
            let cover = &caps[1];
            if matches!(cover, "BKN" | "OVC" | "VV") {
                if let Ok(hundreds) = caps[2].parse::<i32>() {
                    let base = (hundreds * 100).max(1);
                    weather.ceiling_ft = Some(weather.ceiling_ft.map_or(base, |c| c.min(base)));
                }
            }
        }
    }

    let category = flight_category(weather.ceiling_ft, weather.visibility_m);
    debug!(
        "Decoded METAR: station={:?} wind={:?}/{:.0} ceiling={:?} vis={:?} category={}",
        station,
        weather.wind_direction_deg,
        weather.wind_speed_kt,
        weather.ceiling_ft,
        weather.visibility_m,
        category.as_str()
    );

    DecodedMetar {
        station,
        weather,
        gust_kt,
        category,
    }
}
