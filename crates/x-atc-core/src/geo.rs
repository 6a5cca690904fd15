// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};

/// Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Winds at or below this speed are treated as calm.
const CALM_WIND_KT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnDirection::Left => "left",
            TurnDirection::Right => "right",
        }
    }
}

/// Maps any degree value (negative, >= 360, fractional) to a whole heading in [0, 360).
pub fn normalize_heading(heading: f64) -> u16 {
    if !heading.is_finite() {
        return 0;
    }
    (heading.round() as i64).rem_euclid(360) as u16
}

/// Initial great-circle bearing from point 1 to point 2, whole degrees.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> u16 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let x = delta_lon.sin() * lat2_rad.cos();
    let y = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    normalize_heading(x.atan2(y).to_degrees())
}

/// Haversine distance in nautical miles.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_NM * c
}

/// Shortest way round from `current` to `target`. A reversal (exactly 180) turns right.
pub fn turn_direction(current: f64, target: f64) -> TurnDirection {
    let diff = (normalize_heading(target) as i32 - normalize_heading(current) as i32).rem_euclid(360);
    if diff <= 180 {
        TurnDirection::Right
    } else {
        TurnDirection::Left
    }
}

/// Smallest absolute angle between two headings, in [0, 180].
pub fn heading_difference(a: f64, b: f64) -> f64 {
    let diff = (b - a).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindComponents {
    /// Positive for headwind, negative for tailwind.
    pub headwind_kt: f64,
    /// Signed; positive when the wind comes from the right of the runway heading.
    pub crosswind_kt: f64,
}

impl WindComponents {
    pub const CALM: WindComponents = WindComponents {
        headwind_kt: 0.0,
        crosswind_kt: 0.0,
    };

    pub fn tailwind_kt(&self) -> f64 {
        (-self.headwind_kt).max(0.0)
    }
}

pub fn wind_components(wind_direction_deg: f64, wind_speed_kt: f64, runway_heading_deg: f64) -> WindComponents {
    if wind_speed_kt <= CALM_WIND_KT {
        return WindComponents::CALM;
    }
    let delta = (wind_direction_deg - runway_heading_deg).to_radians();
    WindComponents {
        headwind_kt: wind_speed_kt * delta.cos(),
        crosswind_kt: wind_speed_kt * delta.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading_range() {
        assert_eq!(normalize_heading(0.0), 0);
        assert_eq!(normalize_heading(360.0), 0);
        assert_eq!(normalize_heading(-90.0), 270);
        assert_eq!(normalize_heading(725.0), 5);
        assert_eq!(normalize_heading(359.6), 0);
        assert_eq!(normalize_heading(-0.4), 0);
        assert_eq!(normalize_heading(f64::NAN), 0);

        let mut h = -1080.0;
        while h < 1080.0 {
            assert!(normalize_heading(h) < 360, "out of range for {}", h);
            h += 7.3;
        }
    }

    #[test]
    fn test_turn_direction() {
        assert_eq!(turn_direction(90.0, 180.0), TurnDirection::Right);
        assert_eq!(turn_direction(90.0, 0.0), TurnDirection::Left);
        assert_eq!(turn_direction(350.0, 10.0), TurnDirection::Right);
        assert_eq!(turn_direction(10.0, 350.0), TurnDirection::Left);
        // Reversal resolves right
        assert_eq!(turn_direction(0.0, 180.0), TurnDirection::Right);
        assert_eq!(turn_direction(270.0, 90.0), TurnDirection::Right);
        assert_eq!(turn_direction(120.0, 120.0), TurnDirection::Right);
    }

    #[test]
    fn test_heading_difference() {
        assert_eq!(heading_difference(350.0, 10.0), 20.0);
        assert_eq!(heading_difference(10.0, 350.0), 20.0);
        assert_eq!(heading_difference(0.0, 180.0), 180.0);
        assert_eq!(heading_difference(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_bearing_cardinal() {
        assert_eq!(bearing(0.0, 0.0, 1.0, 0.0), 0);
        assert_eq!(bearing(0.0, 0.0, 0.0, 1.0), 90);
        assert_eq!(bearing(0.0, 0.0, -1.0, 0.0), 180);
        assert_eq!(bearing(0.0, 0.0, 0.0, -1.0), 270);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let d = distance_nm(0.0, 0.0, 1.0, 0.0);
        assert!((d - 60.04).abs() < 0.1, "got {}", d);
        assert_eq!(distance_nm(42.0, -71.0, 42.0, -71.0), 0.0);
    }

    #[test]
    fn test_wind_components() {
        // Straight down the runway
        let w = wind_components(90.0, 20.0, 90.0);
        assert!((w.headwind_kt - 20.0).abs() < 1e-9);
        assert!(w.crosswind_kt.abs() < 1e-9);

        // Direct tailwind
        let w = wind_components(270.0, 10.0, 90.0);
        assert!((w.headwind_kt + 10.0).abs() < 1e-9);
        assert!((w.tailwind_kt() - 10.0).abs() < 1e-9);

        // Full crosswind
        let w = wind_components(180.0, 15.0, 90.0);
        assert!(w.headwind_kt.abs() < 1e-9);
        assert!((w.crosswind_kt - 15.0).abs() < 1e-9);

        // Calm
        assert_eq!(wind_components(270.0, 1.0, 90.0), WindComponents::CALM);
    }
}
