// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Distances, tolerances and altitudes used by the vectoring state machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectoringConfig {
    /// Arrival: switch from positioning to intercept inside this range (NM).
    pub intercept_range_nm: f64,
    pub positioning_altitude_ft: i32,
    pub positioning_heading_tolerance_deg: f64,
    /// Offset from final course flown while intercepting.
    pub intercept_offset_deg: f64,
    /// Arrival: considered on the final course inside this range (NM).
    pub established_range_nm: f64,
    pub intercept_altitude_ft: i32,
    pub final_altitude_ft: i32,
    pub final_heading_tolerance_deg: f64,

    pub initial_climb_altitude_ft: i32,
    /// Departure: first turn issued at or above this altitude.
    pub turn_altitude_ft: i32,
    pub departure_altitude_ft: i32,
    /// Departure: resume own navigation inside this range of the first fix (NM).
    pub own_navigation_range_nm: f64,
    pub departure_heading_tolerance_deg: f64,
}

impl Default for VectoringConfig {
    fn default() -> Self {
        Self {
            intercept_range_nm: 15.0,
            positioning_altitude_ft: 7000,
            positioning_heading_tolerance_deg: 15.0,
            intercept_offset_deg: 90.0,
            established_range_nm: 2.0,
            intercept_altitude_ft: 5000,
            final_altitude_ft: 4000,
            final_heading_tolerance_deg: 10.0,

            initial_climb_altitude_ft: 3000,
            turn_altitude_ft: 1500,
            departure_altitude_ft: 5000,
            own_navigation_range_nm: 5.0,
            departure_heading_tolerance_deg: 10.0,
        }
    }
}

impl VectoringConfig {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join("vectoring.json")
    }

    /// Loads the config at `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No vectoring config at {:?}; using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vectoring config {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse vectoring config {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize vectoring config")?;
        fs::write(path, content).context("Failed to write vectoring config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = VectoringConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, VectoringConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectoring.json");
        fs::write(&path, r#"{ "positioning_altitude_ft": 8000 }"#).unwrap();

        let config = VectoringConfig::load(&path).unwrap();
        assert_eq!(config.positioning_altitude_ft, 8000);
        assert_eq!(config.intercept_range_nm, 15.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("vectoring.json");
        let config = VectoringConfig {
            final_altitude_ft: 3000,
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(VectoringConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_altitudes_are_whole_feet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectoring.json");
        fs::write(&path, r#"{ "turn_altitude_ft": 2000 }"#).unwrap();
        assert_eq!(VectoringConfig::load(&path).unwrap().turn_altitude_ft, 2000);

        fs::write(&path, r#"{ "turn_altitude_ft": 1500.5 }"#).unwrap();
        assert!(VectoringConfig::load(&path).is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectoring.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(VectoringConfig::load(&path).is_err());
    }
}
