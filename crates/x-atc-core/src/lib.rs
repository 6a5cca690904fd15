// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod apt_dat;
pub mod arrival;
pub mod config;
pub mod controller;
pub mod departure;
pub mod geo;
pub mod navdata;
pub mod phraseology;
pub mod procedures;
pub mod runway;
pub mod squawk;
pub mod types;
pub mod weather;

pub use config::VectoringConfig;
pub use controller::AtcController;
pub use navdata::{FixTable, WaypointLookup};
pub use types::*;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavDataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid coordinate for {ident}: {value}")]
    InvalidCoordinate { ident: String, value: String },
    #[error("Airport {0} not found")]
    AirportNotFound(String),
}

/// Platform config directory for X-ATC (e.g. `~/.config/x-atc` on Linux).
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "x-atc", "X-ATC-Oxide")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
