// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::types::LatLon;
use crate::NavDataError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Resolves a fix identifier to a position. Unknown identifiers return `None`.
///
/// Implementations must match identifiers case-insensitively and must not panic
/// on missing data; the vectoring code degrades to "no instruction" instead.
pub trait WaypointLookup {
    fn resolve(&self, ident: &str) -> Option<LatLon>;
}

impl<T: WaypointLookup + ?Sized> WaypointLookup for &T {
    fn resolve(&self, ident: &str) -> Option<LatLon> {
        (**self).resolve(ident)
    }
}

#[derive(Debug, Deserialize)]
struct FixRecord {
    ident: String,
    lat: String,
    lon: String,
}

/// In-memory fix table keyed by upper-case identifier.
#[derive(Debug, Clone, Default)]
pub struct FixTable {
    fixes: HashMap<String, LatLon>,
}

impl FixTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ident: &str, position: LatLon) {
        self.fixes.insert(ident.trim().to_uppercase(), position);
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, NavDataError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Reads `ident,lat,lon` rows (with header). Later duplicates replace earlier ones.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, NavDataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut table = FixTable::new();
        for record in rdr.deserialize::<FixRecord>() {
            let record = record?;
            let lat = parse_coordinate(&record.ident, &record.lat, 90.0)?;
            let lon = parse_coordinate(&record.ident, &record.lon, 180.0)?;
            table.insert(&record.ident, LatLon::new(lat, lon));
        }

        log::debug!("Loaded fix table: fixes={}", table.len());
        Ok(table)
    }
}

fn parse_coordinate(ident: &str, value: &str, limit: f64) -> Result<f64, NavDataError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.abs() <= limit)
        .ok_or_else(|| NavDataError::InvalidCoordinate {
            ident: ident.to_string(),
            value: value.to_string(),
        })
}

impl WaypointLookup for FixTable {
    fn resolve(&self, ident: &str) -> Option<LatLon> {
        self.fixes.get(&ident.trim().to_uppercase()).copied()
    }
}

impl FromIterator<(String, LatLon)> for FixTable {
    fn from_iter<I: IntoIterator<Item = (String, LatLon)>>(iter: I) -> Self {
        let mut table = FixTable::new();
        for (ident, pos) in iter {
            table.insert(&ident, pos);
        }
        table
    }
}
