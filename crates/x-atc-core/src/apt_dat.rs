// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Runway extraction from X-Plane `apt.dat` files.

use crate::geo::{bearing, distance_nm};
use crate::types::RunwaySummary;
use crate::NavDataError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const FEET_PER_NM: f64 = 6076.115;

pub struct AptDatParser;

impl AptDatParser {
    pub fn runways_from_file<P: AsRef<Path>>(
        path: P,
        icao: &str,
    ) -> Result<Vec<RunwaySummary>, NavDataError> {
        let file = File::open(path)?;
        Self::runways(BufReader::new(file), icao)
    }

    /// Both ends of every land runway (row code 100) of `icao`, in file order.
    pub fn runways<R: BufRead>(mut reader: R, icao: &str) -> Result<Vec<RunwaySummary>, NavDataError> {
        let mut runways = Vec::new();
        let mut line_buf = String::with_capacity(256);
        let mut in_airport = false;
        let mut found = false;

        loop {
            line_buf.clear();
            let bytes_read = reader.read_line(&mut line_buf)?;
            if bytes_read == 0 {
                break;
            }

            let line = line_buf.trim();
            let code_str = match line.split_whitespace().next() {
                Some(s) => s,
                None => continue,
            };
            match code_str {
                "1" | "16" | "17" => {
                    if in_airport {
                        // Airport blocks are contiguous; the next header ends ours.
                        break;
                    }
                    let ident = line.split_whitespace().nth(4);
                    in_airport = ident.is_some_and(|id| id.eq_ignore_ascii_case(icao));
                    found |= in_airport;
                }
                "100" if in_airport => {
                    runways.extend(parse_runway(line));
                }
                "99" => break,
                _ => {}
            }
        }

        if !found {
            return Err(NavDataError::AirportNotFound(icao.to_string()));
        }
        log::debug!("apt.dat: {} runway ends for {}", runways.len(), icao);
        Ok(runways)
    }
}

struct RunwayEnd<'a> {
    ident: &'a str,
    lat: f64,
    lon: f64,
}

fn parse_end<'a>(parts: &[&'a str], start: usize) -> Option<RunwayEnd<'a>> {
    let ident = *parts.get(start)?;
    let lat = parts.get(start + 1)?.parse::<f64>().ok()?;
    let lon = parts.get(start + 2)?.parse::<f64>().ok()?;
    Some(RunwayEnd { ident, lat, lon })
}

// 0:100 1:width 2:surface 3:shoulder 4:smoothness 5:centerline 6:edge 7:signs
// 8..17: end one (ident, lat, lon, displaced, overrun, markings, lights, tdz, reil)
// 17..26: end two
fn parse_runway(line: &str) -> Vec<RunwaySummary> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (Some(a), Some(b)) = (parse_end(&parts, 8), parse_end(&parts, 17)) else {
        return Vec::new();
    };

    let length_ft = distance_nm(a.lat, a.lon, b.lat, b.lon) * FEET_PER_NM;
    let summary = |from: &RunwayEnd, to: &RunwayEnd| RunwaySummary {
        ident: from.ident.to_string(),
        true_heading_deg: bearing(from.lat, from.lon, to.lat, to.lon) as f64,
        length_ft,
        has_ils: false,
        has_rnav: false,
        preferred_departure: false,
        preferred_arrival: false,
    };
    vec![summary(&a, &b), summary(&b, &a)]
}
