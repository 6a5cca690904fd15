// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! SID, STAR and approach selection against the filed route and weather.

use crate::types::{
    ApproachSummary, SelectionResult, SidSummary, StarSummary, WeatherInfo,
};
use log::{debug, info};

/// How many waypoints at either end of the route are searched for a procedure fix.
pub const ROUTE_SEARCH_WINDOW: usize = 6;
const FIX_MATCH_BASE: i32 = 100;
const FIX_POSITION_PENALTY: i32 = 10;

fn runway_compatible(procedure_runway: &str, assigned: Option<&str>) -> bool {
    let rwy = procedure_runway.trim();
    if rwy.is_empty() || rwy.eq_ignore_ascii_case("ALL") {
        return true;
    }
    assigned.is_some_and(|a| rwy.eq_ignore_ascii_case(a.trim()))
}

fn fix_matches(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.eq_ignore_ascii_case(b.trim())
}

/// Keeps the first candidate when scores tie.
fn pick_best<'a, T>(scored: impl Iterator<Item = (&'a T, i32)>) -> Option<(&'a T, i32)> {
    let mut best: Option<(&'a T, i32)> = None;
    for (candidate, score) in scored {
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best
}

pub fn select_sid(
    airport: &str,
    runway: Option<&str>,
    route: &[String],
    sids: &[SidSummary],
) -> SelectionResult<SidSummary> {
    let candidates: Vec<&SidSummary> = sids
        .iter()
        .filter(|s| s.airport.eq_ignore_ascii_case(airport))
        .filter(|s| runway_compatible(&s.runway, runway))
        .collect();

    if candidates.is_empty() {
        return SelectionResult::vectors(format!(
            "No SID published for {} runway {}; radar vectors",
            airport,
            runway.unwrap_or("unassigned")
        ));
    }

    let head = &route[..route.len().min(ROUTE_SEARCH_WINDOW)];
    let scored = candidates.into_iter().filter_map(|sid| {
        if sid.exit_fix.trim().is_empty() {
            return None;
        }
        let index = head.iter().position(|wp| fix_matches(&sid.exit_fix, wp))?;
        let score = FIX_MATCH_BASE - FIX_POSITION_PENALTY * index as i32;
        debug!("SID {} exit {} at route index {} score={}", sid.ident, sid.exit_fix, index, score);
        Some((sid, score))
    });

    match pick_best(scored) {
        Some((sid, score)) => {
            info!("Selected SID {} for {}", sid.ident, airport);
            SelectionResult::published(
                sid.clone(),
                format!("SID {} exits at {} on the filed route (score {})", sid.ident, sid.exit_fix, score),
            )
        }
        None => SelectionResult::vectors(format!(
            "No SID at {} connects to the first {} route waypoints; radar vectors",
            airport, ROUTE_SEARCH_WINDOW
        )),
    }
}

pub fn select_star(
    airport: &str,
    runway: Option<&str>,
    route: &[String],
    stars: &[StarSummary],
) -> SelectionResult<StarSummary> {
    let candidates: Vec<&StarSummary> = stars
        .iter()
        .filter(|s| s.airport.eq_ignore_ascii_case(airport))
        .filter(|s| runway_compatible(&s.runway, runway))
        .collect();

    if candidates.is_empty() {
        return SelectionResult::vectors(format!(
            "No STAR published for {} runway {}; radar vectors",
            airport,
            runway.unwrap_or("unassigned")
        ));
    }

    let window = route.len().min(ROUTE_SEARCH_WINDOW);
    let tail = &route[route.len() - window..];
    let scored = candidates.into_iter().filter_map(|star| {
        if star.entry_fix.trim().is_empty() {
            return None;
        }
        // Offset 0 is the last route waypoint.
        let offset = tail.iter().rev().position(|wp| fix_matches(&star.entry_fix, wp))?;
        let score = FIX_MATCH_BASE - FIX_POSITION_PENALTY * offset as i32;
        debug!("STAR {} entry {} at offset {} score={}", star.ident, star.entry_fix, offset, score);
        Some((star, score))
    });

    match pick_best(scored) {
        Some((star, score)) => {
            info!("Selected STAR {} for {}", star.ident, airport);
            SelectionResult::published(
                star.clone(),
                format!("STAR {} joins at {} (score {})", star.ident, star.entry_fix, score),
            )
        }
        None => SelectionResult::vectors(format!(
            "No STAR at {} connects to the last {} route waypoints; radar vectors",
            airport, ROUTE_SEARCH_WINDOW
        )),
    }
}

pub fn score_approach(
    approach: &ApproachSummary,
    weather: &WeatherInfo,
    star: Option<&StarSummary>,
) -> i32 {
    let mut score = 0;
    if weather.is_imc() {
        if approach.is_precision() {
            score += 100;
        } else if approach.is_rnav {
            score += 60;
        } else {
            score -= 50;
        }
        if !approach.straight_in {
            score -= 20;
        }
    } else {
        if approach.is_precision() {
            score += 60;
        }
        if approach.is_rnav {
            score += 50;
        }
    }

    if let Some(star) = star {
        if fix_matches(&approach.initial_fix, &star.exit_fix) {
            score += 40;
        }
    }
    score
}

pub fn select_approach(
    airport: &str,
    runway: Option<&str>,
    weather: &WeatherInfo,
    star: Option<&StarSummary>,
    approaches: &[ApproachSummary],
) -> SelectionResult<ApproachSummary> {
    let Some(runway) = runway else {
        return SelectionResult::vectors("No arrival runway assigned; vectors to final");
    };

    let scored = approaches
        .iter()
        .filter(|a| a.airport.eq_ignore_ascii_case(airport))
        .filter(|a| a.runway.trim().eq_ignore_ascii_case(runway.trim()))
        .map(|a| {
            let score = score_approach(a, weather, star);
            debug!("Approach {} runway {} score={}", a.ident, a.runway, score);
            (a, score)
        });

    match pick_best(scored) {
        Some((approach, score)) => {
            let conditions = if weather.is_imc() { "IMC" } else { "VMC" };
            info!("Selected approach {} runway {}", approach.ident, runway);
            SelectionResult::published(
                approach.clone(),
                format!(
                    "{} approach {} runway {} best in {} (score {})",
                    approach.clearance_kind(),
                    approach.ident,
                    runway,
                    conditions,
                    score
                ),
            )
        }
        None => SelectionResult::vectors(format!(
            "No approach published for {} runway {}; vectors to final",
            airport, runway
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectionMode;

    fn route(fixes: &[&str]) -> Vec<String> {
        fixes.iter().map(|f| f.to_string()).collect()
    }

    fn sid(ident: &str, runway: &str, exit: &str) -> SidSummary {
        SidSummary {
            airport: "KJFK".into(),
            ident: ident.into(),
            runway: runway.into(),
            exit_fix: exit.into(),
        }
    }

    fn star(ident: &str, entry: &str, exit: &str) -> StarSummary {
        StarSummary {
            airport: "KBOS".into(),
            ident: ident.into(),
            runway: String::new(),
            entry_fix: entry.into(),
            exit_fix: exit.into(),
        }
    }

    fn approach(ident: &str, code: &str, gs: bool, rnav: bool) -> ApproachSummary {
        ApproachSummary {
            airport: "KBOS".into(),
            ident: ident.into(),
            runway: "04R".into(),
            type_code: code.into(),
            has_glideslope: gs,
            is_rnav: rnav,
            straight_in: true,
            initial_fix: String::new(),
        }
    }

    #[test]
    fn test_sid_earliest_exit_wins() {
        let sids = vec![sid("MERIT5", "ALL", "MERIT"), sid("GREKI6", "", "GREKI")];
        let r = route(&["GREKI", "JUDDS", "MERIT"]);
        let result = select_sid("KJFK", Some("31L"), &r, &sids);

        assert_eq!(result.mode, SelectionMode::Published);
        assert_eq!(result.selection.unwrap().ident, "GREKI6");
    }

    #[test]
    fn test_sid_runway_filter_and_window() {
        let sids = vec![sid("DEEZZ5", "13R", "DEEZZ"), sid("SKORR5", "31L", "SKORR")];
        // SKORR sits at index 6, outside the search window
        let r = route(&["A", "B", "C", "D", "E", "F", "SKORR"]);
        let result = select_sid("KJFK", Some("31L"), &r, &sids);

        assert_eq!(result.mode, SelectionMode::Vectors);
        assert!(!result.reason.is_empty());
    }

    #[test]
    fn test_sid_no_candidates() {
        let result = select_sid("KJFK", Some("31L"), &route(&["MERIT"]), &[]);
        assert_eq!(result.mode, SelectionMode::Vectors);
        assert!(result.selection.is_none());
        assert!(!result.reason.is_empty());
    }

    #[test]
    fn test_sid_case_insensitive_fix() {
        let sids = vec![sid("MERIT5", "", "merit")];
        let result = select_sid("kjfk", Some("31L"), &route(&["MERIT"]), &sids);
        assert_eq!(result.selection.unwrap().ident, "MERIT5");
    }

    #[test]
    fn test_star_anchored_at_route_end() {
        let stars = vec![star("ROBUC3", "ROBUC", "BRONC"), star("OOSHN5", "OOSHN", "JOBEE")];
        let r = route(&["MERIT", "HFD", "OOSHN", "ROBUC"]);
        let result = select_star("KBOS", Some("04R"), &r, &stars);

        // ROBUC is the last waypoint (offset 0) and beats OOSHN (offset 1)
        assert_eq!(result.selection.unwrap().ident, "ROBUC3");
    }

    #[test]
    fn test_star_tie_keeps_first() {
        let stars = vec![star("ROBUC3", "ROBUC", "BRONC"), star("ROBUC4", "ROBUC", "JOBEE")];
        let result = select_star("KBOS", None, &route(&["ROBUC"]), &stars);
        assert_eq!(result.selection.unwrap().ident, "ROBUC3");
    }

    #[test]
    fn test_approach_imc_prefers_ils() {
        let approaches = vec![approach("R04R", "R", false, true), approach("I04R", "I", true, false)];
        let weather = WeatherInfo {
            visibility_m: Some(1200),
            ..Default::default()
        };
        let result = select_approach("KBOS", Some("04R"), &weather, None, &approaches);
        assert_eq!(result.selection.unwrap().ident, "I04R");
    }

    #[test]
    fn test_approach_vmc_additive_scores() {
        let both = approach("I04R", "I", true, true);
        let rnav = approach("R04R", "R", false, true);
        let vmc = WeatherInfo::default();

        assert_eq!(score_approach(&both, &vmc, None), 110);
        assert_eq!(score_approach(&rnav, &vmc, None), 50);
    }

    #[test]
    fn test_approach_imc_penalties() {
        let imc = WeatherInfo {
            ifr: true,
            ..Default::default()
        };
        let mut vor = approach("V04R", "V", false, false);
        assert_eq!(score_approach(&vor, &imc, None), -50);
        vor.straight_in = false;
        assert_eq!(score_approach(&vor, &imc, None), -70);
    }

    #[test]
    fn test_approach_star_continuity_bonus() {
        let mut rnav = approach("R04R", "R", false, true);
        rnav.initial_fix = "BRONC".into();
        let ils = approach("I04R", "I", true, false);
        let star = star("ROBUC3", "ROBUC", "BRONC");

        // VMC: ILS 60, RNAV 50 + 40 continuity
        let result = select_approach(
            "KBOS",
            Some("04R"),
            &WeatherInfo::default(),
            Some(&star),
            &[ils, rnav],
        );
        assert_eq!(result.selection.unwrap().ident, "R04R");
    }

    #[test]
    fn test_approach_requires_exact_runway() {
        let approaches = vec![approach("I04R", "I", true, false)];
        let result = select_approach("KBOS", Some("04L"), &WeatherInfo::default(), None, &approaches);
        assert_eq!(result.mode, SelectionMode::Vectors);
    }
}
