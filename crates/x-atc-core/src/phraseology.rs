// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Controller phrase building.

use crate::geo::TurnDirection;

fn digit_word(c: char) -> Option<&'static str> {
    let word = match c {
        '0' => "zero",
        '1' => "one",
        '2' => "two",
        '3' => "three",
        '4' => "four",
        '5' => "five",
        '6' => "six",
        '7' => "seven",
        '8' => "eight",
        '9' => "nine",
        _ => return None,
    };
    Some(word)
}

/// "BAW 123" -> "BAW one two three". Callsigns without a space are returned as-is.
/// Digit words and the non-digit runs between them are joined by single spaces.
pub fn phonetic_callsign(callsign: &str) -> String {
    let Some((airline, flight_number)) = callsign.split_once(' ') else {
        return callsign.to_string();
    };

    let mut spoken: Vec<String> = Vec::with_capacity(flight_number.len());
    let mut literal = String::new();
    for c in flight_number.chars() {
        match digit_word(c) {
            Some(word) => {
                push_literal(&mut spoken, &mut literal);
                spoken.push(word.to_string());
            }
            None => literal.push(c),
        }
    }
    push_literal(&mut spoken, &mut literal);

    format!("{} {}", airline, spoken.join(" "))
}

fn push_literal(spoken: &mut Vec<String>, literal: &mut String) {
    let trimmed = literal.trim();
    if !trimmed.is_empty() {
        spoken.push(trimmed.to_string());
    }
    literal.clear();
}

pub fn format_heading(heading: u16) -> String {
    format!("{:03}", heading)
}

pub fn turn_heading(callsign: &str, direction: TurnDirection, heading: u16) -> String {
    format!(
        "{}, turn {} heading {}",
        phonetic_callsign(callsign),
        direction.as_str(),
        format_heading(heading)
    )
}

pub fn runway_heading_climb(callsign: &str, altitude_ft: i32) -> String {
    format!(
        "{}, climb runway heading, maintain {}.",
        phonetic_callsign(callsign),
        altitude_ft
    )
}

pub fn descend(callsign: &str, altitude_ft: i32) -> String {
    format!(
        "{}, descend and maintain {}.",
        phonetic_callsign(callsign),
        altitude_ft
    )
}

pub fn resume_own_navigation(callsign: &str, fix: &str) -> String {
    format!(
        "{}, proceed direct {}, resume own navigation.",
        phonetic_callsign(callsign),
        fix
    )
}

pub fn cleared_approach(callsign: &str, kind: &str, runway: &str) -> String {
    format!(
        "{}, cleared {} approach runway {}.",
        phonetic_callsign(callsign),
        kind,
        runway
    )
}
