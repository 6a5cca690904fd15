// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use rand::Rng;

/// Codes never handed out as discrete squawks (VFR, conspicuity, emergencies).
const RESERVED: [u16; 7] = [0, 1200, 2000, 7000, 7500, 7600, 7700];

/// True when every digit is 0-7, as a transponder requires.
pub fn is_valid(code: u16) -> bool {
    code <= 7777 && code.to_string().chars().all(|c| c <= '7')
}

pub fn is_reserved(code: u16) -> bool {
    RESERVED.contains(&code)
}

/// Random discrete code made of four octal digits, avoiding reserved codes.
pub fn generate<R: Rng>(rng: &mut R) -> u16 {
    loop {
        let code = (0..4).fold(0u16, |acc, _| acc * 10 + rng.gen_range(0..8));
        if !is_reserved(code) {
            return code;
        }
    }
}
