/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Root delta quantization
//!
//! A byte difference between a predicted and an actual sample is mapped to
//! one of sixteen 4-bit codes. Each code names a representative wrapped delta,
//! fine near `0` and `255` (small steps forward and backward) and coarse near
//! `128` (large, rare jumps).
//!
//! Reconstruction is always `predicted.wrapping_add(decode(code))`, the sign
//! is implied by which half of the table the code falls in.

/// Representative wrapped deltas for each of the sixteen codes.
///
/// Symmetric around 128, `REPRESENTATIVES[16 - c]` is `-REPRESENTATIVES[c]`
/// modulo 256 for every nonzero `c`
pub const REPRESENTATIVES: [u8; 16] = [
    0, 1, 3, 7, 15, 31, 63, 95, 128, 161, 193, 225, 241, 249, 253, 255
];

/// Largest code whose representative does not exceed the index
static FLOOR_CODE: [u8; 256] = build_floor_table();

const fn build_floor_table() -> [u8; 256] {
    let mut table = [0_u8; 256];
    let mut value = 0;

    while value < 256 {
        let mut code = 15;

        while REPRESENTATIVES[code] as usize > value {
            code -= 1;
        }
        table[value] = code as u8;
        value += 1;
    }
    table
}

/// Quantize the difference between `predicted` and `actual` into a 4-bit code
///
/// The result is rounded toward the predictor, so that
/// `predicted.wrapping_add(decode(code))` always lies between `predicted`
/// and `actual` and never wraps around.
///
/// A difference of exactly ±128 is coded as `8` from both sides.
#[inline]
pub fn encode(predicted: u8, actual: u8) -> u8 {
    let diff = i16::from(actual) - i16::from(predicted);

    if diff > 0 {
        FLOOR_CODE[diff as usize]
    } else if diff < 0 {
        16 - FLOOR_CODE[(-diff) as usize]
    } else {
        0
    }
}

/// Return the representative wrapped delta of a code
///
/// Only the low nibble of `code` is considered.
#[inline(always)]
pub fn decode(code: u8) -> u8 {
    REPRESENTATIVES[usize::from(code & 0x0F)]
}

/// How deltas along a scan line are stored
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DeltaCoding {
    /// Store the full wrapped difference, one byte per sample, no loss
    Exact,
    /// Store the 4-bit root delta code
    RootDelta
}

impl DeltaCoding {
    /// Code `actual` against `predicted`
    ///
    /// Returns the stored value and the value the decoder will reconstruct,
    /// the latter becomes the predictor for the next sample.
    #[inline]
    pub fn encode(self, predicted: u8, actual: u8) -> (u8, u8) {
        match self {
            DeltaCoding::Exact => (actual.wrapping_sub(predicted), actual),
            DeltaCoding::RootDelta => {
                let code = encode(predicted, actual);
                (code, predicted.wrapping_add(decode(code)))
            }
        }
    }

    /// Reconstruct a sample from its predictor and stored value
    #[inline]
    pub fn decode(self, predicted: u8, stored: u8) -> u8 {
        match self {
            DeltaCoding::Exact => predicted.wrapping_add(stored),
            DeltaCoding::RootDelta => predicted.wrapping_add(decode(stored))
        }
    }
}
