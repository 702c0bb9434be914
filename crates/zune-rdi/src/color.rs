/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! RGB to YCoCg conversion and back
//!
//! The integer forward transform drops low bits, so a round trip is
//! within one unit per channel but not bit exact.

#[inline(always)]
fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Convert an RGB triple into luma, orange chroma and green chroma
///
/// Both chroma values are offset by 128 to fit in a byte.
#[inline]
pub fn rgb_to_ycocg(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

    let y = (2 * g + r + b + 1) >> 2;
    let co = ((r - b) >> 1) + 128;
    let cg = ((2 * g - r - b + 1) >> 2) + 128;

    (clamp_u8(y), clamp_u8(co), clamp_u8(cg))
}

/// Convert luma, orange chroma and green chroma back to RGB
#[inline]
pub fn ycocg_to_rgb(y: u8, co: u8, cg: u8) -> (u8, u8, u8) {
    let (y, co, cg) = (i32::from(y), i32::from(co), i32::from(cg));

    let r = y + co - cg;
    let g = y + cg - 128;
    let b = y - co - cg + 256;

    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use super::*;

    #[test]
    fn gray_maps_to_neutral_chroma() {
        for v in 0..=255_u8 {
            let (y, co, cg) = rgb_to_ycocg(v, v, v);
            assert_eq!((co, cg), (128, 128));
            assert_eq!(ycocg_to_rgb(y, co, cg), (v, v, v));
        }
    }

    #[test]
    fn round_trip_within_one() {
        let mut rand = nanorand::WyRand::new_seed(0x5eed);

        for _ in 0..100_000 {
            let (r, g, b) = (rand.generate::<u8>(), rand.generate::<u8>(), rand.generate::<u8>());
            let (y, co, cg) = rgb_to_ycocg(r, g, b);
            let (r1, g1, b1) = ycocg_to_rgb(y, co, cg);

            assert!(r.abs_diff(r1) <= 1, "{r},{g},{b} -> {r1},{g1},{b1}");
            assert!(g.abs_diff(g1) <= 1, "{r},{g},{b} -> {r1},{g1},{b1}");
            assert!(b.abs_diff(b1) <= 1, "{r},{g},{b} -> {r1},{g1},{b1}");
        }
    }

    #[test]
    fn extremes_do_not_clamp() {
        assert_eq!(rgb_to_ycocg(255, 0, 0), (64, 255, 64));
        assert_eq!(rgb_to_ycocg(0, 0, 255), (64, 0, 64));
        assert_eq!(rgb_to_ycocg(0, 255, 0), (127, 128, 255));
        assert_eq!(rgb_to_ycocg(255, 0, 255), (127, 128, 0));
    }
}
