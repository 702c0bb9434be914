/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Two 4-bit codes per byte
use crate::errors::RdiErrors;

/// Pack codes two per byte, the first code of a pair in the low nibble
///
/// For an odd number of codes the final byte repeats the last code in
/// both nibbles.
pub fn pack(codes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(codes.len().div_ceil(2));

    for pair in codes.chunks(2) {
        let lo = pair[0] & 0x0F;
        let hi = pair.get(1).map_or(lo, |v| v & 0x0F);

        out.push(lo | (hi << 4));
    }
    out
}

/// Unpack `length` codes from `bytes`
///
/// # Errors
/// [`RdiErrors::TruncatedNibbles`] if `bytes` holds fewer than `length` codes
pub fn unpack(bytes: &[u8], length: usize) -> Result<Vec<u8>, RdiErrors> {
    let needed = length.div_ceil(2);

    if bytes.len() < needed {
        return Err(RdiErrors::TruncatedNibbles(length, bytes.len()));
    }
    let mut out = Vec::with_capacity(length);

    for byte in &bytes[..length / 2] {
        out.push(byte & 0x0F);
        out.push(byte >> 4);
    }
    if length % 2 == 1 {
        out.push(bytes[needed - 1] & 0x0F);
    }
    Ok(out)
}
