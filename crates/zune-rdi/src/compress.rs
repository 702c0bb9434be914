/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! zlib stage applied to the transform output
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::errors::RdiErrors;

/// Compress `data` into a zlib stream at the best compression level
pub(crate) fn compress(data: &[u8]) -> Result<Vec<u8>, RdiErrors> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());

    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a zlib stream expected to hold `expected` bytes
///
/// Output beyond `expected` bytes is refused.
pub(crate) fn decompress(data: &[u8], expected: usize) -> Result<Vec<u8>, RdiErrors> {
    let options = DeflateOptions::default()
        .set_limit(expected)
        .set_size_hint(expected);

    let mut decoder = DeflateDecoder::new_with_options(data, options);

    decoder.decode_zlib().map_err(RdiErrors::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn round_trip() {
        let data: Vec<u8> = (0..10_000_u32).map(|v| (v % 251) as u8).collect();
        let compressed = compress(&data).unwrap();

        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed, data.len()).unwrap(), data);
    }

    #[test]
    fn limit_is_a_constraint() {
        let compressed = compress(&[7; 4096]).unwrap();
        let err = decompress(&compressed, 100).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decompress(&[0x12, 0x34, 0x56, 0x78, 0x9a], 100).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }
}
