/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding Root Delta Images
//!
//! A root delta image stores every scan line of an image as a verbatim
//! first sample followed by 4-bit (or for the lossless modes 8-bit) deltas
//! against the running reconstruction, optionally in YCoCg with subsampled
//! chroma and packed two codes per byte. The result is zlib compressed and
//! prefixed with a small header.
//!
//! # Features
//! - Decoding and encoding
//! - Ten transform modes, two of them lossless
//! - A stand-alone [`TransformEngine`] for working on in-memory buffers
//!   without the container
//!
//! # Example
//! ```
//! use zune_core::bit_depth::BitDepth;
//! use zune_core::colorspace::ColorSpace;
//! use zune_core::options::EncoderOptions;
//! use zune_rdi::{RdiDecoder, RdiEncoder};
//!
//! let pixels = vec![128_u8; 16 * 16 * 3];
//! let options = EncoderOptions::new(16, 16, ColorSpace::RGB, BitDepth::Eight);
//! let file = RdiEncoder::new(&pixels, options).encode().unwrap();
//!
//! let mut decoder = RdiDecoder::new(&file);
//! let decoded = decoder.decode().unwrap();
//! assert_eq!(decoded, pixels);
//! ```

pub use buffer::PixelBuffer;
pub use decoder::*;
pub use encoder::*;
pub use engine::{EngineLimits, TransformEngine, MAX_DIMENSION, MAX_PAYLOAD};
pub use errors::*;
pub use header::{probe_rdi, RdiHeader};
pub use modes::{Chroma, ColorModel, Layout, ModeTransform, Storage};
pub use registry::{ModeRegistry, DEFAULT_MODE, INVALID_MODE};
pub use zune_core;

mod buffer;
mod chroma;
pub mod color;
mod compress;
mod decoder;
mod encoder;
mod engine;
mod errors;
pub mod header;
mod modes;
pub mod nibble;
mod plane;
pub mod quantizer;
mod registry;
