/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::trace;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;

use crate::buffer::PixelBuffer;
use crate::compress::compress;
use crate::engine::TransformEngine;
use crate::errors::RdiErrors;
use crate::header::RdiHeader;

/// Root Delta Image encoder
///
/// # Example
/// - Encode a 100 by 100 RGB image with the packed YCoCg mode
///
/// ```
/// use zune_core::bit_depth::BitDepth;
/// use zune_core::colorspace::ColorSpace;
/// use zune_core::options::EncoderOptions;
/// use zune_rdi::{RdiEncoder, RdiErrors};
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), RdiErrors> {
///     let pixels = (0..W * H * 3).map(|i| (i % 256) as u8).collect::<Vec<u8>>();
///     let options = EncoderOptions::new(W, H, ColorSpace::RGB, BitDepth::Eight);
///     let mut encoder = RdiEncoder::new(&pixels, options);
///     encoder.set_mode(8);
///     let file = encoder.encode()?;
///     // write file, or do something
///     Ok(())
/// }
/// ```
pub struct RdiEncoder<'a> {
    pixel_data: &'a [u8],
    options:    EncoderOptions,
    engine:     TransformEngine,
    mode:       u16
}

impl<'a> RdiEncoder<'a> {
    /// Create a new encoder for `data`
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width*height*colorspace channels`
    /// - options: width, height, colorspace and depth of the pixels
    pub fn new(data: &'a [u8], options: EncoderOptions) -> RdiEncoder<'a> {
        RdiEncoder {
            pixel_data: data,
            options,
            engine: TransformEngine::new(),
            mode: 0
        }
    }

    /// Use a custom engine, e.g. one with lower limits
    pub fn set_engine(&mut self, engine: TransformEngine) {
        self.engine = engine;
    }

    /// Select the transform mode, `0` picks the default
    pub fn set_mode(&mut self, mode: u16) {
        self.mode = mode;
    }

    fn channels(&self) -> Result<u8, RdiErrors> {
        match self.options.get_colorspace() {
            ColorSpace::Luma => Ok(1),
            ColorSpace::RGB => Ok(3),
            ColorSpace::RGBA => Ok(4),
            colorspace => Err(RdiErrors::UnsupportedColorspace(colorspace))
        }
    }

    /// Encode the pixels into a complete RDI file
    ///
    /// # Errors
    /// - [`RdiErrors::UnsupportedColorspace`] for colorspaces other than Luma, RGB and RGBA
    /// - [`RdiErrors::UnsupportedDepth`] for depths other than eight bits
    /// - [`RdiErrors::InsufficientData`] or [`RdiErrors::MalformedData`] if the
    ///   pixel length does not match the dimensions
    /// - any error of [`TransformEngine::encode`]
    pub fn encode(&self) -> Result<Vec<u8>, RdiErrors> {
        let channels = self.channels()?;

        let depth = self.options.get_depth();

        if !matches!(depth, BitDepth::Eight) {
            return Err(RdiErrors::UnsupportedDepth(depth.size_of() as u16 * 8));
        }
        let (width, height) = (self.options.get_width(), self.options.get_height());

        self.engine.limits().check(width, height, channels)?;

        let expected = width * height * usize::from(channels);

        if self.pixel_data.len() != expected {
            return Err(RdiErrors::MalformedData(
                "Expected length doesn't match pixels length"
            ));
        }
        let mode = TransformEngine::effective_mode(self.mode);
        let buffer = PixelBuffer::new(width, height, channels, self.pixel_data.to_vec())?;
        let encoded = self.engine.encode(&buffer, mode)?;
        let payload = compress(encoded.data())?;

        trace!("Image width: {width}");
        trace!("Image height: {height}");
        trace!("Image colorspace: {:?}", self.options.get_colorspace());
        trace!("Mode: {mode}");
        trace!(
            "Transformed size: {}, compressed size: {}",
            encoded.byte_length(),
            payload.len()
        );

        let mut out = RdiHeader::new(width, height, channels, mode).to_bytes()?;
        out.extend_from_slice(&payload);

        Ok(out)
    }
}
