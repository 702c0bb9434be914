/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::{trace, warn};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;

use crate::buffer::PixelBuffer;
use crate::compress::decompress;
use crate::engine::{TransformEngine, MAX_DIMENSION};
use crate::errors::RdiErrors;
use crate::header::{RdiHeader, RDI_DATA_OFFSET};

/// A Root Delta Image decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels
///
/// Details of the image like width, height and mode are
/// accessible after decoding headers
///
/// [`decode_headers`]:RdiDecoder::decode_headers
/// [`decode`]:RdiDecoder::decode
pub struct RdiDecoder<'a> {
    data:    &'a [u8],
    header:  Option<RdiHeader>,
    options: DecoderOptions,
    engine:  TransformEngine
}

impl<'a> RdiDecoder<'a> {
    /// Create a new decoder with lenient defaults
    ///
    /// Strict mode is off and the dimension limits are the engine's
    /// [`MAX_DIMENSION`], zune-core's own defaults are strict and stop at
    /// `1 << 14`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let mut decoder = zune_rdi::RdiDecoder::new(&[]);
    /// // additional code
    /// ```
    pub fn new(data: &'a [u8]) -> RdiDecoder<'a> {
        let options = DecoderOptions::default()
            .set_strict_mode(false)
            .set_max_width(MAX_DIMENSION)
            .set_max_height(MAX_DIMENSION);

        RdiDecoder::new_with_options(data, options)
    }

    /// Create a new decoder that obeys specified restrictions
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Example
    /// ```
    /// use zune_core::options::DecoderOptions;
    /// use zune_rdi::RdiDecoder;
    /// // only decode images less than 10 in both width and height
    ///
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = RdiDecoder::new_with_options(&[], options);
    /// ```
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> RdiDecoder<'a> {
        RdiDecoder {
            data,
            header: None,
            options,
            engine: TransformEngine::new()
        }
    }

    /// Use a custom engine, e.g. one with lower limits
    pub fn set_engine(&mut self, engine: TransformEngine) {
        self.engine = engine;
    }

    /// Decode the RDI header storing needed information into
    /// the decoder instance
    ///
    /// # Errors
    /// - errors of [`RdiHeader::parse`]
    /// - [`RdiErrors::TooLargeDimensions`] when the image is larger than the
    ///   decoder options or engine limits allow
    /// - [`RdiErrors::InvalidMode`] and friends when the stored mode cannot be
    ///   resolved for the stored channel count
    pub fn decode_headers(&mut self) -> Result<(), RdiErrors> {
        if self.header.is_some() {
            return Ok(());
        }
        let header = RdiHeader::parse(self.data)?;

        if header.width > self.options.get_max_width() {
            return Err(RdiErrors::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                header.width
            ));
        }
        if header.height > self.options.get_max_height() {
            return Err(RdiErrors::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                header.height
            ));
        }
        self.engine
            .limits()
            .check(header.width, header.height, header.channels)?;
        // fail early on modes we cannot decode
        self.engine.resolve(header.mode, header.channels)?;

        if header.data_offset != RDI_DATA_OFFSET {
            if self.options.get_strict_mode() {
                return Err(RdiErrors::MalformedData("unexpected data offset"));
            }
            warn!(
                "Data offset is {}, expected {RDI_DATA_OFFSET}",
                header.data_offset
            );
        }

        trace!("Image width: {}", header.width);
        trace!("Image height: {}", header.height);
        trace!("Image channels: {}", header.channels);
        trace!("Mode: {}", header.mode);

        self.header = Some(header);

        Ok(())
    }

    /// Return the image width and height or `None` if headers
    /// were not decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header.map(|h| (h.width, h.height))
    }

    /// Return the colorspace of the decoded pixels or `None` if headers
    /// were not decoded
    pub fn colorspace(&self) -> Option<ColorSpace> {
        self.header.map(|h| match h.channels {
            1 => ColorSpace::Luma,
            4 => ColorSpace::RGBA,
            _ => ColorSpace::RGB
        })
    }

    /// RDI images are always eight bits per sample
    pub const fn depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Return the transform mode stored in the file or `None` if headers
    /// were not decoded
    pub fn mode(&self) -> Option<u16> {
        self.header.map(|h| h.mode)
    }

    /// Number of bytes [`decode`](Self::decode) returns, or `None` if headers
    /// were not decoded
    pub fn output_buffer_size(&self) -> Option<usize> {
        self.header.and_then(|h| {
            h.width
                .checked_mul(h.height)?
                .checked_mul(usize::from(h.channels))
        })
    }

    /// Decode the file, returning tightly packed pixels
    ///
    /// Samples are ordered `R,G,B[,A]`, or a single gray sample per pixel
    ///
    /// # Errors
    /// - errors of [`decode_headers`](Self::decode_headers)
    /// - [`RdiErrors::InflateErrors`] or [`RdiErrors::TooLargePayload`] if the
    ///   compressed payload is corrupt or holds more than the image needs
    /// - [`RdiErrors::InsufficientData`] if it holds less
    pub fn decode(&mut self) -> Result<Vec<u8>, RdiErrors> {
        self.decode_headers()?;

        let header = self
            .header
            .ok_or(RdiErrors::MalformedData("headers were not decoded"))?;

        let expected =
            self.engine
                .compute_length(header.mode, header.width, header.height, header.channels)?;

        let payload = decompress(&self.data[header.data_offset..], expected)?;

        trace!(
            "Compressed size: {}, transformed size: {}",
            self.data.len() - header.data_offset,
            payload.len()
        );

        let encoded = PixelBuffer::encoded(header.width, header.height, header.channels, payload)?;
        let decoded = self.engine.decode(&encoded, header.mode)?;

        Ok(decoded.into_data())
    }
}
