/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use zune_core::colorspace::ColorSpace;

use crate::errors::RdiErrors;

/// Check that `channels` is one of the counts the engine handles
pub(crate) fn check_channels(channels: u8) -> Result<(), RdiErrors> {
    match channels {
        1 | 3 | 4 => Ok(()),
        _ => Err(RdiErrors::UnknownChannels(channels))
    }
}

/// An image or an encoded transform output held in memory
///
/// Raw images carry `height` rows of `stride` bytes each, of which the
/// first `width * channels` are samples (`R,G,B[,A]` or a single gray
/// sample per pixel) and the rest padding.
///
/// Encoded buffers keep the dimensions and channel count of the image
/// they came from, with `stride` set to `width * channels`; their bytes are
/// only meaningful to the mode that produced them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PixelBuffer {
    width:       usize,
    height:      usize,
    stride:      usize,
    channels:    u8,
    byte_length: usize,
    data:        Vec<u8>
}

impl PixelBuffer {
    /// Create a buffer over tightly packed pixels
    ///
    /// # Errors
    /// - [`RdiErrors::UnknownChannels`] if `channels` is not 1, 3 or 4
    /// - [`RdiErrors::MalformedData`] on zero dimensions
    /// - [`RdiErrors::InsufficientData`] if `data` is shorter than
    ///   `width * height * channels`
    pub fn new(
        width: usize, height: usize, channels: u8, data: Vec<u8>
    ) -> Result<PixelBuffer, RdiErrors> {
        let stride = width
            .checked_mul(usize::from(channels))
            .ok_or(RdiErrors::MalformedData("row length overflows"))?;

        PixelBuffer::with_stride(width, height, stride, channels, data)
    }

    /// Create a buffer whose rows are `stride` bytes apart
    ///
    /// # Errors
    /// Same as [`PixelBuffer::new`], plus [`RdiErrors::MalformedData`]
    /// when `stride` is smaller than a row of samples. `data` must hold
    /// `(height - 1) * stride + width * channels` bytes.
    pub fn with_stride(
        width: usize, height: usize, stride: usize, channels: u8, data: Vec<u8>
    ) -> Result<PixelBuffer, RdiErrors> {
        check_channels(channels)?;

        if width == 0 || height == 0 {
            return Err(RdiErrors::MalformedData("image dimensions cannot be zero"));
        }
        let row_length = width
            .checked_mul(usize::from(channels))
            .ok_or(RdiErrors::MalformedData("row length overflows"))?;

        if stride < row_length {
            return Err(RdiErrors::MalformedData(
                "stride is smaller than width times channels"
            ));
        }
        // the last row needs no padding
        let byte_length = stride
            .checked_mul(height - 1)
            .and_then(|v| v.checked_add(row_length))
            .ok_or(RdiErrors::MalformedData("image size overflows"))?;

        if data.len() < byte_length {
            return Err(RdiErrors::InsufficientData(byte_length, data.len()));
        }
        Ok(PixelBuffer {
            width,
            height,
            stride,
            channels,
            byte_length,
            data
        })
    }

    /// Wrap transform output (or input to a transform decoder) for an image
    /// of the given dimensions
    ///
    /// No length check is done here, the engine compares the length
    /// against what the mode expects before decoding.
    ///
    /// # Errors
    /// - [`RdiErrors::UnknownChannels`] if `channels` is not 1, 3 or 4
    /// - [`RdiErrors::MalformedData`] on zero dimensions
    pub fn encoded(
        width: usize, height: usize, channels: u8, data: Vec<u8>
    ) -> Result<PixelBuffer, RdiErrors> {
        check_channels(channels)?;

        if width == 0 || height == 0 {
            return Err(RdiErrors::MalformedData("image dimensions cannot be zero"));
        }
        let stride = width
            .checked_mul(usize::from(channels))
            .ok_or(RdiErrors::MalformedData("row length overflows"))?;

        Ok(PixelBuffer::from_parts(width, height, stride, channels, data))
    }

    /// Build a buffer from values the caller has already validated
    pub(crate) fn from_parts(
        width: usize, height: usize, stride: usize, channels: u8, data: Vec<u8>
    ) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            stride,
            channels,
            byte_length: data.len(),
            data
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Distance in bytes between the start of two rows
    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// Number of meaningful bytes in [`data`](Self::data)
    pub const fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// The meaningful bytes of the buffer, `byte_length` long
    pub fn data(&self) -> &[u8] {
        &self.data[..self.byte_length]
    }

    /// Consume the buffer returning its bytes, truncated to `byte_length`
    pub fn into_data(mut self) -> Vec<u8> {
        self.data.truncate(self.byte_length);
        self.data
    }

    /// Samples of row `y` without padding
    ///
    /// # Panics
    /// If `y` is not less than the height
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * usize::from(self.channels)]
    }

    /// Colorspace matching the channel count
    pub const fn colorspace(&self) -> ColorSpace {
        match self.channels {
            1 => ColorSpace::Luma,
            4 => ColorSpace::RGBA,
            _ => ColorSpace::RGB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn validates_channels() {
        let err = PixelBuffer::new(1, 1, 2, vec![0; 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VariantNotSupported);
        assert!(PixelBuffer::new(1, 1, 1, vec![0]).is_ok());
        assert!(PixelBuffer::new(1, 1, 4, vec![0; 4]).is_ok());
    }

    #[test]
    fn validates_sizes() {
        let err = PixelBuffer::new(0, 1, 3, vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);

        let err = PixelBuffer::new(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, RdiErrors::InsufficientData(12, 11)));

        let err = PixelBuffer::with_stride(2, 2, 5, 3, vec![0; 12]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);

        let err = PixelBuffer::with_stride(2, 2, 8, 3, vec![0; 13]).unwrap_err();
        assert!(matches!(err, RdiErrors::InsufficientData(14, 13)));
    }

    #[test]
    fn rows_skip_padding() {
        let data = vec![1, 2, 3, 0, 4, 5, 6, 0];
        let buffer = PixelBuffer::with_stride(1, 2, 4, 3, data).unwrap();

        assert_eq!(buffer.row(0), [1, 2, 3]);
        assert_eq!(buffer.row(1), [4, 5, 6]);
        assert_eq!(buffer.byte_length(), 7);
        assert_eq!(buffer.colorspace(), ColorSpace::RGB);
    }

    #[test]
    fn last_row_may_skip_padding() {
        // 2x3 RGB rows padded to 8 bytes, the final row ends after its samples
        let mut data = Vec::new();
        for y in 0..3_u8 {
            data.extend_from_slice(&[y, y, y, y + 10, y + 10, y + 10]);
            if y < 2 {
                data.extend_from_slice(&[0xAA, 0xAA]);
            }
        }
        let buffer = PixelBuffer::with_stride(2, 3, 8, 3, data).unwrap();

        assert_eq!(buffer.byte_length(), 22);
        assert_eq!(buffer.row(2), [2, 2, 2, 12, 12, 12]);

        let engine = crate::TransformEngine::new();
        let encoded = engine.encode(&buffer, 1).unwrap();
        let decoded = engine.decode(&encoded, 1).unwrap();

        assert_eq!(decoded.row(0), buffer.row(0));
        assert_eq!(decoded.row(2), buffer.row(2));
    }
}
