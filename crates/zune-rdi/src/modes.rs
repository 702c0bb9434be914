/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Transform modes
//!
//! Every mode is a point along a few independent axes, scan layout,
//! colour model, chroma resolution and code storage. A [`ModeTransform`]
//! carries one such point for a fixed channel count and knows how to
//! encode, decode and size buffers for it.
//!
//! All modes split the image into single channel planes, code every scan
//! line of a plane as a verbatim header followed by deltas and then lay the
//! headers and deltas out in the output buffer.
use std::borrow::Cow;

use crate::buffer::PixelBuffer;
use crate::chroma::{downsample, subsampled_dimensions, upsample};
use crate::color::{rgb_to_ycocg, ycocg_to_rgb};
use crate::errors::RdiErrors;
use crate::nibble;
use crate::plane::Plane;
use crate::quantizer::DeltaCoding;

/// Where headers and deltas are placed in the encoded buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    /// Row major, the first pixel of every row verbatim and then one code
    /// per sample at the position of that sample
    Interleaved,
    /// Row headers of every plane first, then the deltas of every plane
    Planar,
    /// Planar, scanning columns instead of rows when the image is at least
    /// as tall as it is wide
    AspectAdaptive
}

/// Colour model the planes are coded in
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorModel {
    /// Code the stored channels as they are, with exact deltas
    Direct,
    /// Code luma, orange and green chroma (and alpha) with root deltas
    ///
    /// Single channel images are coded as a luma plane.
    YCoCg
}

/// Resolution of the chroma planes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Chroma {
    Full,
    /// Co and Cg averaged over 2x2 blocks
    Subsampled
}

/// How deltas are stored
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Storage {
    /// One delta per byte
    Simple,
    /// Two 4-bit codes per byte
    Packed
}

/// One mode bound to one channel count
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModeTransform {
    mode:     u16,
    channels: u8,
    layout:   Layout,
    color:    ColorModel,
    chroma:   Chroma,
    storage:  Storage
}

impl ModeTransform {
    pub(crate) const fn new(
        mode: u16, channels: u8, layout: Layout, color: ColorModel, chroma: Chroma,
        storage: Storage
    ) -> ModeTransform {
        ModeTransform {
            mode,
            channels,
            layout,
            color,
            chroma,
            storage
        }
    }

    pub const fn mode(&self) -> u16 {
        self.mode
    }

    pub const fn channels(&self) -> u8 {
        self.channels
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    pub const fn color_model(&self) -> ColorModel {
        self.color
    }

    pub const fn chroma(&self) -> Chroma {
        self.chroma
    }

    pub const fn storage(&self) -> Storage {
        self.storage
    }

    /// Whether `decode(encode(x)) == x` for every image
    pub const fn is_lossless(&self) -> bool {
        matches!(self.color, ColorModel::Direct)
    }

    const fn coding(&self) -> DeltaCoding {
        match self.color {
            ColorModel::Direct => DeltaCoding::Exact,
            ColorModel::YCoCg => DeltaCoding::RootDelta
        }
    }

    const fn uses_ycocg(&self) -> bool {
        matches!(self.color, ColorModel::YCoCg) && self.channels >= 3
    }

    const fn is_subsampled_plane(&self, index: usize) -> bool {
        matches!(self.chroma, Chroma::Subsampled) && self.uses_ycocg() && (index == 1 || index == 2)
    }

    const fn is_transposed(&self, width: usize, height: usize) -> bool {
        matches!(self.layout, Layout::AspectAdaptive) && height >= width
    }

    /// Width and height of every plane as it is coded
    fn plane_dimensions(&self, width: usize, height: usize) -> Vec<(usize, usize)> {
        let transposed = self.is_transposed(width, height);

        (0..usize::from(self.channels))
            .map(|index| {
                let (w, h) = if self.is_subsampled_plane(index) {
                    subsampled_dimensions(width, height)
                } else {
                    (width, height)
                };
                if transposed {
                    (h, w)
                } else {
                    (w, h)
                }
            })
            .collect()
    }

    /// Exact number of bytes [`encode`](Self::encode) produces for an
    /// image of `width` x `height`
    pub fn compute_length(&self, width: usize, height: usize) -> usize {
        if self.layout == Layout::Interleaved {
            return width * height * usize::from(self.channels);
        }
        let (headers, deltas) = self
            .plane_dimensions(width, height)
            .iter()
            .fold((0, 0), |(headers, deltas), &(w, h)| {
                (headers + h, deltas + Plane::delta_count(w, h))
            });

        match self.storage {
            Storage::Simple => headers + deltas,
            Storage::Packed => headers + deltas.div_ceil(2)
        }
    }

    fn check_channels(&self, channels: u8) -> Result<(), RdiErrors> {
        if channels != self.channels {
            return Err(RdiErrors::UnsupportedChannels(self.mode, channels));
        }
        Ok(())
    }

    /// Encode a raw image
    ///
    /// # Errors
    /// [`RdiErrors::UnsupportedChannels`] if the buffer channel count differs
    /// from the one this transform was resolved for
    pub fn encode(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, RdiErrors> {
        self.check_channels(buffer.channels())?;

        let (width, height) = (buffer.width(), buffer.height());
        let planes = self.split_planes(buffer);

        let data = match self.layout {
            Layout::Interleaved => self.encode_interleaved(&planes, width, height),
            Layout::Planar | Layout::AspectAdaptive => self.encode_planar(planes, width, height)
        };
        debug_assert_eq!(data.len(), self.compute_length(width, height));

        Ok(PixelBuffer::from_parts(
            width,
            height,
            width * usize::from(self.channels),
            self.channels,
            data
        ))
    }

    /// Decode an encoded buffer back into tightly packed pixels
    ///
    /// # Errors
    /// - [`RdiErrors::UnsupportedChannels`] on a channel count mismatch
    /// - [`RdiErrors::InsufficientData`] if the buffer is shorter than
    ///   [`compute_length`](Self::compute_length)
    pub fn decode(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, RdiErrors> {
        self.check_channels(buffer.channels())?;

        let (width, height) = (buffer.width(), buffer.height());
        let expected = self.compute_length(width, height);
        let data = buffer.data();

        if data.len() < expected {
            return Err(RdiErrors::InsufficientData(expected, data.len()));
        }
        let data = &data[..expected];

        let planes = match self.layout {
            Layout::Interleaved => self.decode_interleaved(data, width, height),
            Layout::Planar | Layout::AspectAdaptive => self.decode_planar(data, width, height)?
        };
        let pixels = self.merge_planes(&planes, width, height);

        Ok(PixelBuffer::from_parts(
            width,
            height,
            width * usize::from(self.channels),
            self.channels,
            pixels
        ))
    }

    /// Separate a buffer into one plane per channel, converting to YCoCg
    /// where the mode asks for it
    fn split_planes(&self, buffer: &PixelBuffer) -> Vec<Plane> {
        let (width, height) = (buffer.width(), buffer.height());
        let channels = usize::from(self.channels);
        let ycocg = self.uses_ycocg();

        let mut planes: Vec<Plane> = (0..channels).map(|_| Plane::new(width, height)).collect();

        for y in 0..height {
            let offset = y * width;

            for (x, pixel) in buffer.row(y).chunks_exact(channels).enumerate() {
                let index = offset + x;

                if ycocg {
                    let (l, co, cg) = rgb_to_ycocg(pixel[0], pixel[1], pixel[2]);

                    planes[0].data[index] = l;
                    planes[1].data[index] = co;
                    planes[2].data[index] = cg;

                    if channels == 4 {
                        planes[3].data[index] = pixel[3];
                    }
                } else {
                    for (plane, value) in planes.iter_mut().zip(pixel) {
                        plane.data[index] = *value;
                    }
                }
            }
        }
        planes
    }

    /// Interleave planes back into pixels, the inverse of `split_planes`
    fn merge_planes(&self, planes: &[Plane], width: usize, height: usize) -> Vec<u8> {
        let channels = usize::from(self.channels);
        let ycocg = self.uses_ycocg();
        let mut out = vec![0; width * height * channels];

        for (index, pixel) in out.chunks_exact_mut(channels).enumerate() {
            if ycocg {
                let (r, g, b) = ycocg_to_rgb(
                    planes[0].data[index],
                    planes[1].data[index],
                    planes[2].data[index]
                );
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;

                if channels == 4 {
                    pixel[3] = planes[3].data[index];
                }
            } else {
                for (value, plane) in pixel.iter_mut().zip(planes) {
                    *value = plane.data[index];
                }
            }
        }
        out
    }

    fn encode_interleaved(&self, planes: &[Plane], width: usize, height: usize) -> Vec<u8> {
        let channels = planes.len();
        let row_length = width * channels;
        let coding = self.coding();

        let mut out = vec![0; row_length * height];
        let mut headers = Vec::with_capacity(height);
        let mut deltas = Vec::with_capacity(Plane::delta_count(width, height));

        for (p, plane) in planes.iter().enumerate() {
            headers.clear();
            deltas.clear();
            plane.encode_rows(coding, &mut headers, &mut deltas);

            for (y, row) in out.chunks_exact_mut(row_length).enumerate() {
                row[p] = headers[y];

                let codes = &deltas[y * (width - 1)..(y + 1) * (width - 1)];

                for (x, code) in codes.iter().enumerate() {
                    row[(x + 1) * channels + p] = *code;
                }
            }
        }
        out
    }

    fn decode_interleaved(&self, data: &[u8], width: usize, height: usize) -> Vec<Plane> {
        let channels = usize::from(self.channels);
        let row_length = width * channels;
        let coding = self.coding();

        let mut headers = Vec::with_capacity(height);
        let mut deltas = Vec::with_capacity(Plane::delta_count(width, height));

        (0..channels)
            .map(|p| {
                headers.clear();
                deltas.clear();

                for row in data.chunks_exact(row_length) {
                    headers.push(row[p]);
                    deltas.extend(row[channels..].iter().skip(p).step_by(channels));
                }
                Plane::decode_rows(width, height, coding, &headers, &deltas)
            })
            .collect()
    }

    fn encode_planar(&self, mut planes: Vec<Plane>, width: usize, height: usize) -> Vec<u8> {
        let coding = self.coding();

        for (index, plane) in planes.iter_mut().enumerate() {
            if self.is_subsampled_plane(index) {
                *plane = downsample(plane);
            }
        }
        if self.is_transposed(width, height) {
            planes = planes.iter().map(Plane::transpose).collect();
        }
        let mut out = Vec::with_capacity(self.compute_length(width, height));
        let mut deltas = Vec::with_capacity(out.capacity());

        for plane in &planes {
            plane.encode_rows(coding, &mut out, &mut deltas);
        }
        match self.storage {
            Storage::Simple => out.extend_from_slice(&deltas),
            Storage::Packed => out.extend(nibble::pack(&deltas))
        }
        out
    }

    fn decode_planar(
        &self, data: &[u8], width: usize, height: usize
    ) -> Result<Vec<Plane>, RdiErrors> {
        let coding = self.coding();
        let dimensions = self.plane_dimensions(width, height);

        let header_length: usize = dimensions.iter().map(|(_, h)| h).sum();
        let delta_length: usize = dimensions
            .iter()
            .map(|&(w, h)| Plane::delta_count(w, h))
            .sum();

        if data.len() < header_length {
            return Err(RdiErrors::InsufficientData(header_length, data.len()));
        }
        let (headers, rest) = data.split_at(header_length);

        let deltas: Cow<[u8]> = match self.storage {
            Storage::Simple => {
                if rest.len() < delta_length {
                    return Err(RdiErrors::InsufficientData(
                        header_length + delta_length,
                        data.len()
                    ));
                }
                Cow::Borrowed(&rest[..delta_length])
            }
            Storage::Packed => Cow::Owned(nibble::unpack(rest, delta_length)?)
        };

        let mut planes = Vec::with_capacity(dimensions.len());
        let (mut header_offset, mut delta_offset) = (0, 0);

        for &(w, h) in &dimensions {
            let count = Plane::delta_count(w, h);

            planes.push(Plane::decode_rows(
                w,
                h,
                coding,
                &headers[header_offset..header_offset + h],
                &deltas[delta_offset..delta_offset + count]
            ));
            header_offset += h;
            delta_offset += count;
        }

        if self.is_transposed(width, height) {
            planes = planes.iter().map(Plane::transpose).collect();
        }
        for (index, plane) in planes.iter_mut().enumerate() {
            if self.is_subsampled_plane(index) {
                *plane = upsample(plane, width, height);
            }
        }
        Ok(planes)
    }
}
