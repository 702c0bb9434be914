/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed RDI file header
//!
//! All fields are little endian.
//!
//! | offset | size | field        |
//! |--------|------|--------------|
//! | 0      | 8    | signature    |
//! | 8      | 2    | version      |
//! | 10     | 4    | data offset  |
//! | 14     | 4    | width        |
//! | 18     | 4    | height       |
//! | 22     | 2    | channels     |
//! | 24     | 2    | colour depth |
//! | 26     | 2    | mode         |
use crate::buffer::check_channels;
use crate::errors::RdiErrors;

/// `ANR\0RDI\0` read as a little endian integer
pub const RDI_SIGNATURE: u64 = 0x0049_4452_0052_4E41;

/// Bytes taken by the header fields
pub const RDI_HEADER_SIZE: usize = 28;

/// Where the encoder places the compressed payload
pub const RDI_DATA_OFFSET: usize = 32;

pub const RDI_VERSION: u16 = 1;

/// The only colour depth stored in RDI files
pub const RDI_DEPTH: u16 = 8;

/// Parsed RDI header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RdiHeader {
    pub data_offset: usize,
    pub width:       usize,
    pub height:      usize,
    pub channels:    u8,
    pub mode:        u16
}

#[inline]
fn read_u16(header: &[u8; RDI_HEADER_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([header[offset], header[offset + 1]])
}

#[inline]
fn read_u32(header: &[u8; RDI_HEADER_SIZE], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3]
    ])
}

/// Check whether `bytes` starts with the RDI signature
pub fn probe_rdi(bytes: &[u8]) -> bool {
    bytes
        .get(..8)
        .and_then(|s| <[u8; 8]>::try_from(s).ok())
        .map_or(false, |s| u64::from_le_bytes(s) == RDI_SIGNATURE)
}

impl RdiHeader {
    /// Header for a new file with the payload at the default offset
    pub const fn new(width: usize, height: usize, channels: u8, mode: u16) -> RdiHeader {
        RdiHeader {
            data_offset: RDI_DATA_OFFSET,
            width,
            height,
            channels,
            mode
        }
    }

    /// Parse and validate the header at the start of `bytes`
    ///
    /// Limits on the dimensions are not checked here, that is up to the
    /// decoder and its options.
    ///
    /// # Errors
    /// - [`RdiErrors::InsufficientData`] if `bytes` is shorter than the header
    /// - [`RdiErrors::WrongSignature`] if the signature does not match
    /// - [`RdiErrors::UnsupportedVersion`], [`RdiErrors::UnknownChannels`] or
    ///   [`RdiErrors::UnsupportedDepth`] for values we cannot decode
    /// - [`RdiErrors::MalformedData`] for zero dimensions or a data offset
    ///   pointing inside the header or past the end of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<RdiHeader, RdiErrors> {
        let header: &[u8; RDI_HEADER_SIZE] = bytes
            .get(..RDI_HEADER_SIZE)
            .and_then(|s| s.try_into().ok())
            .ok_or(RdiErrors::InsufficientData(RDI_HEADER_SIZE, bytes.len()))?;

        if !probe_rdi(header) {
            return Err(RdiErrors::WrongSignature);
        }
        let version = read_u16(header, 8);

        if version != RDI_VERSION {
            return Err(RdiErrors::UnsupportedVersion(version));
        }
        let data_offset = read_u32(header, 10) as usize;
        let width = read_u32(header, 14) as usize;
        let height = read_u32(header, 18) as usize;
        let channels = read_u16(header, 22);
        let depth = read_u16(header, 24);
        let mode = read_u16(header, 26);

        if data_offset < RDI_HEADER_SIZE {
            return Err(RdiErrors::MalformedData("data offset points inside the header"));
        }
        if data_offset > bytes.len() {
            return Err(RdiErrors::InsufficientData(data_offset, bytes.len()));
        }
        if width == 0 || height == 0 {
            return Err(RdiErrors::MalformedData("image dimensions cannot be zero"));
        }
        let channels = u8::try_from(channels).map_err(|_| RdiErrors::UnknownChannels(u8::MAX))?;
        check_channels(channels)?;

        if depth != RDI_DEPTH {
            return Err(RdiErrors::UnsupportedDepth(depth));
        }
        Ok(RdiHeader {
            data_offset,
            width,
            height,
            channels,
            mode
        })
    }

    /// Serialize the header, zero padded up to the data offset
    ///
    /// # Errors
    /// [`RdiErrors::TooLargeDimensions`] if a dimension does not fit in 32 bits
    pub fn to_bytes(&self) -> Result<Vec<u8>, RdiErrors> {
        let width = u32::try_from(self.width)
            .map_err(|_| RdiErrors::TooLargeDimensions("width", u32::MAX as usize, self.width))?;
        let height = u32::try_from(self.height).map_err(|_| {
            RdiErrors::TooLargeDimensions("height", u32::MAX as usize, self.height)
        })?;
        let data_offset = u32::try_from(self.data_offset)
            .map_err(|_| RdiErrors::MalformedData("data offset does not fit in 32 bits"))?;

        let mut out = Vec::with_capacity(self.data_offset.max(RDI_HEADER_SIZE));

        out.extend_from_slice(&RDI_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&RDI_VERSION.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&u16::from(self.channels).to_le_bytes());
        out.extend_from_slice(&RDI_DEPTH.to_le_bytes());
        out.extend_from_slice(&self.mode.to_le_bytes());
        out.resize(self.data_offset.max(RDI_HEADER_SIZE), 0);

        Ok(out)
    }
}
