/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during transforming, encoding and decoding
use std::fmt::{Debug, Display, Formatter};

use zune_core::colorspace::ColorSpace;
use zune_inflate::errors::{DecodeErrorStatus, InflateDecodeErrors};

/// Broad classification of an [`RdiErrors`] value
///
/// Callers that only need to decide how to react to a failure
/// (e.g. which exit code to use) can match on this instead of
/// every individual variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The input is shorter than it claims to be or is structurally inconsistent
    MalformedData,
    /// The mode, channel count, version or depth is not one we handle
    VariantNotSupported,
    /// The input exceeds a hard limit on dimensions or size
    ConstraintViolation,
    /// Writing to the underlying sink failed
    Io
}

/// Errors that may occur in the transform engine and the RDI codec
#[non_exhaustive]
pub enum RdiErrors {
    /// The buffer doesn't have enough bytes to reconstruct the image
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually present
    InsufficientData(usize, usize),
    /// Packed codes end before the number of codes requested
    ///
    /// # Arguments
    /// - 1st argument is the number of codes expected
    /// - 2nd argument is the number of packed bytes present
    TruncatedNibbles(usize, usize),
    /// The file does not start with the RDI signature
    WrongSignature,
    /// Structural inconsistency that has no dedicated variant
    MalformedData(&'static str),
    /// Mode value that can never be resolved, `0xFFFF` or the reserved `0`
    InvalidMode(u16),
    /// Mode value that was never assigned
    UnknownMode(u16),
    /// Mode value that was retired and can no longer be used
    DeprecatedMode(u16),
    /// The mode exists but cannot handle this number of channels
    ///
    /// # Arguments
    /// - 1st argument is the mode
    /// - 2nd argument is the channel count requested
    UnsupportedChannels(u16, u8),
    /// Channel count outside of 1, 3 and 4
    UnknownChannels(u8),
    /// Container version we do not understand
    UnsupportedVersion(u16),
    /// Colour depth other than eight bits per sample
    UnsupportedDepth(u16),
    /// Colorspace that cannot be stored in an RDI file
    UnsupportedColorspace(ColorSpace),
    /// Dimensions exceed the configured limit
    ///
    /// # Arguments
    /// - 1st argument is the dimension name, `width` or `height`
    /// - 2nd argument is the configured limit
    /// - 3rd argument is the value found
    TooLargeDimensions(&'static str, usize, usize),
    /// Image or payload size exceeds the configured limit
    ///
    /// # Arguments
    /// - 1st argument is the configured limit
    /// - 2nd argument is the size found
    TooLargePayload(usize, usize),
    /// The zlib stream could not be decompressed
    InflateErrors(String),
    /// Error writing the compressed stream
    IoErrors(std::io::Error),
    /// Generic message
    Generic(String)
}

impl RdiErrors {
    /// Return the broad category this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            RdiErrors::InsufficientData(..)
            | RdiErrors::TruncatedNibbles(..)
            | RdiErrors::WrongSignature
            | RdiErrors::MalformedData(_)
            | RdiErrors::InflateErrors(_)
            | RdiErrors::Generic(_) => ErrorKind::MalformedData,

            RdiErrors::InvalidMode(_)
            | RdiErrors::UnknownMode(_)
            | RdiErrors::DeprecatedMode(_)
            | RdiErrors::UnsupportedChannels(..)
            | RdiErrors::UnknownChannels(_)
            | RdiErrors::UnsupportedVersion(_)
            | RdiErrors::UnsupportedDepth(_)
            | RdiErrors::UnsupportedColorspace(_) => ErrorKind::VariantNotSupported,

            RdiErrors::TooLargeDimensions(..) | RdiErrors::TooLargePayload(..) => {
                ErrorKind::ConstraintViolation
            }
            RdiErrors::IoErrors(_) => ErrorKind::Io
        }
    }
}

impl Debug for RdiErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RdiErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, required {expected} bytes but buffer has {found}"
                )
            }
            RdiErrors::TruncatedNibbles(expected, found) => {
                writeln!(
                    f,
                    "Truncated packed codes, {expected} codes need {} bytes but found {found}",
                    expected.div_ceil(2)
                )
            }
            RdiErrors::WrongSignature => {
                writeln!(f, "Wrong signature, expected `ANR\\0RDI\\0` as file start")
            }
            RdiErrors::MalformedData(reason) => {
                writeln!(f, "Malformed data: {reason}")
            }
            RdiErrors::InvalidMode(mode) => {
                writeln!(f, "Invalid mode {mode:#06x}")
            }
            RdiErrors::UnknownMode(mode) => {
                writeln!(f, "Unknown mode {mode}")
            }
            RdiErrors::DeprecatedMode(mode) => {
                writeln!(f, "Mode {mode} is deprecated and can no longer be used")
            }
            RdiErrors::UnsupportedChannels(mode, channels) => {
                writeln!(f, "Mode {mode} does not support images with {channels} channels")
            }
            RdiErrors::UnknownChannels(channels) => {
                writeln!(
                    f,
                    "Unknown channel count {channels}, expected either 1, 3 or 4"
                )
            }
            RdiErrors::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported RDI version {version}, expected 1")
            }
            RdiErrors::UnsupportedDepth(depth) => {
                writeln!(f, "Unsupported colour depth {depth}, expected 8")
            }
            RdiErrors::UnsupportedColorspace(colorspace) => {
                writeln!(
                    f,
                    "Cannot encode image with colorspace {colorspace:?} into RDI, supported ones are Luma, RGB and RGBA"
                )
            }
            RdiErrors::TooLargeDimensions(name, limit, found) => {
                writeln!(
                    f,
                    "Too large image {name} {found}, maximum configured is {limit}"
                )
            }
            RdiErrors::TooLargePayload(limit, found) => {
                writeln!(f, "Too large payload {found} bytes, maximum is {limit}")
            }
            RdiErrors::InflateErrors(reason) => {
                writeln!(f, "Could not decompress payload: {reason}")
            }
            RdiErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            RdiErrors::Generic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for RdiErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for RdiErrors {}

impl From<std::io::Error> for RdiErrors {
    fn from(value: std::io::Error) -> Self {
        RdiErrors::IoErrors(value)
    }
}

impl From<InflateDecodeErrors> for RdiErrors {
    fn from(value: InflateDecodeErrors) -> Self {
        match value.error {
            DecodeErrorStatus::OutputLimitExceeded(limit, found) => {
                RdiErrors::TooLargePayload(limit, found)
            }
            other => RdiErrors::InflateErrors(format!("{other:?}").trim_end().to_string())
        }
    }
}
