/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use zune_rdi::{ErrorKind, RdiErrors};

use crate::formats::ImageFormat;

/// Errors the converter can run into
pub enum CliErrors {
    /// Bad or conflicting command line arguments
    Usage(String),
    /// File extension or format name we do not know
    UnknownFormat(String),
    /// Format we recognise but cannot read or write yet
    NotImplemented(ImageFormat),
    /// Refusing to replace an existing file without `--overwrite`
    OutputExists(PathBuf),
    /// The BMP decoder could not read the input
    BmpDecodeErrors(String),
    /// Pixel layout that cannot be converted
    UnsupportedColorspace(String),
    /// Image too large for the BMP writer
    ///
    /// # Arguments
    /// - 1st argument is the configured limit
    /// - 2nd argument is the value found
    TooLargeDimensions(usize, usize),
    RdiErrors(RdiErrors),
    IoErrors(std::io::Error)
}

impl CliErrors {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliErrors::Usage(_)
            | CliErrors::UnknownFormat(_)
            | CliErrors::OutputExists(_)
            | CliErrors::IoErrors(_) => 1,
            CliErrors::BmpDecodeErrors(_) => 2,
            CliErrors::UnsupportedColorspace(_) => 3,
            CliErrors::TooLargeDimensions(..) => 4,
            CliErrors::NotImplemented(_) => 5,
            CliErrors::RdiErrors(err) => match err.kind() {
                ErrorKind::MalformedData => 2,
                ErrorKind::VariantNotSupported => 3,
                ErrorKind::ConstraintViolation => 4,
                ErrorKind::Io => 1
            }
        }
    }
}

impl Debug for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CliErrors::Usage(reason) => writeln!(f, "{reason}"),
            CliErrors::UnknownFormat(name) => {
                writeln!(f, "Unknown image format `{name}`, expected bmp or rdi")
            }
            CliErrors::NotImplemented(format) => {
                writeln!(f, "Support for {} images is not implemented", format.name())
            }
            CliErrors::OutputExists(path) => {
                writeln!(
                    f,
                    "Output {path:?} exists, use --overwrite to replace it"
                )
            }
            CliErrors::BmpDecodeErrors(reason) => {
                writeln!(f, "Could not decode BMP: {reason}")
            }
            CliErrors::UnsupportedColorspace(colorspace) => {
                writeln!(f, "Cannot convert images with colorspace {colorspace}")
            }
            CliErrors::TooLargeDimensions(limit, found) => {
                writeln!(
                    f,
                    "Too large dimension {found} for BMP output, maximum is {limit}"
                )
            }
            CliErrors::RdiErrors(err) => writeln!(f, "{err:?}"),
            CliErrors::IoErrors(err) => writeln!(f, "I/O error {err}")
        }
    }
}

impl Display for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for CliErrors {}

impl From<RdiErrors> for CliErrors {
    fn from(err: RdiErrors) -> Self {
        CliErrors::RdiErrors(err)
    }
}

impl From<std::io::Error> for CliErrors {
    fn from(err: std::io::Error) -> Self {
        CliErrors::IoErrors(err)
    }
}
