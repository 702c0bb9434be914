/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image formats known to the converter
use std::path::Path;

use crate::errors::CliErrors;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Bmp,
    Rdi,
    Png,
    Jpeg
}

impl ImageFormat {
    /// Match a format name or file extension, case insensitive
    pub fn from_name(name: &str) -> Option<ImageFormat> {
        match name.to_ascii_lowercase().as_str() {
            "bmp" => Some(ImageFormat::Bmp),
            "rdi" => Some(ImageFormat::Rdi),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None
        }
    }

    /// Guess the format from the extension of `path`
    pub fn from_path(path: &Path) -> Result<ImageFormat, CliErrors> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| CliErrors::UnknownFormat(format!("{}", path.display())))?;

        ImageFormat::from_name(extension)
            .ok_or_else(|| CliErrors::UnknownFormat(extension.to_string()))
    }

    pub const fn name(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "BMP",
            ImageFormat::Rdi => "RDI",
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG"
        }
    }

    /// File extension used when the output path is derived from the input
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Rdi => "rdi",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg"
        }
    }

    /// Whether images of this format can be read and written
    pub const fn is_implemented(self) -> bool {
        matches!(self, ImageFormat::Bmp | ImageFormat::Rdi)
    }
}

/// Formats given on the command line, either side may be left out
pub type FormatPair = (Option<ImageFormat>, Option<ImageFormat>);

/// Parse `FROM:TO`, `FROM`, `FROM:` or `:TO`, e.g. `bmp:rdi`
pub fn parse_format_pair(value: &str) -> Result<FormatPair, CliErrors> {
    let (from, to) = value.split_once(':').unwrap_or((value, ""));

    let parse = |name: &str| -> Result<Option<ImageFormat>, CliErrors> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        ImageFormat::from_name(name)
            .map(Some)
            .ok_or_else(|| CliErrors::UnknownFormat(name.to_string()))
    };
    let pair = (parse(from)?, parse(to)?);

    if pair == (None, None) {
        return Err(CliErrors::Usage(format!(
            "Expected FROM:TO, FROM or :TO for --format, got `{value}`"
        )));
    }
    Ok(pair)
}
