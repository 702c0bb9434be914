/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::{DecoderOptions, EncoderOptions};
use zune_rdi::{RdiDecoder, RdiEncoder, TransformEngine};

use crate::bmp::{decode_bmp, encode_bmp};
use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::CliErrors;
use crate::formats::ImageFormat;

/// Tightly packed 8 bit pixels moving between a decoder and an encoder
#[derive(Debug)]
pub struct RawImage {
    pub width:      usize,
    pub height:     usize,
    pub colorspace: ColorSpace,
    pub pixels:     Vec<u8>
}

impl RawImage {
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace, pixels: Vec<u8>
    ) -> Result<RawImage, CliErrors> {
        if width == 0 || height == 0 {
            return Err(CliErrors::Usage("Image dimensions cannot be zero".to_string()));
        }
        if width * height * colorspace.num_components() != pixels.len() {
            return Err(CliErrors::Usage(format!(
                "Expected {} bytes for a {width}x{height} {colorspace:?} image, found {}",
                width * height * colorspace.num_components(),
                pixels.len()
            )));
        }
        Ok(RawImage {
            width,
            height,
            colorspace,
            pixels
        })
    }

    pub fn channels(&self) -> usize {
        self.colorspace.num_components()
    }
}

/// Check the input exists and that the output may be written
fn verify_file_paths(input: &Path, output: &Path, overwrite: bool) -> Result<(), CliErrors> {
    if input == output {
        return Err(CliErrors::Usage(format!(
            "Cannot use {input:?} as both input and output"
        )));
    }
    if !input.is_file() {
        return Err(CliErrors::Usage(format!(
            "Path {input:?} does not exist or is not a file"
        )));
    }
    if output.exists() {
        if !overwrite {
            return Err(CliErrors::OutputExists(output.to_path_buf()));
        }
        info!("Overwriting path {output:?}");
    }
    Ok(())
}

/// Work out the formats and the output path
///
/// Explicit formats win over extensions. Without an output path the output
/// format falls back to the counterpart of the input (RDI for images, BMP
/// for RDI files) and the output is the input with that extension.
fn resolve_formats(
    options: &CmdOptions
) -> Result<(ImageFormat, ImageFormat, PathBuf), CliErrors> {
    let from = match options.formats.0 {
        Some(format) => format,
        None => ImageFormat::from_path(&options.input)?
    };
    let (to, output) = match (options.formats.1, &options.output) {
        (Some(to), Some(output)) => (to, output.clone()),
        (None, Some(output)) => (ImageFormat::from_path(output)?, output.clone()),
        (to, None) => {
            let to = to.unwrap_or(match from {
                ImageFormat::Rdi => ImageFormat::Bmp,
                _ => ImageFormat::Rdi
            });
            (to, options.input.with_extension(to.extension()))
        }
    };
    for format in [from, to] {
        if !format.is_implemented() {
            return Err(CliErrors::NotImplemented(format));
        }
    }
    Ok((from, to, output))
}

fn decode_rdi(data: &[u8], strict_mode: bool) -> Result<RawImage, CliErrors> {
    let options = DecoderOptions::default().set_strict_mode(strict_mode);
    let mut decoder = RdiDecoder::new_with_options(data, options);

    decoder.decode_headers()?;

    let (width, height) = decoder
        .dimensions()
        .ok_or_else(|| CliErrors::Usage("RDI headers were not decoded".to_string()))?;
    let colorspace = decoder
        .colorspace()
        .ok_or_else(|| CliErrors::Usage("RDI headers were not decoded".to_string()))?;

    debug!("RDI mode: {:?}", decoder.mode());

    let pixels = decoder.decode()?;

    RawImage::new(width, height, colorspace, pixels)
}

fn encode_rdi(image: &RawImage, mode: u16) -> Result<Vec<u8>, CliErrors> {
    let options = EncoderOptions::new(image.width, image.height, image.colorspace, BitDepth::Eight);
    let mut encoder = RdiEncoder::new(&image.pixels, options);

    encoder.set_mode(mode);
    info!("Encoding with mode {}", TransformEngine::effective_mode(mode));

    Ok(encoder.encode()?)
}

fn temporary_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();

    name.push(format!(".{}.tmp", std::process::id()));
    output.with_file_name(name)
}

/// Write `bytes` next to `output` first and rename into place, so a failed
/// write never leaves a truncated file behind
fn write_file(output: &Path, bytes: &[u8]) -> Result<(), CliErrors> {
    let temporary = temporary_path(output);

    debug!("Writing {} bytes to {temporary:?}", bytes.len());

    let result = fs::write(&temporary, bytes).and_then(|_| fs::rename(&temporary, output));

    if let Err(err) = result {
        if temporary.exists() {
            if let Err(remove_err) = fs::remove_file(&temporary) {
                warn!("Could not remove {temporary:?}: {remove_err}");
            }
        }
        return Err(CliErrors::IoErrors(err));
    }
    Ok(())
}

/// Run a whole conversion as described by `options`
pub(crate) fn convert(options: &CmdOptions) -> Result<(), CliErrors> {
    let (from, to, output) = resolve_formats(options)?;

    verify_file_paths(&options.input, &output, options.overwrite)?;

    info!(
        "Converting {:?} ({}) to {:?} ({})",
        options.input,
        from.name(),
        output,
        to.name()
    );
    let data = fs::read(&options.input)?;

    let image = match from {
        ImageFormat::Bmp => decode_bmp(&data)?,
        ImageFormat::Rdi => decode_rdi(&data, options.strict_mode)?,
        format => return Err(CliErrors::NotImplemented(format))
    };
    info!(
        "Image: {}x{} {:?}",
        image.width, image.height, image.colorspace
    );

    let bytes = match to {
        ImageFormat::Bmp => encode_bmp(&image)?,
        ImageFormat::Rdi => encode_rdi(&image, options.mode)?,
        format => return Err(CliErrors::NotImplemented(format))
    };
    write_file(&output, &bytes)?;

    info!("Wrote {} bytes", bytes.len());

    Ok(())
}
