/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! BMP reading and writing
//!
//! Uncompressed 8 bit grayscale, 24 bit and 32 bit bitmaps are read here,
//! top-down or bottom-up. Anything else is handed to `zune-bmp`. Writing
//! produces uncompressed bottom-up bitmaps with a `BITMAPINFOHEADER`: 8 bit
//! grayscale with a palette, 24 bit BGR or 32 bit BGRA.
use log::{debug, trace, warn};
use zune_bmp::BmpDecoder;
use zune_core::colorspace::ColorSpace;

use crate::errors::CliErrors;
use crate::workflow::RawImage;

/// Largest width or height the reader accepts and the writer emits
pub const MAX_BMP_DIMENSION: usize = 1 << 14;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = 40;
const PALETTE_SIZE: usize = 256 * 4;
/// 2835 pixels per meter, 72 DPI
const PIXELS_PER_METER: u32 = 2835;

/// The parts of a `BITMAPINFOHEADER` file the reader needs
#[derive(Debug, Copy, Clone)]
struct BmpHeader {
    width:          usize,
    height:         usize,
    top_down:       bool,
    bits_per_pixel: usize,
    data_offset:    usize
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3]
    ])
}

fn malformed(reason: &str) -> CliErrors {
    CliErrors::BmpDecodeErrors(reason.to_string())
}

/// Whether the palette maps every index to the gray level of the same value
fn is_gray_ramp(palette: &[u8]) -> bool {
    palette
        .chunks_exact(4)
        .enumerate()
        .all(|(i, entry)| entry[..3].iter().all(|&v| usize::from(v) == i))
}

/// Parse the file and info headers
///
/// Returns `None` for valid bitmaps this reader does not handle itself,
/// e.g. compressed or palette colour images.
fn parse_header(data: &[u8]) -> Result<Option<BmpHeader>, CliErrors> {
    if data.len() < FILE_HEADER_SIZE + INFO_HEADER_SIZE {
        return Err(malformed("file too small for a BMP header"));
    }
    if &data[..2] != b"BM" {
        return Err(malformed("not a BMP file"));
    }
    let data_offset = read_u32(data, 10) as usize;
    let info_size = read_u32(data, 14) as usize;

    if info_size < INFO_HEADER_SIZE {
        debug!("Info header of {info_size} bytes");
        return Ok(None);
    }
    let width = read_u32(data, 18) as i32;
    let height = read_u32(data, 22) as i32;

    if width <= 0 || height == 0 {
        return Err(malformed("invalid image dimensions"));
    }
    if read_u16(data, 26) != 1 {
        return Err(malformed("number of planes must be 1"));
    }
    let width = width.unsigned_abs() as usize;
    let (top_down, height) = (height < 0, height.unsigned_abs() as usize);

    for dimension in [width, height] {
        if dimension > MAX_BMP_DIMENSION {
            return Err(CliErrors::TooLargeDimensions(MAX_BMP_DIMENSION, dimension));
        }
    }
    let bits_per_pixel = usize::from(read_u16(data, 28));
    let compression = read_u32(data, 30);

    if compression != 0 || !matches!(bits_per_pixel, 8 | 24 | 32) {
        debug!("{bits_per_pixel} bits per pixel, compression {compression}");
        return Ok(None);
    }
    let mut pixels_start = FILE_HEADER_SIZE + info_size;

    if bits_per_pixel == 8 {
        let colors_used = read_u32(data, 46);
        let palette_end = pixels_start + PALETTE_SIZE;

        if !matches!(colors_used, 0 | 256) || palette_end > data.len() {
            return Ok(None);
        }
        if !is_gray_ramp(&data[pixels_start..palette_end]) {
            debug!("Palette is not a gray ramp");
            return Ok(None);
        }
        pixels_start = palette_end;
    }
    if data_offset < pixels_start {
        return Err(malformed("pixel data overlaps the headers"));
    }
    let stride = row_stride(width, bits_per_pixel);
    let image_size = read_u32(data, 34) as usize;

    if image_size != 0 && image_size != stride * height {
        warn!(
            "Header image size is {image_size}, expected {}",
            stride * height
        );
    }
    if data
        .len()
        .checked_sub(data_offset)
        .map_or(true, |left| left < stride * height)
    {
        return Err(malformed("pixel data is truncated"));
    }
    Ok(Some(BmpHeader {
        width,
        height,
        top_down,
        bits_per_pixel,
        data_offset
    }))
}

pub fn decode_bmp(data: &[u8]) -> Result<RawImage, CliErrors> {
    let header = match parse_header(data)? {
        Some(header) => header,
        None => return decode_with_zune_bmp(data)
    };
    let (width, height) = (header.width, header.height);
    let channels = header.bits_per_pixel / 8;
    let stride = row_stride(width, header.bits_per_pixel);

    trace!("BMP header: {header:?}");

    let rows = data[header.data_offset..]
        .chunks_exact(stride)
        .take(height);
    let mut pixels = Vec::with_capacity(width * height * channels);

    let mut push_row = |row: &[u8]| {
        let row = &row[..width * channels];
        match channels {
            1 => pixels.extend_from_slice(row),
            3 => {
                for pixel in row.chunks_exact(3) {
                    pixels.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                }
            }
            _ => {
                for pixel in row.chunks_exact(4) {
                    pixels.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
                }
            }
        }
    };
    if header.top_down {
        rows.for_each(&mut push_row);
    } else {
        rows.rev().for_each(&mut push_row);
    }
    let colorspace = match channels {
        1 => ColorSpace::Luma,
        3 => ColorSpace::RGB,
        _ => ColorSpace::RGBA
    };
    debug!("Decoded {width}x{height} {colorspace:?} BMP");

    RawImage::new(width, height, colorspace, pixels)
}

/// Decode the bitmap variants the reader above skips
///
/// `zune-bmp` hands out samples in file order, blue first, so they are
/// swapped into RGB order here.
fn decode_with_zune_bmp(data: &[u8]) -> Result<RawImage, CliErrors> {
    let mut decoder = BmpDecoder::new(data);

    decoder
        .decode_headers()
        .map_err(|e| CliErrors::BmpDecodeErrors(format!("{e:?}")))?;

    let (width, height) = decoder
        .get_dimensions()
        .ok_or_else(|| CliErrors::BmpDecodeErrors("no dimensions after headers".to_string()))?;
    let colorspace = decoder
        .get_colorspace()
        .ok_or_else(|| CliErrors::BmpDecodeErrors("no colorspace after headers".to_string()))?;

    if !matches!(
        colorspace,
        ColorSpace::Luma | ColorSpace::RGB | ColorSpace::RGBA
    ) {
        return Err(CliErrors::UnsupportedColorspace(format!("{colorspace:?}")));
    }
    for dimension in [width, height] {
        if dimension > MAX_BMP_DIMENSION {
            return Err(CliErrors::TooLargeDimensions(MAX_BMP_DIMENSION, dimension));
        }
    }
    let mut pixels = decoder
        .decode()
        .map_err(|e| CliErrors::BmpDecodeErrors(format!("{e:?}")))?;

    if colorspace != ColorSpace::Luma {
        for pixel in pixels.chunks_exact_mut(colorspace.num_components()) {
            pixel.swap(0, 2);
        }
    }
    debug!("Decoded {width}x{height} {colorspace:?} BMP through zune-bmp");

    RawImage::new(width, height, colorspace, pixels)
}

#[inline]
fn row_stride(width: usize, bits_per_pixel: usize) -> usize {
    (width * bits_per_pixel).div_ceil(32) * 4
}

pub fn encode_bmp(image: &RawImage) -> Result<Vec<u8>, CliErrors> {
    for dimension in [image.width, image.height] {
        if dimension > MAX_BMP_DIMENSION {
            return Err(CliErrors::TooLargeDimensions(MAX_BMP_DIMENSION, dimension));
        }
    }
    let channels = image.channels();
    let bits_per_pixel = channels * 8;
    let palette_size = if channels == 1 { 256 * 4 } else { 0 };

    let stride = row_stride(image.width, bits_per_pixel);
    let image_size = stride * image.height;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_size;
    let file_size = data_offset + image_size;

    trace!("BMP stride: {stride}, image size: {image_size}");

    // dimensions are capped well below these limits
    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| CliErrors::TooLargeDimensions(u32::MAX as usize, v))
    };

    let mut out = Vec::with_capacity(file_size);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&to_u32(file_size)?.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&to_u32(data_offset)?.to_le_bytes());

    // BITMAPINFOHEADER, a positive height means rows are stored bottom-up
    out.extend_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&to_u32(image.width)?.to_le_bytes());
    out.extend_from_slice(&to_u32(image.height)?.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&(bits_per_pixel as u16).to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&to_u32(image_size)?.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&(if channels == 1 { 256_u32 } else { 0 }).to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());

    if channels == 1 {
        for level in 0..=255_u8 {
            out.extend_from_slice(&[level, level, level, 0]);
        }
    }

    let row_bytes = image.width * channels;
    let padding = stride - row_bytes;

    for row in image.pixels.chunks_exact(row_bytes).rev() {
        match channels {
            1 => out.extend_from_slice(row),
            3 => {
                for pixel in row.chunks_exact(3) {
                    out.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                }
            }
            _ => {
                for pixel in row.chunks_exact(4) {
                    out.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
                }
            }
        }
        out.resize(out.len() + padding, 0);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use super::*;

    /// Hand-built uncompressed bitmap, `rows` already padded and in file order
    fn bitmap(width: i32, height: i32, bits_per_pixel: u16, rows: &[u8]) -> Vec<u8> {
        let offset = 54 + if bits_per_pixel == 8 { PALETTE_SIZE } else { 0 };

        let mut out = b"BM".to_vec();
        out.extend_from_slice(&((offset + rows.len()) as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        out.extend_from_slice(&40_u32.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1_u16.to_le_bytes());
        out.extend_from_slice(&bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&[0; 24]);

        if bits_per_pixel == 8 {
            for level in 0..=255_u8 {
                out.extend_from_slice(&[level, level, level, 0]);
            }
        }
        out.extend_from_slice(rows);
        out
    }

    #[test]
    fn strides_are_padded_to_four_bytes() {
        assert_eq!(row_stride(1, 24), 4);
        assert_eq!(row_stride(3, 24), 12);
        assert_eq!(row_stride(5, 8), 8);
        assert_eq!(row_stride(3, 32), 12);
    }

    #[test]
    fn gray_images_carry_a_palette() {
        let image = RawImage::new(3, 2, ColorSpace::Luma, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let bytes = encode_bmp(&image).unwrap();

        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(read_u32(&bytes, 10), 14 + 40 + 1024);
        assert_eq!(read_u32(&bytes, 2) as usize, bytes.len());
        assert_eq!(decode_bmp(&bytes).unwrap().pixels, [1, 2, 3, 4, 5, 6]);
        assert_eq!(bytes[28], 8);
        // palette entry 200 is gray 200
        assert_eq!(&bytes[54 + 200 * 4..54 + 201 * 4], &[200, 200, 200, 0]);

        // bottom row first, padded to four bytes
        assert_eq!(&bytes[1078..], &[4, 5, 6, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn rgba_is_stored_as_bgra() {
        let image = RawImage::new(1, 1, ColorSpace::RGBA, vec![10, 20, 30, 40]).unwrap();
        let bytes = encode_bmp(&image).unwrap();

        assert_eq!(bytes[28], 32);
        assert_eq!(&bytes[54..], &[30, 20, 10, 40]);
    }

    #[test]
    fn rgb_survives_a_round_trip() {
        let (width, height) = (7, 5);
        let mut pixels = vec![0_u8; width * height * 3];
        nanorand::WyRand::new_seed(42).fill(&mut pixels);

        let image = RawImage::new(width, height, ColorSpace::RGB, pixels.clone()).unwrap();
        let bytes = encode_bmp(&image).unwrap();

        let decoded = decode_bmp(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (width, height));
        assert_eq!(decoded.colorspace, ColorSpace::RGB);
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn single_pixels_come_out_as_rgb() {
        let bgr = bitmap(1, 1, 24, &[0x10, 0x20, 0x30, 0]);
        let image = decode_bmp(&bgr).unwrap();

        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.colorspace, ColorSpace::RGB);
        assert_eq!(image.pixels, [0x30, 0x20, 0x10]);

        let bgra = bitmap(1, 1, 32, &[0x10, 0x20, 0x30, 0x40]);
        let image = decode_bmp(&bgra).unwrap();

        assert_eq!(image.colorspace, ColorSpace::RGBA);
        assert_eq!(image.pixels, [0x30, 0x20, 0x10, 0x40]);
    }

    #[test]
    fn row_order_follows_the_height_sign() {
        // two rows of 2 BGR pixels, each padded to 8 bytes
        let rows = [1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12, 0, 0];

        let bottom_up = decode_bmp(&bitmap(2, 2, 24, &rows)).unwrap();
        assert_eq!(bottom_up.pixels, [9, 8, 7, 12, 11, 10, 3, 2, 1, 6, 5, 4]);

        let top_down = decode_bmp(&bitmap(2, -2, 24, &rows)).unwrap();
        assert_eq!(top_down.pixels, [3, 2, 1, 6, 5, 4, 9, 8, 7, 12, 11, 10]);
    }

    #[test]
    fn small_images_survive_a_round_trip() {
        for (colorspace, channels) in [
            (ColorSpace::Luma, 1),
            (ColorSpace::RGB, 3),
            (ColorSpace::RGBA, 4)
        ] {
            for (width, height) in [(1, 1), (2, 2), (3, 1)] {
                let mut pixels = vec![0_u8; width * height * channels];
                nanorand::WyRand::new_seed(width as u64).fill(&mut pixels);

                let image = RawImage::new(width, height, colorspace, pixels.clone()).unwrap();
                let decoded = decode_bmp(&encode_bmp(&image).unwrap()).unwrap();

                assert_eq!(decoded.colorspace, colorspace);
                assert_eq!(decoded.pixels, pixels, "{width}x{height} {colorspace:?}");
            }
        }
    }

    #[test]
    fn truncated_pixels_are_malformed() {
        let bytes = bitmap(2, 2, 24, &[0; 12]);
        assert_eq!(decode_bmp(&bytes).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn oversized_headers_are_refused() {
        let bytes = bitmap(MAX_BMP_DIMENSION as i32 + 1, 1, 24, &[]);
        assert_eq!(decode_bmp(&bytes).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn large_images_are_refused() {
        let image = RawImage::new(MAX_BMP_DIMENSION + 1, 1, ColorSpace::Luma, vec![
            0;
            MAX_BMP_DIMENSION + 1
        ])
        .unwrap();

        assert_eq!(encode_bmp(&image).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode_bmp(b"BM not really a bitmap").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
