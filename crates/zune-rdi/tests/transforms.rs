/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use nanorand::Rng;
use zune_rdi::{
    Chroma, ColorModel, ErrorKind, ModeRegistry, PixelBuffer, RdiErrors, TransformEngine,
    INVALID_MODE
};

const SIZES: [usize; 5] = [1, 2, 3, 17, 256];

fn random_image(width: usize, height: usize, channels: u8, seed: u64) -> PixelBuffer {
    let mut pixels = vec![0_u8; width * height * usize::from(channels)];
    nanorand::WyRand::new_seed(seed).fill(&mut pixels);

    PixelBuffer::new(width, height, channels, pixels).unwrap()
}

/// Every channel changes by at most one between neighbours, in both directions
fn smooth_image(width: usize, height: usize, channels: u8) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height * usize::from(channels));

    for y in 0..height {
        for x in 0..width {
            let sample = [
                (x / 2 + 40) as u8,
                (y / 2 + 60) as u8,
                ((x + y) / 4 + 90) as u8,
                (200 - x / 3) as u8
            ];
            pixels.extend_from_slice(&sample[..usize::from(channels)]);
        }
    }
    PixelBuffer::new(width, height, channels, pixels).unwrap()
}

fn max_error(a: &PixelBuffer, b: &PixelBuffer) -> u8 {
    a.data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

#[test]
fn simplest_row_delta_scenario() {
    #[rustfmt::skip]
    let pixels = vec![
        10, 10, 10,   12, 10, 10,
        10, 12, 10,   10, 10, 12,
    ];
    let buffer = PixelBuffer::new(2, 2, 3, pixels).unwrap();
    let engine = TransformEngine::new();

    let encoded = engine.encode(&buffer, 1).unwrap();
    assert_eq!(encoded.byte_length(), 2 * 2 * 3);

    let decoded = engine.decode(&encoded, 1).unwrap();
    assert_eq!(decoded, buffer);
}

#[test]
fn lossless_modes_round_trip() {
    let engine = TransformEngine::new();

    for mode in [1, 3] {
        for channels in [1, 3, 4] {
            for (width, height) in [(1, 1), (5, 1), (1, 5), (17, 9), (255, 257)] {
                let image = random_image(width, height, channels, (width * height) as u64);

                let encoded = engine.encode(&image, mode).unwrap();
                let decoded = engine.decode(&encoded, mode).unwrap();

                assert_eq!(
                    decoded, image,
                    "mode {mode}, {channels} channels, {width}x{height}"
                );
            }
        }
    }
}

#[test]
fn padded_rows_are_ignored() {
    let engine = TransformEngine::new();
    let (width, height, stride) = (3, 2, 12);

    let mut padded = vec![0xAA_u8; stride * height];
    let mut packed = Vec::new();

    for y in 0..height {
        for x in 0..width * 3 {
            let value = (y * 31 + x * 7) as u8;
            padded[y * stride + x] = value;
            packed.push(value);
        }
    }
    let padded = PixelBuffer::with_stride(width, height, stride, 3, padded).unwrap();
    let packed = PixelBuffer::new(width, height, 3, packed).unwrap();

    for mode in [1, 3, 5, 9] {
        let a = engine.encode(&padded, mode).unwrap();
        let b = engine.encode(&packed, mode).unwrap();
        assert_eq!(a, b, "mode {mode}");
    }
    let decoded = engine.decode(&engine.encode(&padded, 3).unwrap(), 3).unwrap();
    assert_eq!(decoded, packed);
    assert_eq!(decoded.stride(), width * 3);
}

#[test]
fn computed_length_matches_encoded_length() {
    let engine = TransformEngine::new();

    for transform in ModeRegistry::global().transforms() {
        let channels = transform.channels();

        for width in SIZES {
            for height in SIZES {
                let image = random_image(width, height, channels, 99);
                let encoded = transform.encode(&image).unwrap();

                assert_eq!(
                    encoded.byte_length(),
                    transform.compute_length(width, height),
                    "mode {}, {channels} channels, {width}x{height}",
                    transform.mode()
                );
                assert_eq!(
                    engine
                        .compute_length(transform.mode(), width, height, channels)
                        .unwrap(),
                    encoded.byte_length()
                );
            }
        }
    }
}

#[test]
fn every_mode_decodes_what_it_encodes() {
    for transform in ModeRegistry::global().transforms() {
        for (width, height) in [(1, 1), (2, 3), (3, 2), (17, 4), (4, 17)] {
            let image = random_image(width, height, transform.channels(), 3);
            let encoded = transform.encode(&image).unwrap();
            let decoded = transform.decode(&encoded).unwrap();

            assert_eq!(decoded.width(), width);
            assert_eq!(decoded.height(), height);
            assert_eq!(decoded.channels(), transform.channels());
            assert_eq!(decoded.byte_length(), image.byte_length());

            if transform.is_lossless() {
                assert_eq!(decoded, image);
            }
        }
    }
}

#[test]
fn invalid_mode_is_rejected() {
    let engine = TransformEngine::new();

    for channels in [1, 3, 4] {
        let image = random_image(4, 4, channels, 1);

        let err = engine.encode(&image, INVALID_MODE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VariantNotSupported);

        let err = engine.decode(&image, INVALID_MODE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VariantNotSupported);

        let err = engine.encode(&image, 2).unwrap_err();
        assert!(matches!(err, RdiErrors::DeprecatedMode(2)));
    }
}

#[test]
fn one_byte_short_is_malformed() {
    let engine = TransformEngine::new();

    for transform in ModeRegistry::global().transforms() {
        let image = random_image(17, 3, transform.channels(), 5);
        let mut data = transform.encode(&image).unwrap().into_data();
        let expected = data.len();

        data.pop();

        let short = PixelBuffer::encoded(17, 3, transform.channels(), data).unwrap();
        let err = engine.decode(&short, transform.mode()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(matches!(err, RdiErrors::InsufficientData(e, _) if e == expected));
    }
}

#[test]
fn longer_input_is_accepted() {
    let engine = TransformEngine::new();
    let image = random_image(9, 9, 3, 11);

    let mut data = engine.encode(&image, 8).unwrap().into_data();
    let reference = engine
        .decode(&PixelBuffer::encoded(9, 9, 3, data.clone()).unwrap(), 8)
        .unwrap();

    data.extend_from_slice(&[0xFF; 16]);
    let padded = PixelBuffer::encoded(9, 9, 3, data).unwrap();

    assert_eq!(engine.decode(&padded, 8).unwrap(), reference);
}

#[test]
fn gray_lossy_modes_are_bounded() {
    let engine = TransformEngine::new();

    for mode in [5, 8] {
        let image = random_image(64, 33, 1, 17);
        let decoded = engine.decode(&engine.encode(&image, mode).unwrap(), mode).unwrap();

        assert!(max_error(&image, &decoded) <= 32, "mode {mode}");
    }
}

#[test]
fn full_chroma_modes_are_bounded_on_noise() {
    for transform in ModeRegistry::global().transforms() {
        if transform.is_lossless()
            || transform.chroma() == Chroma::Subsampled
            || transform.channels() == 1
        {
            continue;
        }
        let channels = usize::from(transform.channels());
        let image = random_image(40, 23, transform.channels(), 23);
        let decoded = transform.decode(&transform.encode(&image).unwrap()).unwrap();

        for (a, b) in image
            .data()
            .chunks_exact(channels)
            .zip(decoded.data().chunks_exact(channels))
        {
            for c in 0..3 {
                // three planes of at most 32 each plus colour rounding
                assert!(a[c].abs_diff(b[c]) <= 99, "mode {}", transform.mode());
            }
            if channels == 4 {
                assert!(a[3].abs_diff(b[3]) <= 32, "mode {}", transform.mode());
            }
        }
    }
}

#[test]
fn smooth_images_stay_close() {
    for transform in ModeRegistry::global().transforms() {
        if transform.color_model() != ColorModel::YCoCg {
            continue;
        }
        for (width, height) in [(64, 48), (48, 64), (31, 17)] {
            let image = smooth_image(width, height, transform.channels());
            let decoded = transform.decode(&transform.encode(&image).unwrap()).unwrap();

            // 32 for a quantizer step plus 1 for colour rounding. Chroma
            // reconstructed from 2x2 averages can also miss by the few levels
            // the source drifts across a block and its interpolation window.
            let bound = match transform.chroma() {
                Chroma::Full => 33,
                Chroma::Subsampled => 40
            };
            let error = max_error(&image, &decoded);

            assert!(
                error <= bound,
                "mode {}, {} channels, {width}x{height}: error {error}",
                transform.mode(),
                transform.channels()
            );
        }
    }
}

#[test]
fn aspect_adaptive_modes_handle_both_orientations() {
    let engine = TransformEngine::new();

    for mode in [7, 10] {
        let wide = smooth_image(50, 10, 3);
        let tall = smooth_image(10, 50, 3);

        let wide_encoded = engine.encode(&wide, mode).unwrap();
        let tall_encoded = engine.encode(&tall, mode).unwrap();

        // both are scanned along the long side, so the layouts have the same size
        assert_eq!(wide_encoded.byte_length(), tall_encoded.byte_length());

        assert!(max_error(&wide, &engine.decode(&wide_encoded, mode).unwrap()) <= 33);
        assert!(max_error(&tall, &engine.decode(&tall_encoded, mode).unwrap()) <= 33);
    }
}

#[test]
fn engine_is_shareable_between_threads() {
    let engine = TransformEngine::new();

    std::thread::scope(|scope| {
        for mode in [1_u16, 3, 5, 6, 8, 9] {
            scope.spawn(move || {
                let image = random_image(21, 13, 3, u64::from(mode));
                let encoded = engine.encode(&image, mode).unwrap();
                let decoded = engine.decode(&encoded, mode).unwrap();
                assert_eq!(decoded.byte_length(), image.byte_length());
            });
        }
    });
}
