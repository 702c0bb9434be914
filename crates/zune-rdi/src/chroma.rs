/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! 2x2 chroma subsampling and bilinear reconstruction
use crate::plane::Plane;

/// Dimensions of a plane after 2x2 subsampling
#[inline]
pub(crate) const fn subsampled_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(2), height.div_ceil(2))
}

/// Average every 2x2 block of `plane` into one sample
///
/// On odd widths or heights the last column or row is replicated, so every
/// block averages four samples.
pub(crate) fn downsample(plane: &Plane) -> Plane {
    let (width, height) = (plane.width, plane.height);
    let (out_width, out_height) = subsampled_dimensions(width, height);
    let mut out = Plane::new(out_width, out_height);

    for (sy, out_row) in out.data.chunks_exact_mut(out_width).enumerate() {
        let y0 = sy * 2;
        let y1 = (y0 + 1).min(height - 1);
        let (top, bottom) = (plane.row(y0), plane.row(y1));

        for (sx, value) in out_row.iter_mut().enumerate() {
            let x0 = sx * 2;
            let x1 = (x0 + 1).min(width - 1);

            let sum = u16::from(top[x0])
                + u16::from(top[x1])
                + u16::from(bottom[x0])
                + u16::from(bottom[x1]);

            *value = (sum / 4) as u8;
        }
    }
    out
}

/// Reconstruct a full resolution plane of `width` x `height` from a
/// subsampled one
///
/// Samples on even coordinates are copied, odd coordinates interpolate
/// between their neighbours, clamping at the last subsampled row and column.
pub(crate) fn upsample(plane: &Plane, width: usize, height: usize) -> Plane {
    let mut out = Plane::new(width, height);
    let (last_x, last_y) = (plane.width - 1, plane.height - 1);

    for (y, out_row) in out.data.chunks_exact_mut(width).enumerate() {
        let sy = y / 2;
        let sy1 = (sy + 1).min(last_y);
        let odd_y = y & 1 == 1;

        for (x, value) in out_row.iter_mut().enumerate() {
            let sx = x / 2;
            let sx1 = (sx + 1).min(last_x);
            let odd_x = x & 1 == 1;

            let q = u16::from(plane.get(sx, sy));

            *value = match (odd_x, odd_y) {
                (false, false) => q as u8,
                (true, false) => ((q + u16::from(plane.get(sx1, sy)) + 1) >> 1) as u8,
                (false, true) => ((q + u16::from(plane.get(sx, sy1)) + 1) >> 1) as u8,
                (true, true) => {
                    let sum = q
                        + u16::from(plane.get(sx1, sy))
                        + u16::from(plane.get(sx, sy1))
                        + u16::from(plane.get(sx1, sy1));
                    ((sum + 2) >> 2) as u8
                }
            };
        }
    }
    out
}
