/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Single channel planes and their header + delta coding
use crate::quantizer::DeltaCoding;

/// One channel of an image stored row major without padding
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Plane {
    pub width:  usize,
    pub height: usize,
    pub data:   Vec<u8>
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Plane {
        Plane {
            width,
            height,
            data: vec![0; width * height]
        }
    }

    #[cfg(test)]
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Plane {
        debug_assert_eq!(data.len(), width * height);
        Plane {
            width,
            height,
            data
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Swap rows and columns, so that scanning rows of the result
    /// scans columns of `self`
    pub fn transpose(&self) -> Plane {
        let mut out = Plane::new(self.height, self.width);

        for (y, row) in self.data.chunks_exact(self.width).enumerate() {
            for (x, value) in row.iter().enumerate() {
                out.data[x * self.height + y] = *value;
            }
        }
        out
    }

    /// Number of delta codes produced when coding this geometry
    #[inline]
    pub const fn delta_count(width: usize, height: usize) -> usize {
        height * (width - 1)
    }

    /// Code every row as a verbatim header followed by deltas against the
    /// running reconstructed predecessor
    ///
    /// Headers (one per row) are appended to `headers`, deltas (`width - 1`
    /// per row, row major) to `deltas`.
    pub fn encode_rows(&self, coding: DeltaCoding, headers: &mut Vec<u8>, deltas: &mut Vec<u8>) {
        for y in 0..self.height {
            let row = self.row(y);
            let mut predictor = row[0];

            headers.push(predictor);

            for actual in &row[1..] {
                let (stored, reconstructed) = coding.encode(predictor, *actual);
                deltas.push(stored);
                predictor = reconstructed;
            }
        }
    }

    /// Rebuild a plane from its row headers and deltas
    ///
    /// `headers` must hold at least `height` values and `deltas` at least
    /// `height * (width - 1)`.
    pub fn decode_rows(
        width: usize, height: usize, coding: DeltaCoding, headers: &[u8], deltas: &[u8]
    ) -> Plane {
        let mut plane = Plane::new(width, height);

        if width == 1 {
            plane.data.copy_from_slice(&headers[..height]);
            return plane;
        }
        let row_deltas = deltas.chunks_exact(width - 1);

        for ((y, header), codes) in headers[..height].iter().enumerate().zip(row_deltas) {
            let row = plane.row_mut(y);
            let mut predictor = *header;

            row[0] = predictor;

            for (out, code) in row[1..].iter_mut().zip(codes) {
                predictor = coding.decode(predictor, *code);
                *out = predictor;
            }
        }
        plane
    }
}
