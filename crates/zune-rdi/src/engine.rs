/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point of the root delta transform
use crate::buffer::PixelBuffer;
use crate::errors::RdiErrors;
use crate::modes::ModeTransform;
use crate::registry::{ModeRegistry, DEFAULT_MODE};

/// Largest width or height the engine accepts by default
pub const MAX_DIMENSION: usize = 1 << 17;

/// Largest `width * height * channels` the engine accepts by default
pub const MAX_PAYLOAD: usize = 1 << 30;

/// Hard limits checked before any transform work is done
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EngineLimits {
    pub max_dimension: usize,
    pub max_payload:   usize
}

impl Default for EngineLimits {
    fn default() -> Self {
        EngineLimits {
            max_dimension: MAX_DIMENSION,
            max_payload:   MAX_PAYLOAD
        }
    }
}

impl EngineLimits {
    /// Check image dimensions against the limits
    ///
    /// # Errors
    /// - [`RdiErrors::TooLargeDimensions`] if either side is above `max_dimension`
    /// - [`RdiErrors::TooLargePayload`] if the raw image is above `max_payload` bytes
    pub fn check(&self, width: usize, height: usize, channels: u8) -> Result<(), RdiErrors> {
        if width > self.max_dimension {
            return Err(RdiErrors::TooLargeDimensions(
                "width",
                self.max_dimension,
                width
            ));
        }
        if height > self.max_dimension {
            return Err(RdiErrors::TooLargeDimensions(
                "height",
                self.max_dimension,
                height
            ));
        }
        let size = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(usize::from(channels)))
            .ok_or(RdiErrors::TooLargePayload(self.max_payload, usize::MAX))?;

        if size > self.max_payload {
            return Err(RdiErrors::TooLargePayload(self.max_payload, size));
        }
        Ok(())
    }
}

/// Runs root delta transforms on whole in-memory images
///
/// The engine holds no mutable state, a single instance can be shared
/// between threads.
///
/// # Example
/// ```
/// use zune_rdi::{PixelBuffer, TransformEngine};
///
/// let pixels = PixelBuffer::new(2, 1, 3, vec![10, 10, 10, 12, 10, 10]).unwrap();
/// let engine = TransformEngine::new();
///
/// let encoded = engine.encode(&pixels, 1).unwrap();
/// let decoded = engine.decode(&encoded, 1).unwrap();
/// assert_eq!(decoded, pixels);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct TransformEngine {
    registry: &'static ModeRegistry,
    limits:   EngineLimits
}

impl Default for TransformEngine {
    fn default() -> Self {
        TransformEngine::new()
    }
}

impl TransformEngine {
    /// Create an engine with the default limits
    pub fn new() -> TransformEngine {
        TransformEngine::with_limits(EngineLimits::default())
    }

    /// Create an engine enforcing `limits`
    pub fn with_limits(limits: EngineLimits) -> TransformEngine {
        TransformEngine {
            registry: ModeRegistry::global(),
            limits
        }
    }

    pub const fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// The mode actually used when `mode` is requested
    pub const fn effective_mode(mode: u16) -> u16 {
        if mode == 0 {
            DEFAULT_MODE
        } else {
            mode
        }
    }

    /// Resolve `mode` (with `0` meaning the default) for `channels`
    ///
    /// # Errors
    /// See [`ModeRegistry::resolve`]
    pub fn resolve(&self, mode: u16, channels: u8) -> Result<&'static ModeTransform, RdiErrors> {
        self.registry
            .resolve(TransformEngine::effective_mode(mode), channels)
    }

    /// Exact encoded length of an image in `mode`
    ///
    /// # Errors
    /// Limit violations or an unresolvable mode
    pub fn compute_length(
        &self, mode: u16, width: usize, height: usize, channels: u8
    ) -> Result<usize, RdiErrors> {
        self.limits.check(width, height, channels)?;
        Ok(self.resolve(mode, channels)?.compute_length(width, height))
    }

    /// Encode a raw image with `mode`, `0` selecting the default mode
    ///
    /// The input is left untouched and a new buffer is returned.
    ///
    /// # Errors
    /// - ConstraintViolation kinds when the image exceeds the limits
    /// - VariantNotSupported kinds when the mode cannot be resolved for the
    ///   channel count
    pub fn encode(&self, buffer: &PixelBuffer, mode: u16) -> Result<PixelBuffer, RdiErrors> {
        self.limits
            .check(buffer.width(), buffer.height(), buffer.channels())?;

        self.resolve(mode, buffer.channels())?.encode(buffer)
    }

    /// Decode the output of [`encode`](Self::encode) for the same mode
    ///
    /// The buffer length is compared with the length the mode expects
    /// before any decoding is attempted.
    ///
    /// # Errors
    /// - [`RdiErrors::InsufficientData`] if the buffer is too short
    /// - the errors of [`encode`](Self::encode)
    pub fn decode(&self, buffer: &PixelBuffer, mode: u16) -> Result<PixelBuffer, RdiErrors> {
        let (width, height) = (buffer.width(), buffer.height());

        self.limits.check(width, height, buffer.channels())?;

        let transform = self.resolve(mode, buffer.channels())?;
        let expected = transform.compute_length(width, height);

        if buffer.byte_length() < expected {
            return Err(RdiErrors::InsufficientData(expected, buffer.byte_length()));
        }
        transform.decode(buffer)
    }
}
