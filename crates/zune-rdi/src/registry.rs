/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Resolution of mode numbers to transforms
use std::sync::OnceLock;

use crate::buffer::check_channels;
use crate::errors::RdiErrors;
use crate::modes::{Chroma, ColorModel, Layout, ModeTransform, Storage};

/// Mode used when the caller asks for mode `0`
pub const DEFAULT_MODE: u16 = 3;

/// Mode value that is never valid
pub const INVALID_MODE: u16 = 0xFFFF;

enum Definition {
    Deprecated,
    Active {
        layout:   Layout,
        color:    ColorModel,
        chroma:   Chroma,
        storage:  Storage,
        channels: &'static [u8]
    }
}

const fn active(
    layout: Layout, color: ColorModel, chroma: Chroma, storage: Storage, channels: &'static [u8]
) -> Definition {
    Definition::Active {
        layout,
        color,
        chroma,
        storage,
        channels
    }
}

const ALL: &[u8] = &[1, 3, 4];
const COLOR: &[u8] = &[3, 4];

#[rustfmt::skip]
static MODE_TABLE: [(u16, Definition); 10] = [
    (1,  active(Layout::Interleaved,    ColorModel::Direct, Chroma::Full,       Storage::Simple, ALL)),
    (2,  Definition::Deprecated),
    (3,  active(Layout::Planar,         ColorModel::Direct, Chroma::Full,       Storage::Simple, ALL)),
    (4,  active(Layout::Interleaved,    ColorModel::YCoCg,  Chroma::Full,       Storage::Simple, COLOR)),
    (5,  active(Layout::Planar,         ColorModel::YCoCg,  Chroma::Full,       Storage::Simple, ALL)),
    (6,  active(Layout::Planar,         ColorModel::YCoCg,  Chroma::Subsampled, Storage::Simple, COLOR)),
    (7,  active(Layout::AspectAdaptive, ColorModel::YCoCg,  Chroma::Full,       Storage::Simple, &[3])),
    (8,  active(Layout::Planar,         ColorModel::YCoCg,  Chroma::Full,       Storage::Packed, ALL)),
    (9,  active(Layout::Planar,         ColorModel::YCoCg,  Chroma::Subsampled, Storage::Packed, COLOR)),
    (10, active(Layout::AspectAdaptive, ColorModel::YCoCg,  Chroma::Full,       Storage::Packed, COLOR)),
];

static REGISTRY: OnceLock<ModeRegistry> = OnceLock::new();

/// Table of every valid `(mode, channels)` pair
///
/// The table is built once and never changes, so a resolved
/// transform can be shared freely between threads.
#[derive(Debug)]
pub struct ModeRegistry {
    transforms: Vec<ModeTransform>
}

impl ModeRegistry {
    /// The process wide registry
    pub fn global() -> &'static ModeRegistry {
        REGISTRY.get_or_init(ModeRegistry::build)
    }

    fn build() -> ModeRegistry {
        let mut transforms = Vec::new();

        for (mode, definition) in &MODE_TABLE {
            if let Definition::Active {
                layout,
                color,
                chroma,
                storage,
                channels
            } = definition
            {
                for c in channels.iter() {
                    transforms.push(ModeTransform::new(
                        *mode, *c, *layout, *color, *chroma, *storage
                    ));
                }
            }
        }
        ModeRegistry { transforms }
    }

    /// Find the transform for `mode` on images with `channels` channels
    ///
    /// Repeated calls with the same arguments return the same instance.
    ///
    /// # Errors
    /// - [`RdiErrors::InvalidMode`] for `0xFFFF` and the reserved `0`
    /// - [`RdiErrors::UnknownChannels`] for channel counts other than 1, 3 and 4
    /// - [`RdiErrors::UnknownMode`] for unassigned values
    /// - [`RdiErrors::DeprecatedMode`] for retired values
    /// - [`RdiErrors::UnsupportedChannels`] if the mode cannot handle `channels`
    pub fn resolve(&self, mode: u16, channels: u8) -> Result<&ModeTransform, RdiErrors> {
        if mode == INVALID_MODE || mode == 0 {
            return Err(RdiErrors::InvalidMode(mode));
        }
        check_channels(channels)?;

        let (_, definition) = MODE_TABLE
            .iter()
            .find(|(m, _)| *m == mode)
            .ok_or(RdiErrors::UnknownMode(mode))?;

        if let Definition::Deprecated = definition {
            return Err(RdiErrors::DeprecatedMode(mode));
        }
        self.transforms
            .iter()
            .find(|t| t.mode() == mode && t.channels() == channels)
            .ok_or(RdiErrors::UnsupportedChannels(mode, channels))
    }

    /// Every valid transform, ordered by mode then channel count
    pub fn transforms(&self) -> &[ModeTransform] {
        &self.transforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn invalid_mode_is_rejected_for_all_channels() {
        for channels in 0..=8 {
            let err = ModeRegistry::global().resolve(INVALID_MODE, channels).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::VariantNotSupported);
        }
    }

    #[test]
    fn rejections() {
        let registry = ModeRegistry::global();

        assert!(matches!(registry.resolve(0, 3), Err(RdiErrors::InvalidMode(0))));
        assert!(matches!(registry.resolve(2, 3), Err(RdiErrors::DeprecatedMode(2))));
        assert!(matches!(registry.resolve(11, 3), Err(RdiErrors::UnknownMode(11))));
        assert!(matches!(registry.resolve(1, 2), Err(RdiErrors::UnknownChannels(2))));
        assert!(matches!(registry.resolve(7, 4), Err(RdiErrors::UnsupportedChannels(7, 4))));
        assert!(matches!(registry.resolve(7, 1), Err(RdiErrors::UnsupportedChannels(7, 1))));
        assert!(matches!(registry.resolve(6, 1), Err(RdiErrors::UnsupportedChannels(6, 1))));
    }

    #[test]
    fn resolutions_are_shared() {
        let first = ModeRegistry::global().resolve(9, 4).unwrap();
        let second = ModeRegistry::global().resolve(9, 4).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!((first.mode(), first.channels()), (9, 4));
        assert_eq!(first.storage(), Storage::Packed);
        assert_eq!(first.chroma(), Chroma::Subsampled);
    }

    #[test]
    fn table_size() {
        // 1, 3, 5 and 8 take all three channel counts, 4, 6, 9, 10 take two, 7 one
        assert_eq!(ModeRegistry::global().transforms().len(), 4 * 3 + 4 * 2 + 1);
    }
}
