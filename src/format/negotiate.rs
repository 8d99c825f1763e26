//! Mapping from decoded image headers to the output pixel formats a stream can carry.

use std::path::Path;

use crate::codec::NormalizeFlags;
use crate::foundation::core::Geometry;
use crate::foundation::error::{SeqError, SeqResult};
use crate::frame::repack::Repacker;

/// Channel layout reported by an image header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray,
    /// Luminance + alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Indexed color resolved through a palette.
    Palette,
}

impl ChannelLayout {
    /// Number of samples per pixel as stored in a decoded buffer.
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray | Self::Palette => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether this layout includes an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }

    const fn without_alpha(self) -> Self {
        match self {
            Self::GrayAlpha => Self::Gray,
            Self::Rgba => Self::Rgb,
            other => other,
        }
    }
}

/// Header metadata of one source image, as read without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceHeader {
    /// Frame size.
    pub geometry: Geometry,
    /// Channel layout.
    pub layout: ChannelLayout,
    /// Bits per sample (1, 2, 4, 8, 16 or 32).
    pub bit_depth: u8,
}

impl SourceHeader {
    /// Apply the codec's normalizing transforms to the header fields.
    ///
    /// Mirrors what the codec does to pixel data during `decode_into` with the same flags, so the
    /// result describes the decode buffer layout.
    pub fn normalized(self, flags: NormalizeFlags) -> SourceHeader {
        let mut out = self;
        if flags.strip_alpha {
            out.layout = out.layout.without_alpha();
        }
        if flags.expand_palette && out.layout == ChannelLayout::Palette {
            out.layout = ChannelLayout::Rgb;
            out.bit_depth = 8;
        }
        if flags.pack_low_bit_depth && out.bit_depth < 8 {
            out.bit_depth = 8;
        }
        out
    }

    /// Bytes per decoded row before repacking.
    pub fn row_size(&self) -> usize {
        let bits = self.geometry.width as usize * self.layout.channels() * self.bit_depth as usize;
        bits.div_ceil(8)
    }
}

/// Output pixel formats a sequence can be exposed as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// One plane of 8-bit luma.
    Gray8,
    /// One plane of 16-bit luma.
    Gray16,
    /// Three 8-bit planes repacked from interleaved RGB triplets.
    Rgb24,
    /// Three 16-bit planes de-interleaved from RGB sample triplets.
    Rgb48,
}

const SUPPORTED: [(ChannelLayout, u8, PixelFormat); 4] = [
    (ChannelLayout::Gray, 8, PixelFormat::Gray8),
    (ChannelLayout::Gray, 16, PixelFormat::Gray16),
    (ChannelLayout::Rgb, 8, PixelFormat::Rgb24),
    (ChannelLayout::Rgb, 16, PixelFormat::Rgb48),
];

impl PixelFormat {
    /// Look up the output format for a normalized layout/depth pair.
    pub fn from_layout(layout: ChannelLayout, bit_depth: u8) -> Option<PixelFormat> {
        SUPPORTED
            .iter()
            .find(|(l, d, _)| *l == layout && *d == bit_depth)
            .map(|(_, _, f)| *f)
    }

    /// Number of planes in the output frame.
    pub const fn plane_count(self) -> usize {
        match self {
            Self::Gray8 | Self::Gray16 => 1,
            Self::Rgb24 | Self::Rgb48 => 3,
        }
    }

    /// Bits per sample in every plane.
    pub const fn bits_per_sample(self) -> u8 {
        match self {
            Self::Gray8 | Self::Rgb24 => 8,
            Self::Gray16 | Self::Rgb48 => 16,
        }
    }

    /// Bytes per sample in every plane.
    pub const fn bytes_per_sample(self) -> usize {
        self.bits_per_sample() as usize / 8
    }

    /// Interleaved channels per pixel expected in the decoded source.
    pub const fn source_channels(self) -> usize {
        match self {
            Self::Gray8 | Self::Gray16 => 1,
            Self::Rgb24 | Self::Rgb48 => 3,
        }
    }

    /// Tightly packed source row size for a frame `width` pixels wide.
    pub const fn source_row_size(self, width: u32) -> usize {
        width as usize * self.source_channels() * self.bytes_per_sample()
    }

    /// Repack routine bound to this format.
    pub const fn repacker(self) -> Repacker {
        match self {
            Self::Gray8 | Self::Gray16 => Repacker::Gray,
            Self::Rgb24 => Repacker::Rgb24Packed,
            Self::Rgb48 => Repacker::Rgb48Planar,
        }
    }
}

/// Resolve the output format for file `index`, failing with [`SeqError::UnsupportedFormat`].
///
/// `header` must already be normalized.
pub fn resolve_format(index: usize, path: &Path, header: &SourceHeader) -> SeqResult<PixelFormat> {
    PixelFormat::from_layout(header.layout, header.bit_depth).ok_or_else(|| {
        SeqError::UnsupportedFormat {
            index,
            path: path.to_path_buf(),
            layout: header.layout,
            bit_depth: header.bit_depth,
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/format/negotiate.rs"]
mod tests;
