//! Image codec collaborator.
//!
//! The core never decompresses pixels itself. It asks an [`ImageCodec`] for header metadata while
//! validating a sequence and for decoded rows when a frame is requested.

use std::path::Path;

use crate::foundation::error::SeqError;
use crate::format::negotiate::SourceHeader;
use crate::frame::buffer::DecodeBuffer;

/// Default codec backed by the `image` crate.
pub mod image_codec;
mod png_rows;

pub use image_codec::ImageCrateCodec;

/// Transforms the codec applies while decoding, so every file lands in one of the supported
/// layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeFlags {
    /// Drop the alpha channel of gray+alpha and RGBA images.
    pub strip_alpha: bool,
    /// Resolve indexed images through their palette into 8-bit RGB.
    pub expand_palette: bool,
    /// Widen 1/2/4-bit samples to one byte each, keeping their value (a 1-bit pixel becomes 0 or
    /// 1).
    pub pack_low_bit_depth: bool,
    /// Store 16-bit samples little-endian instead of the big-endian order images are stored in.
    pub swap_endian: bool,
}

impl NormalizeFlags {
    /// No transforms requested.
    pub const NONE: NormalizeFlags = NormalizeFlags {
        strip_alpha: false,
        expand_palette: false,
        pack_low_bit_depth: false,
        swap_endian: false,
    };

    /// Everything a sequence reader needs.
    pub const ALL: NormalizeFlags = NormalizeFlags {
        strip_alpha: true,
        expand_palette: true,
        pack_low_bit_depth: true,
        swap_endian: true,
    };
}

impl Default for NormalizeFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Failure reported by an [`ImageCodec`].
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// The file could not be opened or read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No known image signature at the start of the file.
    #[error("not an image")]
    NotAnImage,

    /// The file looked like an image but its header or data is invalid.
    #[error("malformed image: {0}")]
    Malformed(String),

    /// Staging memory for the raw decode could not be allocated.
    #[error("failed to allocate {bytes} bytes of decode scratch")]
    OutOfMemory {
        /// Requested scratch size.
        bytes: usize,
    },

    /// The decoded image does not fit the buffer it was asked to fill.
    #[error("decoded layout does not match buffer: {0}")]
    LayoutMismatch(String),
}

impl CodecError {
    /// Attach the file's position in the sequence, producing a construction-time error.
    pub fn into_open_error(self, index: usize, path: &Path) -> SeqError {
        match self {
            Self::Io(source) => SeqError::SourceUnreadable {
                index,
                path: path.to_path_buf(),
                source,
            },
            Self::NotAnImage => SeqError::NotAnImage {
                index,
                path: path.to_path_buf(),
            },
            other => SeqError::Other(anyhow::anyhow!(
                "file {index}: cannot read header of '{}': {other}",
                path.display()
            )),
        }
    }
}

/// Narrow decode interface consumed by the sequence validator and reader.
///
/// Implementations must be shareable across threads; the reader serializes `decode_into` calls
/// itself.
pub trait ImageCodec: Send + Sync {
    /// Read width, height, channel layout and bit depth without decoding pixel data.
    ///
    /// The returned header is not yet normalized.
    fn read_header(&self, path: &Path) -> Result<SourceHeader, CodecError>;

    /// Decode `path` into `buffer`, one decoded row per buffer row, applying `flags`.
    fn decode_into(
        &self,
        path: &Path,
        buffer: &mut DecodeBuffer,
        flags: NormalizeFlags,
    ) -> Result<(), CodecError>;
}

#[cfg(test)]
#[path = "../../tests/unit/codec/mod.rs"]
mod tests;
