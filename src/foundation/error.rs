use std::path::PathBuf;

use crate::foundation::core::Geometry;
use crate::format::negotiate::{ChannelLayout, PixelFormat};

/// Convenience result type used across imgseq.
pub type SeqResult<T> = Result<T, SeqError>;

/// Error taxonomy for opening a sequence and producing frames from it.
///
/// Every variant except [`SeqError::DecodeFailed`] aborts stream construction. Per-file variants
/// carry the zero-based index of the offending file.
#[derive(thiserror::Error, Debug)]
pub enum SeqError {
    /// The file list was empty.
    #[error("no source file")]
    NoSourceFiles,

    /// A file list entry was an empty path.
    #[error("file {index}: zero length file name was found")]
    EmptyFileName {
        /// Position in the file list.
        index: usize,
    },

    /// Invalid construction parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sequence manifest could not be parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// The file could not be opened or read.
    #[error("file {index}: failed to open source file '{}': {source}", path.display())]
    SourceUnreadable {
        /// Position in the file list.
        index: usize,
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with a recognised image signature.
    #[error("file {index}: '{}' is not an image", path.display())]
    NotAnImage {
        /// Position in the file list.
        index: usize,
        /// Offending path.
        path: PathBuf,
    },

    /// The normalized channel layout and bit depth have no output format.
    #[error(
        "file {index}: unsupported color type {layout:?} at {bit_depth} bits in '{}'",
        path.display()
    )]
    UnsupportedFormat {
        /// Position in the file list.
        index: usize,
        /// Offending path.
        path: PathBuf,
        /// Channel layout after normalization.
        layout: ChannelLayout,
        /// Bits per sample after normalization.
        bit_depth: u8,
    },

    /// A file's resolution differs from the first file's.
    #[error(
        "file {index}: found a file which has different resolution from the first one ({found}, expected {expected})"
    )]
    ResolutionMismatch {
        /// Position in the file list.
        index: usize,
        /// Canonical geometry.
        expected: Geometry,
        /// Geometry of the offending file.
        found: Geometry,
    },

    /// A file's output format differs from the first file's.
    #[error(
        "file {index}: found a file which color does not match the first one ({found:?}, expected {expected:?})"
    )]
    FormatMismatch {
        /// Position in the file list.
        index: usize,
        /// Canonical output format.
        expected: PixelFormat,
        /// Output format of the offending file.
        found: PixelFormat,
    },

    /// A file's decoded row size differs from the first file's.
    #[error(
        "file {index}: found a file which row size does not match the first one ({found}, expected {expected})"
    )]
    RowSizeMismatch {
        /// Position in the file list.
        index: usize,
        /// Canonical row size in bytes.
        expected: usize,
        /// Row size of the offending file in bytes.
        found: usize,
    },

    /// The decode buffer could not be allocated.
    #[error("failed to allocate decode buffer of {bytes} bytes")]
    OutOfMemory {
        /// Requested allocation size.
        bytes: usize,
    },

    /// Decoding a frame failed; only the current request is affected.
    #[error("file {index}: failed to decode '{}': {reason}", path.display())]
    DecodeFailed {
        /// Position in the file list.
        index: usize,
        /// Path that failed to decode.
        path: PathBuf,
        /// Codec-provided description.
        reason: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeqError {
    /// Build a [`SeqError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SeqError::Manifest`] value.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }

    /// Build a [`SeqError::DecodeFailed`] value.
    pub fn decode_failed(index: usize, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DecodeFailed {
            index,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts stream construction rather than a single frame request.
    pub fn is_construction(&self) -> bool {
        !matches!(self, Self::DecodeFailed { .. })
    }

    /// Index of the offending file, for per-file errors.
    pub fn file_index(&self) -> Option<usize> {
        match self {
            Self::EmptyFileName { index }
            | Self::SourceUnreadable { index, .. }
            | Self::NotAnImage { index, .. }
            | Self::UnsupportedFormat { index, .. }
            | Self::ResolutionMismatch { index, .. }
            | Self::FormatMismatch { index, .. }
            | Self::RowSizeMismatch { index, .. }
            | Self::DecodeFailed { index, .. } => Some(*index),
            Self::NoSourceFiles
            | Self::Validation(_)
            | Self::Manifest(_)
            | Self::OutOfMemory { .. }
            | Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
