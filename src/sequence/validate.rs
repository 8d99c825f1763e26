use std::path::{Path, PathBuf};

use crate::codec::{ImageCodec, NormalizeFlags};
use crate::foundation::core::{Fps, Geometry};
use crate::foundation::error::{SeqError, SeqResult};
use crate::format::negotiate::{PixelFormat, resolve_format};
use crate::frame::repack::Repacker;
use crate::sequence::options::SequenceOptions;

/// A sequence whose every file has been checked against the first one.
///
/// Immutable once built; safe to share between threads without locking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSequence {
    files: Vec<PathBuf>,
    fps: Fps,
    geometry: Geometry,
    format: PixelFormat,
    row_size: usize,
    flags: NormalizeFlags,
}

impl SourceSequence {
    /// Source files in frame order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of frames, one per file.
    pub fn frame_count(&self) -> u64 {
        self.files.len() as u64
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Canonical frame size.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Canonical output format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Canonical decoded row size in bytes.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Transforms requested from the codec for every file.
    pub fn normalize_flags(&self) -> NormalizeFlags {
        self.flags
    }

    /// Repack routine for this sequence's format.
    pub fn repacker(&self) -> Repacker {
        self.format.repacker()
    }
}

#[derive(Clone, Copy, Debug)]
struct Canonical {
    geometry: Geometry,
    format: PixelFormat,
    row_size: usize,
}

impl Canonical {
    fn check(&self, index: usize, other: &Canonical) -> SeqResult<()> {
        if other.geometry != self.geometry {
            return Err(SeqError::ResolutionMismatch {
                index,
                expected: self.geometry,
                found: other.geometry,
            });
        }
        if other.format != self.format {
            return Err(SeqError::FormatMismatch {
                index,
                expected: self.format,
                found: other.format,
            });
        }
        if other.row_size != self.row_size {
            return Err(SeqError::RowSizeMismatch {
                index,
                expected: self.row_size,
                found: other.row_size,
            });
        }
        Ok(())
    }
}

fn inspect<C>(codec: &C, index: usize, path: &Path, flags: NormalizeFlags) -> SeqResult<Canonical>
where
    C: ImageCodec + ?Sized,
{
    let header = codec
        .read_header(path)
        .map_err(|e| e.into_open_error(index, path))?
        .normalized(flags);
    let format = resolve_format(index, path, &header)?;
    Ok(Canonical {
        geometry: header.geometry,
        format,
        row_size: header.row_size(),
    })
}

/// Read the header of every file and require geometry, format and row size to match file 0.
///
/// Only headers are read. Fails fast on the first offending file.
#[tracing::instrument(skip_all, fields(files = opts.files.len()))]
pub fn validate<C>(opts: SequenceOptions, codec: &C) -> SeqResult<SourceSequence>
where
    C: ImageCodec + ?Sized,
{
    opts.check()?;
    let flags = NormalizeFlags::default();

    let first = inspect(codec, 0, &opts.files[0], flags)?;
    tracing::debug!(
        index = 0,
        path = %opts.files[0].display(),
        geometry = %first.geometry,
        format = ?first.format,
        row_size = first.row_size,
        "canonical source"
    );

    for (index, path) in opts.files.iter().enumerate().skip(1) {
        let props = inspect(codec, index, path, flags)?;
        first.check(index, &props)?;
        tracing::debug!(index, path = %path.display(), "validated source");
    }

    Ok(SourceSequence {
        files: opts.files,
        fps: opts.fps,
        geometry: first.geometry,
        format: first.format,
        row_size: first.row_size,
        flags,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/validate.rs"]
mod tests;
