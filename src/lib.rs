//! imgseq reads an ordered list of still images as one planar video stream.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: every file's header is read (no pixel data) and its width, height, output
//!    format and decoded row size must match the first file's.
//! 2. **Allocate**: one decode buffer sized to a single decoded image is created and reused.
//! 3. **Serve**: each frame request decodes its file into that buffer and repacks the interleaved
//!    pixels into the planar frame supplied by the host.
//!
//! Supported sources after normalization (alpha stripped, palettes expanded, sub-byte samples
//! widened) are 8/16-bit gray and 8/16-bit RGB, exposed as [`PixelFormat::Gray8`],
//! [`PixelFormat::Gray16`], [`PixelFormat::Rgb24`] and [`PixelFormat::Rgb48`].
//!
//! ```no_run
//! use imgseq::{FrameIndex, MemoryHost, SequenceOptions, SequenceReader};
//!
//! let opts = SequenceOptions::new(["f0.png", "f1.png"]).with_fps(25, 1)?;
//! let reader = SequenceReader::open(opts)?;
//! let mut host = MemoryHost::default();
//! reader.init(&mut host);
//! let frame = reader.get_frame(FrameIndex(0), &host)?;
//! assert_eq!(frame.props.duration_den, 25);
//! # Ok::<(), imgseq::SeqError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image codec collaborator.
pub mod codec;
/// Output pixel format negotiation.
pub mod format;
/// Decode buffer, output frames and repacking.
pub mod frame;
/// Host pipeline collaborator.
pub mod host;
/// Frame serving.
pub mod reader;
/// Sequence options, manifests and validation.
pub mod sequence;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;

pub use crate::codec::{CodecError, ImageCodec, ImageCrateCodec, NormalizeFlags};
pub use crate::format::negotiate::{ChannelLayout, PixelFormat, SourceHeader, resolve_format};
pub use crate::foundation::core::{Fps, FrameIndex, Geometry};
pub use crate::foundation::error::{SeqError, SeqResult};
pub use crate::frame::buffer::{DECODE_SLACK, DecodeBuffer};
pub use crate::frame::output::{FramePlane, FrameProps, OutputFrame};
pub use crate::frame::repack::Repacker;
pub use crate::host::{ActivationReason, FrameHost, MemoryHost, VideoInfo};
pub use crate::reader::SequenceReader;
pub use crate::sequence::manifest::Manifest;
pub use crate::sequence::options::SequenceOptions;
pub use crate::sequence::validate::{SourceSequence, validate};
