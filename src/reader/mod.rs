//! Sequence reader: serves frames of a validated sequence to a host.
//!
//! Construction walks `SequenceOptions` (unopened) through [`validate`] (validated) to
//! [`SequenceReader`] (ready, decode buffer allocated). Only a ready reader produces frames, and
//! any construction failure leaves nothing behind.

use std::sync::{Mutex, PoisonError};

use crate::codec::{ImageCodec, ImageCrateCodec};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SeqError, SeqResult};
use crate::frame::buffer::DecodeBuffer;
use crate::frame::output::{FrameProps, OutputFrame};
use crate::host::{ActivationReason, FrameHost, VideoInfo};
use crate::sequence::options::SequenceOptions;
use crate::sequence::validate::{SourceSequence, validate};

/// A ready-to-serve image sequence.
///
/// Frame requests may come from several threads; decoding and repacking share one buffer, so they
/// run one at a time under an internal lock. Decoded frames are not cached: every request decodes
/// its file again.
#[derive(Debug)]
pub struct SequenceReader<C = ImageCrateCodec> {
    sequence: SourceSequence,
    codec: C,
    buffer: Mutex<DecodeBuffer>,
}

impl SequenceReader<ImageCrateCodec> {
    /// Validate `opts` with the `image`-crate codec and allocate the decode buffer.
    pub fn open(opts: SequenceOptions) -> SeqResult<Self> {
        Self::open_with_codec(opts, ImageCrateCodec::new())
    }
}

impl<C: ImageCodec> SequenceReader<C> {
    /// Validate `opts` with `codec` and allocate the decode buffer.
    #[tracing::instrument(skip_all, fields(files = opts.files.len()))]
    pub fn open_with_codec(opts: SequenceOptions, codec: C) -> SeqResult<Self> {
        let sequence = validate(opts, &codec)?;
        Self::from_sequence(sequence, codec)
    }

    /// Allocate the decode buffer for an already validated sequence.
    pub fn from_sequence(sequence: SourceSequence, codec: C) -> SeqResult<Self> {
        let height = sequence.geometry().height as usize;
        let buffer = DecodeBuffer::allocate(sequence.row_size(), height)?;
        tracing::info!(
            frames = sequence.frame_count(),
            geometry = %sequence.geometry(),
            format = ?sequence.format(),
            fps_num = sequence.fps().num,
            fps_den = sequence.fps().den,
            "image sequence ready"
        );
        Ok(Self {
            sequence,
            codec,
            buffer: Mutex::new(buffer),
        })
    }

    /// The validated sequence metadata.
    pub fn sequence(&self) -> &SourceSequence {
        &self.sequence
    }

    /// Number of frames.
    pub fn frame_count(&self) -> u64 {
        self.sequence.frame_count()
    }

    /// Stream shape as declared to hosts.
    pub fn video_info(&self) -> VideoInfo {
        VideoInfo {
            format: self.sequence.format(),
            geometry: self.sequence.geometry(),
            frame_count: self.sequence.frame_count(),
            fps: self.sequence.fps(),
        }
    }

    /// Declare the stream shape to `host`.
    pub fn init(&self, host: &mut dyn FrameHost) {
        host.set_video_info(&self.video_info());
    }

    /// Decode and repack frame `n` into a frame allocated by `host`.
    ///
    /// Indices past the end return the last frame. A decode failure affects only this request.
    pub fn get_frame(&self, n: FrameIndex, host: &dyn FrameHost) -> SeqResult<OutputFrame> {
        let index = n.clamp_to(self.frame_count()).0 as usize;
        let path = &self.sequence.files()[index];
        tracing::trace!(requested = n.0, index, "frame request");

        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self
            .codec
            .decode_into(path, &mut buffer, self.sequence.normalize_flags())
        {
            tracing::warn!(index, path = %path.display(), error = %e, "decode failed");
            return Err(SeqError::decode_failed(index, path, e));
        }

        let mut frame = host.new_video_frame(self.sequence.format(), self.sequence.geometry());
        frame.props = FrameProps::from_fps(self.sequence.fps());
        self.sequence.repacker().repack(&buffer, &mut frame);
        Ok(frame)
    }

    /// Entry point for a host's pull-based request protocol.
    ///
    /// Only [`ActivationReason::Initial`] produces a frame; every other activation returns
    /// `Ok(None)` without touching the decode buffer.
    pub fn request_frame(
        &self,
        n: FrameIndex,
        reason: ActivationReason,
        host: &dyn FrameHost,
    ) -> SeqResult<Option<OutputFrame>> {
        match reason {
            ActivationReason::Initial => self.get_frame(n, host).map(Some),
            ActivationReason::AllFramesReady | ActivationReason::Abandoned => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/mod.rs"]
mod tests;
