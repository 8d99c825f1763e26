//! Host pipeline collaborator.
//!
//! A host declares the stream shape once, allocates every output frame, and pulls frames by
//! index. [`MemoryHost`] is a plain in-process host used by the CLI and tests.

use crate::foundation::core::{Fps, Geometry};
use crate::format::negotiate::PixelFormat;
use crate::frame::output::OutputFrame;

/// Stream shape declared to the host when a reader is initialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct VideoInfo {
    /// Output pixel format.
    pub format: PixelFormat,
    /// Frame size.
    pub geometry: Geometry,
    /// Number of frames, one per source file.
    pub frame_count: u64,
    /// Frame rate.
    pub fps: Fps,
}

/// Why the host is calling into a reader for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationReason {
    /// First call for this request; the frame should be produced now.
    Initial,
    /// Requested dependencies are available. A reader has none, so nothing happens.
    AllFramesReady,
    /// The host gave up on the request; no frame is produced.
    Abandoned,
}

/// Frame allocation and stream declaration provided by the host pipeline.
pub trait FrameHost: Send + Sync {
    /// Record the stream shape. Called once, before any frame is requested.
    fn set_video_info(&mut self, info: &VideoInfo);

    /// Allocate a frame for the reader to fill.
    fn new_video_frame(&self, format: PixelFormat, geometry: Geometry) -> OutputFrame;
}

/// In-memory host allocating frames with aligned plane strides.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    alignment: usize,
    info: Option<VideoInfo>,
}

impl MemoryHost {
    /// Default row alignment in bytes.
    pub const DEFAULT_ALIGNMENT: usize = 32;

    /// Host whose planes have rows aligned to `alignment` bytes.
    pub fn new(alignment: usize) -> Self {
        Self {
            alignment,
            info: None,
        }
    }

    /// Row alignment used for new frames.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Stream shape declared by the reader, if any.
    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.info.as_ref()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALIGNMENT)
    }
}

impl FrameHost for MemoryHost {
    fn set_video_info(&mut self, info: &VideoInfo) {
        self.info = Some(*info);
    }

    fn new_video_frame(&self, format: PixelFormat, geometry: Geometry) -> OutputFrame {
        OutputFrame::new(format, geometry, self.alignment)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/mod.rs"]
mod tests;
