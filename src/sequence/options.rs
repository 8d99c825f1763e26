use std::path::PathBuf;

use crate::foundation::core::Fps;
use crate::foundation::error::{SeqError, SeqResult};

/// Construction parameters of a sequence: ordered source files and frame rate.
///
/// Files may repeat; their order is the frame order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceOptions {
    /// One image per output frame.
    pub files: Vec<PathBuf>,
    /// Frame rate, 24/1 unless overridden.
    pub fps: Fps,
}

impl SequenceOptions {
    /// Options for `files` at the default frame rate.
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            fps: Fps::default(),
        }
    }

    /// Override the frame rate.
    pub fn with_fps(mut self, num: u32, den: u32) -> SeqResult<Self> {
        self.fps = Fps::new(num, den)?;
        Ok(self)
    }

    /// Check the parameters before any file is touched.
    pub fn check(&self) -> SeqResult<()> {
        if self.files.is_empty() {
            return Err(SeqError::NoSourceFiles);
        }
        if let Some(index) = self.files.iter().position(|p| p.as_os_str().is_empty()) {
            return Err(SeqError::EmptyFileName { index });
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/options.rs"]
mod tests;
