use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{SeqError, SeqResult};
use crate::sequence::options::SequenceOptions;

/// JSON description of a sequence.
///
/// ```json
/// { "files": ["frames/0001.png", "frames/0002.png"], "fps": { "num": 30000, "den": 1001 } }
/// ```
///
/// Relative entries are resolved against the manifest's directory.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Source images in frame order.
    pub files: Vec<PathBuf>,
    /// Frame rate; 24/1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<Fps>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json_str(s: &str) -> SeqResult<Self> {
        serde_json::from_str(s).map_err(|e| SeqError::manifest(e.to_string()))
    }

    /// Read a manifest file and turn it into options with paths resolved against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> SeqResult<SequenceOptions> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        let manifest = Self::from_json_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.into_options(base)
    }

    /// Convert into [`SequenceOptions`], joining relative paths onto `base`.
    pub fn into_options(self, base: &Path) -> SeqResult<SequenceOptions> {
        let files = self
            .files
            .into_iter()
            .map(|p| {
                if p.as_os_str().is_empty() || p.is_absolute() {
                    p
                } else {
                    base.join(p)
                }
            })
            .collect();
        let fps = match self.fps {
            Some(fps) => Fps::new(fps.num, fps.den)?,
            None => Fps::default(),
        };
        Ok(SequenceOptions { files, fps })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/manifest.rs"]
mod tests;
