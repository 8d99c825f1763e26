use crate::foundation::error::{SeqError, SeqResult};

/// Zero-based index of a frame within a sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Clamp to `[0, frame_count - 1]`; a zero `frame_count` yields index 0.
    pub fn clamp_to(self, frame_count: u64) -> FrameIndex {
        FrameIndex(self.0.min(frame_count.saturating_sub(1)))
    }
}

/// Frame rate as a rational `num / den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Frames.
    pub num: u32,
    /// Seconds; must be > 0.
    pub den: u32,
}

impl Fps {
    /// 24 frames per second, used when no rate is supplied.
    pub const DEFAULT: Fps = Fps { num: 24, den: 1 };

    /// Build a frame rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> SeqResult<Self> {
        if den == 0 {
            return Err(SeqError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SeqError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single frame as `(num, den)` seconds, i.e. the inverted rate.
    pub fn frame_duration(self) -> (i64, i64) {
        (i64::from(self.den), i64::from(self.num))
    }

    /// Duration of a single frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Width and height of every frame in a sequence, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Geometry {
    /// Build from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
