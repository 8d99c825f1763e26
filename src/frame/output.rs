use smallvec::SmallVec;

use crate::foundation::core::{Fps, Geometry};
use crate::format::negotiate::PixelFormat;

/// One plane of an [`OutputFrame`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePlane {
    /// Plane bytes, `stride * height` long.
    pub data: Vec<u8>,
    /// Bytes per row, including alignment padding.
    pub stride: usize,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FramePlane {
    /// Zeroed plane whose rows hold `row_bytes` bytes rounded up to `alignment`.
    pub fn new(width: u32, height: u32, row_bytes: usize, alignment: usize) -> Self {
        let alignment = alignment.max(1);
        let stride = row_bytes.div_ceil(alignment) * alignment;
        Self {
            data: vec![0u8; stride * height as usize],
            stride,
            width,
            height,
        }
    }

    /// Row `y` including padding.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..(y + 1) * self.stride]
    }

    /// Mutable row `y` including padding.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..(y + 1) * self.stride]
    }
}

/// Per-frame metadata attached by the reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameProps {
    /// Frame duration numerator (seconds).
    pub duration_num: i64,
    /// Frame duration denominator.
    pub duration_den: i64,
}

impl FrameProps {
    /// Duration of one frame at `fps`.
    pub fn from_fps(fps: Fps) -> Self {
        let (duration_num, duration_den) = fps.frame_duration();
        Self {
            duration_num,
            duration_den,
        }
    }
}

/// Planar video frame as handed out by a host.
///
/// 16-bit samples are stored little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFrame {
    /// Pixel format; decides the plane count and sample size.
    pub format: PixelFormat,
    /// Frame size.
    pub geometry: Geometry,
    /// One plane per channel.
    pub planes: SmallVec<[FramePlane; 3]>,
    /// Metadata attached when the frame is produced.
    pub props: FrameProps,
}

impl OutputFrame {
    /// Allocate a zeroed frame with rows aligned to `alignment` bytes (at least 4).
    ///
    /// Rows of packed 8-bit RGB planes are written a 4-pixel word at a time, so their width is
    /// rounded up to a multiple of 4 pixels before alignment.
    pub fn new(format: PixelFormat, geometry: Geometry, alignment: usize) -> Self {
        let alignment = alignment.max(4);
        let padded_width = match format {
            PixelFormat::Rgb24 => (geometry.width as usize).div_ceil(4) * 4,
            _ => geometry.width as usize,
        };
        let row_bytes = padded_width * format.bytes_per_sample();
        let planes = (0..format.plane_count())
            .map(|_| FramePlane::new(geometry.width, geometry.height, row_bytes, alignment))
            .collect();
        Self {
            format,
            geometry,
            planes,
            props: FrameProps::default(),
        }
    }

    /// Plane `index`.
    pub fn plane(&self, index: usize) -> &FramePlane {
        &self.planes[index]
    }

    /// Mutable plane `index`.
    pub fn plane_mut(&mut self, index: usize) -> &mut FramePlane {
        &mut self.planes[index]
    }

    /// Bytes of visible samples per plane row, without padding.
    pub fn visible_row_bytes(&self) -> usize {
        self.geometry.width as usize * self.format.bytes_per_sample()
    }

    /// Re-interleave the planes into tightly packed pixels, channel-minor.
    ///
    /// Samples keep the plane byte order, so 16-bit samples come out little-endian.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let sample = self.format.bytes_per_sample();
        let width = self.geometry.width as usize;
        let height = self.geometry.height as usize;
        let channels = self.planes.len();

        let mut out = Vec::with_capacity(width * height * channels * sample);
        for y in 0..height {
            let rows: SmallVec<[&[u8]; 3]> = self.planes.iter().map(|p| p.row(y)).collect();
            for x in 0..width {
                for row in &rows {
                    out.extend_from_slice(&row[x * sample..(x + 1) * sample]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/output.rs"]
mod tests;
