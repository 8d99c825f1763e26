//! Packed-to-planar transforms from a [`DecodeBuffer`] into an [`OutputFrame`].
//!
//! The routine is chosen once per sequence from its [`PixelFormat`](crate::PixelFormat). The
//! validator guarantees the decode buffer matches the frame, so shape disagreements here are
//! programming errors and panic.

use crate::frame::buffer::DecodeBuffer;
use crate::frame::output::{FramePlane, OutputFrame};

/// Repack routine bound to a sequence's output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repacker {
    /// Single plane, 8 or 16 bits: row copy honoring the destination stride.
    Gray,
    /// Interleaved 8-bit RGB split into three planes a 4-pixel word at a time.
    Rgb24Packed,
    /// Interleaved 16-bit RGB split into three planes.
    Rgb48Planar,
}

impl Repacker {
    /// Fill every plane of `dst` from the decoded image in `src`.
    pub fn repack(self, src: &DecodeBuffer, dst: &mut OutputFrame) {
        assert_eq!(
            src.height(),
            dst.geometry.height as usize,
            "decode buffer height does not match frame"
        );
        let width = dst.geometry.width as usize;
        match self {
            Self::Gray => {
                assert_eq!(dst.planes.len(), 1, "gray frames have one plane");
                assert_eq!(
                    src.row_size(),
                    width * dst.format.bytes_per_sample(),
                    "decode row size does not match frame width"
                );
                write_gray(src, &mut dst.planes[0]);
            }
            Self::Rgb24Packed => {
                assert_eq!(src.row_size(), width * 3, "rgb24 rows are 3 bytes per pixel");
                let [p0, p1, p2] = three_planes(dst);
                write_rgb24(src, width, p0, p1, p2);
            }
            Self::Rgb48Planar => {
                assert_eq!(src.row_size(), width * 6, "rgb48 rows are 6 bytes per pixel");
                let [p0, p1, p2] = three_planes(dst);
                write_rgb48(src, width, p0, p1, p2);
            }
        }
    }
}

fn three_planes(dst: &mut OutputFrame) -> [&mut FramePlane; 3] {
    match dst.planes.as_mut_slice() {
        [p0, p1, p2] => [p0, p1, p2],
        planes => panic!("expected 3 planes, frame has {}", planes.len()),
    }
}

fn write_gray(src: &DecodeBuffer, dst: &mut FramePlane) {
    let row_size = src.row_size();
    if row_size == dst.stride {
        let len = row_size * src.height();
        dst.data[..len].copy_from_slice(src.image_bytes());
        return;
    }

    assert!(dst.stride >= row_size, "plane stride shorter than source row");
    for (dst_row, src_row) in dst.data.chunks_exact_mut(dst.stride).zip(src.rows()) {
        dst_row[..row_size].copy_from_slice(src_row);
    }
}

#[inline]
fn bitor8to32(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    (u32::from(b0) << 24) | (u32::from(b1) << 16) | (u32::from(b2) << 8) | u32::from(b3)
}

// Each group of 4 pixels (12 source bytes) becomes one 32-bit word per plane. Words are stored
// little-endian, so plane 0 of group `g` reads back as bytes (9, 6, 3, 0) packed high to low.
// A trailing partial group reads into the next row or the buffer slack; the extra samples land in
// plane padding.
fn write_rgb24(
    src: &DecodeBuffer,
    width: usize,
    p0: &mut FramePlane,
    p1: &mut FramePlane,
    p2: &mut FramePlane,
) {
    let groups = width.div_ceil(4);
    for plane in [&*p0, &*p1, &*p2] {
        assert!(plane.stride >= groups * 4, "plane stride cannot hold 4-pixel words");
    }

    let bytes = src.as_bytes();
    for (y, &start) in src.row_starts().iter().enumerate() {
        let units = &bytes[start..start + groups * 12];
        let d0 = &mut p0.row_mut(y)[..groups * 4];
        let d1 = &mut p1.row_mut(y)[..groups * 4];
        let d2 = &mut p2.row_mut(y)[..groups * 4];

        for (x, c) in units.chunks_exact(12).enumerate() {
            let w = x * 4..x * 4 + 4;
            d0[w.clone()].copy_from_slice(&bitor8to32(c[9], c[6], c[3], c[0]).to_le_bytes());
            d1[w.clone()].copy_from_slice(&bitor8to32(c[10], c[7], c[4], c[1]).to_le_bytes());
            d2[w].copy_from_slice(&bitor8to32(c[11], c[8], c[5], c[2]).to_le_bytes());
        }
    }
}

fn write_rgb48(
    src: &DecodeBuffer,
    width: usize,
    p0: &mut FramePlane,
    p1: &mut FramePlane,
    p2: &mut FramePlane,
) {
    for (y, row) in src.rows().enumerate() {
        let d0 = &mut p0.row_mut(y)[..width * 2];
        let d1 = &mut p1.row_mut(y)[..width * 2];
        let d2 = &mut p2.row_mut(y)[..width * 2];

        for (x, px) in row.chunks_exact(6).enumerate() {
            let s = x * 2..x * 2 + 2;
            d0[s.clone()].copy_from_slice(&px[0..2]);
            d1[s.clone()].copy_from_slice(&px[2..4]);
            d2[s].copy_from_slice(&px[4..6]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/repack.rs"]
mod tests;
