use super::*;
use crate::foundation::core::Geometry;
use crate::format::negotiate::PixelFormat;

fn filled(row_size: usize, height: usize, f: impl Fn(usize) -> u8) -> DecodeBuffer {
    let mut buf = DecodeBuffer::allocate(row_size, height).unwrap();
    for (i, b) in buf.image_bytes_mut().iter_mut().enumerate() {
        *b = f(i);
    }
    buf
}

#[test]
fn gray_bulk_copy_when_stride_matches() {
    let src = filled(64, 48, |i| (i * 7 % 251) as u8);
    let mut dst = OutputFrame::new(PixelFormat::Gray8, Geometry::new(64, 48), 32);
    assert_eq!(dst.plane(0).stride, 64);

    Repacker::Gray.repack(&src, &mut dst);
    assert_eq!(dst.plane(0).data.as_slice(), src.image_bytes());
}

#[test]
fn gray_row_copy_when_stride_is_padded() {
    let src = filled(10, 3, |i| i as u8);
    let mut dst = OutputFrame::new(PixelFormat::Gray8, Geometry::new(10, 3), 32);
    assert_eq!(dst.plane(0).stride, 32);

    Repacker::Gray.repack(&src, &mut dst);
    for y in 0..3 {
        assert_eq!(&dst.plane(0).row(y)[..10], src.row(y));
        assert!(dst.plane(0).row(y)[10..].iter().all(|&b| b == 0));
    }
}

#[test]
fn gray16_copies_sample_bytes() {
    let src = filled(6, 2, |i| 0x10 + i as u8);
    let mut dst = OutputFrame::new(PixelFormat::Gray16, Geometry::new(3, 2), 16);

    Repacker::Gray.repack(&src, &mut dst);
    assert_eq!(&dst.plane(0).row(1)[..6], &[0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b]);
}

#[test]
fn rgb24_word_permutation_is_bit_exact() {
    let src = filled(24, 2, |i| (i * 13 + 5) as u8);
    let mut dst = OutputFrame::new(PixelFormat::Rgb24, Geometry::new(8, 2), 4);

    Repacker::Rgb24Packed.repack(&src, &mut dst);

    for y in 0..2 {
        let row = src.row(y);
        for g in 0..2 {
            let b = &row[g * 12..g * 12 + 12];
            let word = |plane: usize| {
                let r = &dst.plane(plane).row(y)[g * 4..g * 4 + 4];
                u32::from_le_bytes([r[0], r[1], r[2], r[3]])
            };
            let expect = |i0: usize, i1: usize, i2: usize, i3: usize| {
                (u32::from(b[i0]) << 24)
                    | (u32::from(b[i1]) << 16)
                    | (u32::from(b[i2]) << 8)
                    | u32::from(b[i3])
            };
            assert_eq!(word(0), expect(9, 6, 3, 0));
            assert_eq!(word(1), expect(10, 7, 4, 1));
            assert_eq!(word(2), expect(11, 8, 5, 2));
        }
    }
}

#[test]
fn rgb24_planes_hold_each_channel_in_pixel_order() {
    let px: Vec<u8> = (0..5 * 3).map(|i| i as u8).collect();
    let mut src = DecodeBuffer::allocate(15, 1).unwrap();
    src.image_bytes_mut().copy_from_slice(&px);
    let mut dst = OutputFrame::new(PixelFormat::Rgb24, Geometry::new(5, 1), 32);

    Repacker::Rgb24Packed.repack(&src, &mut dst);

    assert_eq!(&dst.plane(0).row(0)[..5], &[0, 3, 6, 9, 12]);
    assert_eq!(&dst.plane(1).row(0)[..5], &[1, 4, 7, 10, 13]);
    assert_eq!(&dst.plane(2).row(0)[..5], &[2, 5, 8, 11, 14]);
    assert_eq!(dst.to_interleaved(), px);
}

#[test]
fn rgb48_deinterleaves_samples() {
    let width = 3;
    let samples: Vec<u16> = (0..(width * 3 * 2) as u16).map(|s| s * 1000 + 1).collect();
    let mut src = DecodeBuffer::allocate(width * 6, 2).unwrap();
    for (dst, s) in src.image_bytes_mut().chunks_exact_mut(2).zip(&samples) {
        dst.copy_from_slice(&s.to_le_bytes());
    }
    let mut dst = OutputFrame::new(PixelFormat::Rgb48, Geometry::new(width as u32, 2), 32);

    Repacker::Rgb48Planar.repack(&src, &mut dst);

    for y in 0..2 {
        let row_samples = &samples[y * width * 3..(y + 1) * width * 3];
        for x in 0..width {
            for c in 0..3 {
                let r = dst.plane(c).row(y);
                let got = u16::from_le_bytes([r[x * 2], r[x * 2 + 1]]);
                assert_eq!(got, row_samples[3 * x + c], "pixel {x} channel {c} row {y}");
            }
        }
    }
}

#[test]
#[should_panic(expected = "decode buffer height does not match frame")]
fn mismatched_frame_is_an_invariant_violation() {
    let src = DecodeBuffer::allocate(4, 2).unwrap();
    let mut dst = OutputFrame::new(PixelFormat::Gray8, Geometry::new(4, 3), 4);
    Repacker::Gray.repack(&src, &mut dst);
}
