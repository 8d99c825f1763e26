//! PNG decoding through the `png` crate with every transform done here.
//!
//! The stream is read with identity transformations, so rows arrive exactly as stored: sub-byte
//! samples packed most significant bit first, palette indices, 16-bit samples big-endian. Each
//! [`NormalizeFlags`] field then maps to one step of [`normalize_row`].

use std::io::{BufRead, Seek};

use super::{CodecError, NormalizeFlags};
use crate::foundation::core::Geometry;
use crate::format::negotiate::{ChannelLayout, SourceHeader};
use crate::frame::buffer::DecodeBuffer;

fn from_png_error(err: png::DecodingError) -> CodecError {
    match err {
        png::DecodingError::IoError(e) => CodecError::Io(e),
        other => CodecError::Malformed(other.to_string()),
    }
}

fn layout_of(color: png::ColorType) -> ChannelLayout {
    match color {
        png::ColorType::Grayscale => ChannelLayout::Gray,
        png::ColorType::GrayscaleAlpha => ChannelLayout::GrayAlpha,
        png::ColorType::Rgb => ChannelLayout::Rgb,
        png::ColorType::Rgba => ChannelLayout::Rgba,
        png::ColorType::Indexed => ChannelLayout::Palette,
    }
}

fn header_of(info: &png::Info<'_>) -> SourceHeader {
    SourceHeader {
        geometry: Geometry::new(info.width, info.height),
        layout: layout_of(info.color_type),
        bit_depth: info.bit_depth as u8,
    }
}

pub(super) fn read_header<R: BufRead + Seek>(input: R) -> Result<SourceHeader, CodecError> {
    let mut decoder = png::Decoder::new(input);
    let info = decoder.read_header_info().map_err(from_png_error)?;
    Ok(header_of(info))
}

pub(super) fn decode_into<R: BufRead + Seek>(
    input: R,
    buffer: &mut DecodeBuffer,
    flags: NormalizeFlags,
) -> Result<(), CodecError> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(from_png_error)?;

    let stored = header_of(reader.info());
    let target = stored.normalized(flags);
    if target.geometry.height as usize != buffer.height() || target.row_size() != buffer.row_size()
    {
        return Err(CodecError::LayoutMismatch(format!(
            "{} {:?} at {} bits gives {} byte rows, buffer holds {} rows of {} bytes",
            target.geometry,
            target.layout,
            target.bit_depth,
            target.row_size(),
            buffer.height(),
            buffer.row_size()
        )));
    }

    let total = reader
        .output_buffer_size()
        .ok_or_else(|| CodecError::Malformed("image too large".to_string()))?;
    let row_size = buffer.row_size();
    let (raw, image) = buffer
        .scratch_and_image(total)
        .map_err(|_| CodecError::OutOfMemory { bytes: total })?;
    let frame = reader.next_frame(raw).map_err(from_png_error)?;
    let palette = reader.info().palette.as_deref();

    if row_size == 0 {
        return Ok(());
    }
    for (dst, src) in image
        .chunks_exact_mut(row_size)
        .zip(raw.chunks_exact(frame.line_size))
    {
        normalize_row(src, dst, &stored, &target, palette, flags)?;
    }
    Ok(())
}

/// Sample `index` of a row packed at `bit_depth` (1, 2 or 4) bits, most significant bits first.
fn packed_sample(row: &[u8], bit_depth: u8, index: usize) -> u8 {
    let bits = usize::from(bit_depth);
    let bit = index * bits;
    let shift = 8 - bits - bit % 8;
    (row[bit / 8] >> shift) & ((1u8 << bit_depth) - 1)
}

/// Turn one stored row into one decode buffer row laid out as `target`.
fn normalize_row(
    src: &[u8],
    dst: &mut [u8],
    stored: &SourceHeader,
    target: &SourceHeader,
    palette: Option<&[u8]>,
    flags: NormalizeFlags,
) -> Result<(), CodecError> {
    let depth = stored.bit_depth;

    if stored.layout == ChannelLayout::Palette && target.layout == ChannelLayout::Rgb {
        let palette = palette
            .ok_or_else(|| CodecError::Malformed("indexed image without palette".to_string()))?;
        for (x, rgb) in dst.chunks_exact_mut(3).enumerate() {
            let i = if depth < 8 {
                packed_sample(src, depth, x)
            } else {
                src[x]
            };
            let i = usize::from(i) * 3;
            let entry = palette.get(i..i + 3).ok_or_else(|| {
                CodecError::Malformed(format!("palette index {} out of range", i / 3))
            })?;
            rgb.copy_from_slice(entry);
        }
        return Ok(());
    }

    if depth < 8 {
        if target.bit_depth == 8 {
            // Widened samples keep their value: a 1-bit pixel becomes 0 or 1.
            for (x, d) in dst.iter_mut().enumerate() {
                *d = packed_sample(src, depth, x);
            }
        } else {
            dst.copy_from_slice(&src[..dst.len()]);
        }
        return Ok(());
    }

    let sample = usize::from(depth / 8);
    let channels = stored.layout.channels();
    let kept = target.layout.channels();
    if kept == channels {
        dst.copy_from_slice(&src[..dst.len()]);
    } else {
        for (d, s) in dst
            .chunks_exact_mut(kept * sample)
            .zip(src.chunks_exact(channels * sample))
        {
            d.copy_from_slice(&s[..kept * sample]);
        }
    }

    if sample == 2 && flags.swap_endian {
        for pair in dst.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/png_rows.rs"]
mod tests;
