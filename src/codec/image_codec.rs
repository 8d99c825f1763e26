use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ColorType, ImageDecoder, ImageError, ImageFormat, ImageReader};

use super::png_rows;
use super::{CodecError, ImageCodec, NormalizeFlags};
use crate::foundation::core::Geometry;
use crate::format::negotiate::{ChannelLayout, SourceHeader};
use crate::frame::buffer::DecodeBuffer;

/// [`ImageCodec`] backed by the `image` crate.
///
/// The format is detected from the file signature, never from the extension. PNG files are read
/// row by row as stored and every [`NormalizeFlags`] transform is applied here. Other formats go
/// through the `image` decoders, which expand palettes and widen low bit depths themselves, so
/// their headers already report 8 or 16-bit samples; alpha stripping and the 16-bit byte order
/// still follow the flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCrateCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

type Input = BufReader<File>;

enum Source {
    Png(Input),
    Other(ImageReader<Input>),
}

fn open(path: &Path) -> Result<Source, CodecError> {
    let file = File::open(path)?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    match reader.format() {
        None => Err(CodecError::NotAnImage),
        Some(ImageFormat::Png) => Ok(Source::Png(reader.into_inner())),
        Some(_) => Ok(Source::Other(reader)),
    }
}

fn from_image_error(err: ImageError) -> CodecError {
    match err {
        ImageError::IoError(e) => CodecError::Io(e),
        other => CodecError::Malformed(other.to_string()),
    }
}

fn decoded_layout(color: ColorType) -> (ChannelLayout, u8) {
    let channels = color.channel_count().max(1);
    let bit_depth = color.bytes_per_pixel() * 8 / channels;
    let layout = match (color.has_color(), color.has_alpha()) {
        (false, false) => ChannelLayout::Gray,
        (false, true) => ChannelLayout::GrayAlpha,
        (true, false) => ChannelLayout::Rgb,
        (true, true) => ChannelLayout::Rgba,
    };
    (layout, bit_depth)
}

fn reorder_u16_samples(bytes: &mut [u8], little_endian: bool) {
    for sample in bytes.chunks_exact_mut(2) {
        let v = u16::from_ne_bytes([sample[0], sample[1]]);
        let out = if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        };
        sample.copy_from_slice(&out);
    }
}

fn read_other_header(reader: ImageReader<Input>) -> Result<SourceHeader, CodecError> {
    let decoder = reader.into_decoder().map_err(from_image_error)?;
    let (width, height) = decoder.dimensions();
    let (layout, bit_depth) = decoded_layout(decoder.color_type());
    Ok(SourceHeader {
        geometry: Geometry::new(width, height),
        layout,
        bit_depth,
    })
}

fn decode_other(
    reader: ImageReader<Input>,
    buffer: &mut DecodeBuffer,
    flags: NormalizeFlags,
) -> Result<(), CodecError> {
    let decoder = reader.into_decoder().map_err(from_image_error)?;
    let (width, height) = decoder.dimensions();
    let color = decoder.color_type();
    let channels = usize::from(color.channel_count().max(1));
    let sample_bytes = usize::from(color.bytes_per_pixel()) / channels;
    let kept = if flags.strip_alpha && color.has_alpha() {
        channels - 1
    } else {
        channels
    };

    let row_size = width as usize * kept * sample_bytes;
    if height as usize != buffer.height() || row_size != buffer.row_size() {
        return Err(CodecError::LayoutMismatch(format!(
            "{width}x{height} {color:?} gives {row_size} byte rows, buffer holds {} rows of {} bytes",
            buffer.height(),
            buffer.row_size()
        )));
    }

    if kept == channels {
        decoder
            .read_image(buffer.image_bytes_mut())
            .map_err(from_image_error)?;
    } else {
        let total = usize::try_from(decoder.total_bytes())
            .map_err(|_| CodecError::Malformed("image too large".to_string()))?;
        let (scratch, image) = buffer
            .scratch_and_image(total)
            .map_err(|_| CodecError::OutOfMemory { bytes: total })?;
        decoder.read_image(scratch).map_err(from_image_error)?;

        let src_px = channels * sample_bytes;
        let dst_px = kept * sample_bytes;
        for (dst, src) in image
            .chunks_exact_mut(dst_px)
            .zip(scratch.chunks_exact(src_px))
        {
            dst.copy_from_slice(&src[..dst_px]);
        }
    }

    if sample_bytes == 2 {
        reorder_u16_samples(buffer.image_bytes_mut(), flags.swap_endian);
    }
    tracing::trace!(?color, "decoded with image crate");
    Ok(())
}

impl ImageCodec for ImageCrateCodec {
    fn read_header(&self, path: &Path) -> Result<SourceHeader, CodecError> {
        match open(path)? {
            Source::Png(input) => png_rows::read_header(input),
            Source::Other(reader) => read_other_header(reader),
        }
    }

    fn decode_into(
        &self,
        path: &Path,
        buffer: &mut DecodeBuffer,
        flags: NormalizeFlags,
    ) -> Result<(), CodecError> {
        match open(path)? {
            Source::Png(input) => png_rows::decode_into(input, buffer, flags)?,
            Source::Other(reader) => decode_other(reader, buffer, flags)?,
        }
        tracing::trace!(path = %path.display(), "decoded source image");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/image_codec.rs"]
mod tests;
