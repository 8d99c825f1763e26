use std::collections::TryReserveError;

use crate::foundation::error::{SeqError, SeqResult};

/// Extra bytes past the last row; codecs and the packed RGB repack may read or write up to one
/// partial pixel group beyond a row.
pub const DECODE_SLACK: usize = 32;

/// Scratch region holding one decoded, still interleaved image.
///
/// Sized once to `row_size * height + DECODE_SLACK` and reused for every frame. Rows are addressed
/// through a table of start offsets, row `y` beginning `row_size` bytes after row `y - 1`.
///
/// A separate scratch area holds a codec's raw output when it must be transformed before landing
/// in the rows. It keeps its capacity between decodes.
#[derive(Debug)]
pub struct DecodeBuffer {
    data: Vec<u8>,
    row_starts: Vec<usize>,
    row_size: usize,
    scratch: Vec<u8>,
}

impl DecodeBuffer {
    /// Allocate a zeroed buffer of `height` rows of `row_size` bytes.
    pub fn allocate(row_size: usize, height: usize) -> SeqResult<Self> {
        let image_len = row_size
            .checked_mul(height)
            .ok_or(SeqError::OutOfMemory { bytes: usize::MAX })?;
        let len = image_len
            .checked_add(DECODE_SLACK)
            .ok_or(SeqError::OutOfMemory { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SeqError::OutOfMemory { bytes: len })?;
        data.resize(len, 0);

        let mut row_starts = Vec::new();
        row_starts
            .try_reserve_exact(height)
            .map_err(|_| SeqError::OutOfMemory {
                bytes: height.saturating_mul(std::mem::size_of::<usize>()),
            })?;
        row_starts.extend((0..height).map(|y| y * row_size));

        Ok(Self {
            data,
            row_starts,
            row_size,
            scratch: Vec::new(),
        })
    }

    /// Bytes per decoded row.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.row_starts.len()
    }

    /// Byte offset of every row, in order.
    pub fn row_starts(&self) -> &[usize] {
        &self.row_starts
    }

    /// Row `y`, exactly `row_size` bytes.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = self.row_starts[y];
        &self.data[start..start + self.row_size]
    }

    /// Rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.row_starts
            .iter()
            .map(move |&start| &self.data[start..start + self.row_size])
    }

    /// Mutable rows in order, as handed to a codec.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let len = self.image_len();
        // `chunks_exact_mut` panics on zero; a zero row size means there is nothing to hand out.
        self.data[..len].chunks_exact_mut(self.row_size.max(1))
    }

    /// All rows back to back, without the trailing slack.
    pub fn image_bytes(&self) -> &[u8] {
        &self.data[..self.image_len()]
    }

    /// Mutable view of all rows back to back, without the trailing slack.
    pub fn image_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.image_len();
        &mut self.data[..len]
    }

    /// Scratch area of `len` bytes next to the rows, which are returned as the second slice.
    ///
    /// The scratch area only grows, so a sequence of same-sized decodes allocates it once.
    pub fn scratch_and_image(
        &mut self,
        len: usize,
    ) -> Result<(&mut [u8], &mut [u8]), TryReserveError> {
        if self.scratch.len() < len {
            self.scratch.try_reserve_exact(len - self.scratch.len())?;
            self.scratch.resize(len, 0);
        }
        let image_len = self.image_len();
        Ok((&mut self.scratch[..len], &mut self.data[..image_len]))
    }

    /// Bytes currently held by the scratch area.
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// The whole allocation including slack.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn image_len(&self) -> usize {
        self.row_size * self.row_starts.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
