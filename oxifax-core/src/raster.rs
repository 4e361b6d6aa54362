//! Packed row buffers.
//!
//! Rows are stored row-major, MSB-first within each byte, with a stride of
//! `ceil(width * samples * bits_per_sample / 8)` bytes. For bi-level fax
//! images a set bit is a black pixel.

use crate::error::{CoreError, Result};

/// Bytes per row for `width` pixels of `samples` channels at `bits_per_sample`.
pub fn stride_for(width: usize, samples: usize, bits_per_sample: usize) -> usize {
    (width * samples * bits_per_sample).div_ceil(8)
}

/// Set pixels `start..end` of a packed 1-bit row.
pub fn fill_run(row: &mut [u8], start: usize, end: usize) {
    if start >= end {
        return;
    }
    let first = start / 8;
    let last = (end - 1) / 8;
    let head = 0xFFu8 >> (start % 8);
    let tail = 0xFFu8 << (7 - (end - 1) % 8);
    if first == last {
        row[first] |= head & tail;
        return;
    }
    row[first] |= head;
    for byte in &mut row[first + 1..last] {
        *byte = 0xFF;
    }
    row[last] |= tail;
}

/// Read pixel `x` of a packed 1-bit row.
#[inline]
pub fn bit_at(row: &[u8], x: usize) -> bool {
    row[x / 8] & (0x80 >> (x % 8)) != 0
}

/// A bi-level image held as packed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create an all-white bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = stride_for(width, 1, 1);
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height],
        }
    }

    /// Wrap existing packed rows.
    ///
    /// The buffer must hold exactly `height` rows of `ceil(width / 8)` bytes.
    pub fn from_packed(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 {
            return Err(CoreError::invalid_geometry("width must be non-zero"));
        }
        let stride = stride_for(width, 1, 1);
        let needed = stride * height;
        if data.len() != needed {
            return Err(CoreError::buffer_too_small(needed, data.len()));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The packed rows.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the bitmap, returning the packed rows.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..(y + 1) * self.stride]
    }

    /// Mutable row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..(y + 1) * self.stride]
    }

    /// Whether pixel `(x, y)` is black.
    pub fn get(&self, x: usize, y: usize) -> bool {
        bit_at(self.row(y), x)
    }

    /// Set pixel `(x, y)` black or white.
    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        let mask = 0x80u8 >> (x % 8);
        let byte = &mut self.row_mut(y)[x / 8];
        if black {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Invert every pixel, leaving the padding bits of each row clear.
    pub fn invert(&mut self) {
        let pad = self.stride * 8 - self.width;
        let last_mask = if pad == 0 { 0xFF } else { 0xFFu8 << pad };
        for row in self.data.chunks_exact_mut(self.stride) {
            for byte in row.iter_mut() {
                *byte = !*byte;
            }
            if let Some(last) = row.last_mut() {
                *last &= last_mask;
            }
        }
    }
}
