//! Bit-level I/O for fax and LZW codes.
//!
//! This module provides [`BitCursor`] and [`BitWriter`] for reading and
//! writing MSB-first variable-length codes.
//!
//! # Bit Ordering
//!
//! CCITT and TIFF LZW codes are defined MSB-first. TIFF additionally allows
//! fax data to be stored with the bits of every byte reversed
//! ([`FillOrder::LsbToMsb`]). The reversal is applied once when a byte is
//! fetched (or emitted), so every code lookup sees MSB-first bits.
//!
//! # Truncated input
//!
//! Fax strips routinely end early, relying on implicit zero padding before a
//! terminator. Reading past the end of the buffer therefore yields zero bits
//! indefinitely instead of failing; callers use [`BitCursor::is_exhausted`]
//! at line boundaries to stop.
//!
//! # Example
//!
//! ```
//! use oxifax_core::bitstream::{BitCursor, FillOrder};
//!
//! let data = [0b1000_0000];
//! let mut cursor = BitCursor::with_fill_order(&data, FillOrder::LsbToMsb);
//! // The set bit is the last one in the logical MSB-first stream.
//! assert_eq!(cursor.read_bits(8), 0b0000_0001);
//! ```

/// Maximum number of bits a single [`BitCursor::read_bits`] call returns.
pub const MAX_READ_BITS: u8 = 24;

/// Order of bits within a byte (TIFF `FillOrder` tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillOrder {
    /// Pixel 0 is stored in the most significant bit.
    #[default]
    MsbToLsb = 1,
    /// Pixel 0 is stored in the least significant bit.
    LsbToMsb = 2,
}

impl FillOrder {
    /// Map a TIFF `FillOrder` tag value.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(Self::MsbToLsb),
            2 => Some(Self::LsbToMsb),
            _ => None,
        }
    }

    /// Convert a stored byte to MSB-first order (and back; the map is an involution).
    #[inline]
    pub fn normalize(self, byte: u8) -> u8 {
        match self {
            Self::MsbToLsb => byte,
            Self::LsbToMsb => byte.reverse_bits(),
        }
    }
}

/// Sequential MSB-first reader over a byte slice.
///
/// The cursor only moves forward, except for [`BitCursor::rewind`], which
/// steps back after a table lookup reveals that fewer bits belonged to the
/// code than were speculatively read.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    byte_index: usize,
    /// Always in `0..8`.
    bit_index: u8,
    fill_order: FillOrder,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor over MSB-first data.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_fill_order(data, FillOrder::MsbToLsb)
    }

    /// Create a cursor with the given fill order.
    pub fn with_fill_order(data: &'a [u8], fill_order: FillOrder) -> Self {
        Self {
            data,
            byte_index: 0,
            bit_index: 0,
            fill_order,
        }
    }

    /// The fill order fixed at construction.
    pub fn fill_order(&self) -> FillOrder {
        self.fill_order
    }

    /// Length of the underlying buffer in bits.
    pub fn len_bits(&self) -> u64 {
        self.data.len() as u64 * 8
    }

    /// Current position in bits from the start of the buffer.
    pub fn position(&self) -> u64 {
        self.byte_index as u64 * 8 + u64::from(self.bit_index)
    }

    /// Whether every real bit has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.byte_index >= self.data.len()
    }

    /// Number of real (non padding) bits left.
    pub fn remaining_bits(&self) -> u64 {
        self.len_bits().saturating_sub(self.position())
    }

    #[inline]
    fn fetch(&self, index: usize) -> u32 {
        match self.data.get(index) {
            Some(&byte) => u32::from(self.fill_order.normalize(byte)),
            None => 0,
        }
    }

    #[inline]
    fn window(&self) -> u32 {
        let i = self.byte_index;
        (self.fetch(i) << 24) | (self.fetch(i + 1) << 16) | (self.fetch(i + 2) << 8) | self.fetch(i + 3)
    }

    /// Return the next `count` bits without consuming them.
    #[inline]
    pub fn peek_bits(&self, count: u8) -> u32 {
        debug_assert!(count <= MAX_READ_BITS, "Cannot peek more than 24 bits at once");
        if count == 0 {
            return 0;
        }
        (self.window() << self.bit_index) >> (32 - u32::from(count))
    }

    /// Consume `count` bits (at most [`MAX_READ_BITS`]) and return them MSB-first.
    ///
    /// Bits past the end of the buffer read as zero.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> u32 {
        let value = self.peek_bits(count);
        self.skip_bits(u64::from(count));
        value
    }

    /// Consume a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> bool {
        self.read_bits(1) == 1
    }

    /// Advance by `count` bits.
    #[inline]
    pub fn skip_bits(&mut self, count: u64) {
        self.set_position(self.position() + count);
    }

    /// Move back by `count` bits, stopping at the start of the buffer.
    #[inline]
    pub fn rewind(&mut self, count: u64) {
        self.set_position(self.position().saturating_sub(count));
    }

    /// Skip to the next byte boundary (no-op when already aligned).
    pub fn align_to_byte(&mut self) {
        if self.bit_index != 0 {
            self.byte_index += 1;
            self.bit_index = 0;
        }
    }

    /// Whether the cursor sits on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_index == 0
    }

    #[inline]
    fn set_position(&mut self, position: u64) {
        self.byte_index = (position / 8) as usize;
        self.bit_index = (position % 8) as u8;
    }
}

/// MSB-first bit writer producing fax and LZW streams.
#[derive(Debug, Default)]
pub struct BitWriter {
    output: Vec<u8>,
    /// Pending bits, right aligned.
    buffer: u32,
    bits_in_buffer: u8,
}

impl BitWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Write the low `count` bits of `value` (at most 24), MSB first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= MAX_READ_BITS, "Cannot write more than 24 bits at once");
        if count == 0 {
            return;
        }
        let mask = (1u32 << count) - 1;
        self.buffer = (self.buffer << count) | (value & mask);
        self.bits_in_buffer += count;

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
        self.buffer &= (1u32 << self.bits_in_buffer) - 1;
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u32::from(bit), 1);
    }

    /// Write `count` zero bits.
    pub fn write_zeros(&mut self, mut count: usize) {
        while count > 0 {
            let step = count.min(16);
            self.write_bits(0, step as u8);
            count -= step;
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.output.len() as u64 * 8 + u64::from(self.bits_in_buffer)
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        if self.bits_in_buffer > 0 {
            let pad = 8 - self.bits_in_buffer;
            self.write_bits(0, pad);
        }
    }

    /// Flush pending bits and return the bytes in the requested fill order.
    pub fn finish(mut self, fill_order: FillOrder) -> Vec<u8> {
        self.align_to_byte();
        if fill_order == FillOrder::LsbToMsb {
            for byte in &mut self.output {
                *byte = byte.reverse_bits();
            }
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_across_bytes() {
        let data = [0b1010_1100, 0b0011_1111];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.read_bits(3), 0b101);
        assert_eq!(cursor.read_bits(7), 0b0110_000);
        assert_eq!(cursor.read_bits(6), 0b11_1111);
        assert_eq!(cursor.position(), 16);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_zero_padding_past_end() {
        let data = [0xFF];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.read_bits(4), 0xF);
        assert_eq!(cursor.read_bits(13), 0b1111_0000_0000_0);
        assert_eq!(cursor.read_bits(13), 0);
        assert_eq!(cursor.read_bits(13), 0);
        assert_eq!(cursor.remaining_bits(), 0);
    }

    #[test]
    fn test_rewind() {
        let data = [0b1100_1010, 0b0101_0000];
        let mut cursor = BitCursor::new(&data);
        let speculative = cursor.read_bits(10);
        assert_eq!(speculative, 0b1100_1010_01);
        cursor.rewind(7);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_bits(5), 0b0_1010);
        cursor.rewind(100);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0b0001_0000];
        let cursor = BitCursor::new(&data);
        assert_eq!(cursor.peek_bits(4), 0b0001);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_lsb_fill_order() {
        let data = [0b0000_0001, 0b1000_0000];
        let mut cursor = BitCursor::with_fill_order(&data, FillOrder::LsbToMsb);
        assert!(cursor.read_bit());
        assert_eq!(cursor.read_bits(14), 0);
        assert!(cursor.read_bit());
    }

    #[test]
    fn test_align_to_byte() {
        let data = [0xFF, 0x0F];
        let mut cursor = BitCursor::new(&data);
        cursor.read_bits(3);
        cursor.align_to_byte();
        assert!(cursor.is_byte_aligned());
        assert_eq!(cursor.read_bits(8), 0x0F);
    }

    #[test]
    fn test_writer_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.write_bits(0b1100, 4);
        writer.write_bits(0b1111_1111, 8);
        writer.write_bits(0b000000000001, 12);
        assert_eq!(writer.bit_len(), 27);
        let data = writer.finish(FillOrder::MsbToLsb);
        assert_eq!(data.len(), 4);

        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.read_bits(3), 0b101);
        assert_eq!(cursor.read_bits(4), 0b1100);
        assert_eq!(cursor.read_bits(8), 0b1111_1111);
        assert_eq!(cursor.read_bits(12), 1);
    }

    #[test]
    fn test_writer_fill_order() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1, 1);
        let data = writer.finish(FillOrder::LsbToMsb);
        assert_eq!(data, vec![0b0000_0001]);

        let mut cursor = BitCursor::with_fill_order(&data, FillOrder::LsbToMsb);
        assert!(cursor.read_bit());
    }

    #[test]
    fn test_write_zeros() {
        let mut writer = BitWriter::new();
        writer.write_zeros(37);
        writer.write_bit(true);
        assert_eq!(writer.bit_len(), 38);
        let data = writer.finish(FillOrder::MsbToLsb);
        assert_eq!(data, vec![0, 0, 0, 0, 0b0000_0100]);
    }

    #[test]
    fn test_fill_order_tag() {
        assert_eq!(FillOrder::from_tag(1), Some(FillOrder::MsbToLsb));
        assert_eq!(FillOrder::from_tag(2), Some(FillOrder::LsbToMsb));
        assert_eq!(FillOrder::from_tag(3), None);
    }
}
