//! LZW encoder (compression).

use oxifax_core::bitstream::{BitWriter, FillOrder};

use crate::config::{CLEAR_CODE, EOI_CODE, LzwConfig, MIN_CODE_BITS};
use crate::dictionary::EncodeTable;
use crate::error::Result;

/// LZW encoder for compression.
///
/// Output starts with a clear code, clears again before the table can
/// overflow, and ends with the end-of-information code. Code widths follow
/// the same rule the decoder applies, one table entry ahead.
#[derive(Debug)]
pub struct LzwEncoder {
    config: LzwConfig,
    table: EncodeTable,
    width: u8,
}

impl LzwEncoder {
    /// Create a new LZW encoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            table: EncodeTable::new(config.capacity()),
            width: MIN_CODE_BITS,
        })
    }

    /// Encode data with LZW compression.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.reset();
        let mut writer = BitWriter::with_capacity(input.len() / 2 + 4);
        writer.write_bits(u32::from(CLEAR_CODE), self.width);

        let Some((&first, rest)) = input.split_first() else {
            writer.write_bits(u32::from(EOI_CODE), self.width);
            return Ok(writer.finish(FillOrder::MsbToLsb));
        };

        let mut current = u16::from(first);
        for &byte in rest {
            if let Some(code) = self.table.find(current, byte) {
                current = code;
                continue;
            }
            writer.write_bits(u32::from(current), self.width);
            self.table.push(current, byte);
            self.after_entry(&mut writer);
            current = u16::from(byte);
        }

        writer.write_bits(u32::from(current), self.width);
        // The decoder adds one more entry after the last code and reads the
        // end code at the resulting width.
        self.table.bump();
        self.after_entry(&mut writer);
        writer.write_bits(u32::from(EOI_CODE), self.width);

        Ok(writer.finish(FillOrder::MsbToLsb))
    }

    fn after_entry(&mut self, writer: &mut BitWriter) {
        if self.table.len() >= self.config.capacity() - 2 {
            writer.write_bits(u32::from(CLEAR_CODE), self.width);
            self.reset();
        } else if self.width < self.config.max_bits
            && self.table.len() > self.config.widen_at(self.width)
        {
            self.width += 1;
        }
    }

    /// Reset the encoder to initial state.
    pub fn reset(&mut self) {
        self.table.reset();
        self.width = MIN_CODE_BITS;
    }
}
