//! LZW decoder (decompression).
//!
//! The decoder reads codes MSB-first and stops at the end-of-information
//! code, at the expected size, or when fewer bits than one code remain.
//! Running out of input is not an error: TIFF strips are frequently cut
//! short and the rows already produced are kept.

use log::{debug, trace};
use oxifax_core::bitstream::BitCursor;

use crate::config::{CLEAR_CODE, EOI_CODE, LzwConfig, MIN_CODE_BITS};
use crate::dictionary::StringTable;
use crate::error::{LzwError, Result};

/// LZW decoder for decompression.
#[derive(Debug)]
pub struct LzwDecoder {
    config: LzwConfig,
    table: StringTable,
    width: u8,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            table: StringTable::new(config.capacity()),
            width: MIN_CODE_BITS,
        })
    }

    /// Number of table entries after the last decode, the 256 literals and
    /// the two control codes included.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Code width in effect after the last decode.
    pub fn code_width(&self) -> u8 {
        self.width
    }

    /// Decode one LZW stream into at most `expected_size` bytes.
    ///
    /// Each call starts from a fresh table; strips do not share state.
    pub fn decode(&mut self, input: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        self.reset();
        let mut cursor = BitCursor::new(input);
        let mut output = Vec::with_capacity(expected_size);
        let mut prev: Option<u16> = None;

        while output.len() < expected_size {
            if cursor.remaining_bits() < u64::from(self.width) {
                debug!(
                    "LZW input exhausted at bit {} after {} bytes",
                    cursor.position(),
                    output.len()
                );
                break;
            }
            let code = cursor.read_bits(self.width) as u16;

            if code == CLEAR_CODE {
                trace!("clear code at bit {}", cursor.position());
                self.reset();
                prev = None;
                continue;
            }
            if code == EOI_CODE {
                break;
            }

            match prev {
                None => {
                    if !self.table.contains(code) {
                        return Err(LzwError::InvalidCode(code));
                    }
                    self.table.expand_into(code, &mut output);
                }
                Some(prev_code) => {
                    if self.table.contains(code) {
                        self.table.expand_into(code, &mut output);
                        self.add(prev_code, self.table.first_byte(code));
                    } else if usize::from(code) == self.table.len() {
                        // KwKwK: the code being defined is the previous
                        // string plus its own first byte.
                        self.add(prev_code, self.table.first_byte(prev_code));
                        self.table.expand_into(code, &mut output);
                    } else {
                        return Err(LzwError::InvalidCode(code));
                    }
                }
            }
            prev = Some(code);

            if self.table.len() >= self.config.capacity() {
                debug!(
                    "LZW table full at bit {}; resetting without a clear code",
                    cursor.position()
                );
                self.reset();
                prev = None;
            }
        }

        output.truncate(expected_size);
        Ok(output)
    }

    fn add(&mut self, prefix: u16, suffix: u8) {
        self.table.push(prefix, suffix);
        if self.width < self.config.max_bits && self.table.len() >= self.config.widen_at(self.width)
        {
            self.width += 1;
        }
    }

    fn reset(&mut self) {
        self.table.reset();
        self.width = MIN_CODE_BITS;
    }
}
