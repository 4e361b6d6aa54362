//! LZW stream parameters.

use crate::error::{LzwError, Result};

/// Code width right after a clear code.
pub const MIN_CODE_BITS: u8 = 9;
/// Clears the string table.
pub const CLEAR_CODE: u16 = 256;
/// Ends the stream.
pub const EOI_CODE: u16 = 257;
/// First code assigned to a multi-byte string.
pub const FIRST_CODE: u16 = 258;

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Maximum code width in bits.
    pub max_bits: u8,
    /// Widen codes one entry early, as every TIFF writer does since
    /// libtiff 5.0.
    pub early_change: bool,
}

impl LzwConfig {
    /// TIFF LZW (compression 5): 9 to 12 bit codes, early change.
    pub const TIFF: Self = Self {
        max_bits: 12,
        early_change: true,
    };

    /// Create a configuration with early change and the given maximum width.
    pub fn new(max_bits: u8) -> Self {
        Self {
            max_bits,
            early_change: true,
        }
    }

    /// Number of codes the table can hold.
    pub fn capacity(&self) -> usize {
        1 << self.max_bits
    }

    /// Table length at which a decoder moves from `bits` to `bits + 1`.
    pub(crate) fn widen_at(&self, bits: u8) -> usize {
        (1usize << bits) - usize::from(self.early_change)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(MIN_CODE_BITS..=12).contains(&self.max_bits) {
            return Err(LzwError::InvalidBitWidth(self.max_bits));
        }
        Ok(())
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::TIFF
    }
}
