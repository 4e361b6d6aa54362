//! Coding parameters.

use oxifax_core::bitstream::FillOrder;
use oxifax_core::policy::ErrorPolicy;
use oxifax_core::raster::stride_for;

use crate::error::{FaxError, Result};

bitflags::bitflags! {
    /// Group 3 option bits, laid out as the TIFF `T4Options` tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct G3Options: u32 {
        /// Lines may be 2D-coded; a tag bit follows every EOL.
        const TWO_DIMENSIONAL = 1;
        /// Uncompressed mode may appear in 2D lines.
        const UNCOMPRESSED = 2;
        /// Zero bits pad each EOL so that it ends on a byte boundary.
        const FILL_BITS = 4;
    }
}

impl Default for G3Options {
    fn default() -> Self {
        Self::empty()
    }
}

/// Group 4 option bits, laid out as the TIFF `T6Options` tag.
pub const T6_UNCOMPRESSED: u32 = 2;

/// The line coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coding {
    /// T.4 one-dimensional (Modified Huffman) lines, EOLs optional.
    Group3OneD,
    /// T.4 lines with an EOL and a 1D/2D tag bit before each line.
    Group3TwoD,
    /// T.6: every line 2D-coded, no EOLs.
    #[default]
    Group4,
}

impl Coding {
    /// Pick the Group 3 variant named by a `T4Options` value.
    pub fn from_t4_options(options: G3Options) -> Self {
        if options.contains(G3Options::TWO_DIMENSIONAL) {
            Coding::Group3TwoD
        } else {
            Coding::Group3OneD
        }
    }

    /// Whether lines are delimited by EOL codewords.
    pub fn is_group3(self) -> bool {
        !matches!(self, Coding::Group4)
    }
}

/// Decoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaxOptions {
    /// Line width in pixels.
    pub width: usize,
    /// Line coding scheme.
    pub coding: Coding,
    /// Group 3 option bits; `UNCOMPRESSED` also applies to Group 4.
    pub g3: G3Options,
    /// Bit order within each input byte.
    pub fill_order: FillOrder,
    /// Reaction to malformed lines.
    pub policy: ErrorPolicy,
    /// Every row starts on a byte boundary (TIFF compression 2, PDF
    /// `EncodedByteAlign`).
    pub byte_aligned: bool,
}

impl FaxOptions {
    /// Options for `width`-pixel lines coded with `coding`.
    pub fn new(width: usize, coding: Coding) -> Self {
        Self {
            width,
            coding,
            g3: G3Options::empty(),
            fill_order: FillOrder::MsbToLsb,
            policy: ErrorPolicy::Strict,
            byte_aligned: false,
        }
    }

    /// Set the Group 3 option bits.
    pub fn with_g3_options(mut self, g3: G3Options) -> Self {
        self.g3 = g3;
        self
    }

    /// Set the input fill order.
    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    /// Set the error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Require each row to start on a byte boundary.
    pub fn with_byte_alignment(mut self, byte_aligned: bool) -> Self {
        self.byte_aligned = byte_aligned;
        self
    }

    /// Bytes per decoded row.
    pub fn stride(&self) -> usize {
        stride_for(self.width, 1, 1)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(FaxError::invalid_input("line width must be non-zero"));
        }
        Ok(())
    }
}

/// Encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodeOptions {
    /// Line width in pixels.
    pub width: usize,
    /// Line coding scheme.
    pub coding: Coding,
    /// Group 3 option bits; only `FILL_BITS` changes the output.
    pub g3: G3Options,
    /// For [`Coding::Group3TwoD`]: one line in `k` is 1D-coded.
    pub k: u32,
    /// Bit order within each output byte.
    pub fill_order: FillOrder,
    /// Start every row on a byte boundary.
    pub byte_aligned: bool,
    /// Close the data with EOFB (Group 4) or RTC (Group 3).
    pub end_marker: bool,
    /// Start each Group 3 line with an EOL. Only one-dimensional coding can
    /// omit them (TIFF compression 2).
    pub eol: bool,
}

impl EncodeOptions {
    /// Options for `width`-pixel lines coded with `coding`.
    pub fn new(width: usize, coding: Coding) -> Self {
        Self {
            width,
            coding,
            g3: G3Options::empty(),
            k: 4,
            fill_order: FillOrder::MsbToLsb,
            byte_aligned: false,
            end_marker: true,
            eol: true,
        }
    }

    /// Set the Group 3 option bits.
    pub fn with_g3_options(mut self, g3: G3Options) -> Self {
        self.g3 = g3;
        self
    }

    /// Set the 1D line interval for Group 3 2D coding.
    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    /// Set the output fill order.
    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    /// Start each row on a byte boundary.
    pub fn with_byte_alignment(mut self, byte_aligned: bool) -> Self {
        self.byte_aligned = byte_aligned;
        self
    }

    /// Emit or omit the closing EOFB/RTC.
    pub fn with_end_marker(mut self, end_marker: bool) -> Self {
        self.end_marker = end_marker;
        self
    }

    /// Emit or omit the EOL in front of each Group 3 line.
    pub fn with_eols(mut self, eol: bool) -> Self {
        self.eol = eol;
        self
    }

    /// Bytes per input row.
    pub fn stride(&self) -> usize {
        stride_for(self.width, 1, 1)
    }

    /// Matching decoder options.
    pub fn decode_options(&self) -> FaxOptions {
        FaxOptions::new(self.width, self.coding)
            .with_g3_options(self.g3)
            .with_fill_order(self.fill_order)
            .with_byte_alignment(self.byte_aligned)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(FaxError::invalid_input("line width must be non-zero"));
        }
        if self.coding == Coding::Group3TwoD && self.k == 0 {
            return Err(FaxError::invalid_input("k must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t4_options_bits() {
        let options = G3Options::from_bits_truncate(5);
        assert!(options.contains(G3Options::TWO_DIMENSIONAL));
        assert!(options.contains(G3Options::FILL_BITS));
        assert!(!options.contains(G3Options::UNCOMPRESSED));
        assert_eq!(Coding::from_t4_options(options), Coding::Group3TwoD);
        assert_eq!(Coding::from_t4_options(G3Options::empty()), Coding::Group3OneD);
    }

    #[test]
    fn test_builder() {
        let options = FaxOptions::new(1728, Coding::Group4)
            .with_policy(ErrorPolicy::Tolerant)
            .with_fill_order(FillOrder::LsbToMsb);
        assert_eq!(options.stride(), 216);
        assert!(options.policy.is_tolerant());
        assert!(options.validate().is_ok());
        assert!(FaxOptions::new(0, Coding::Group4).validate().is_err());
    }

    #[test]
    fn test_encode_validation() {
        let options = EncodeOptions::new(8, Coding::Group3TwoD).with_k(0);
        assert!(options.validate().is_err());
        assert_eq!(options.decode_options().coding, Coding::Group3TwoD);
    }
}
