//! CCITT-specific error types.

use oxifax_core::CoreError;
use thiserror::Error;

/// Group 3 / Group 4 coding errors.
///
/// Row indices are relative to the strip being decoded; bit positions are
/// offsets into that strip's data.
#[derive(Debug, Error)]
pub enum FaxError {
    /// Bits that match no run-length or mode code.
    #[error("Malformed code in row {row} at bit {bit_position}")]
    MalformedCode {
        /// Row being decoded.
        row: usize,
        /// Bit position of the offending code.
        bit_position: u64,
    },

    /// An EOL codeword in the middle of a scanline.
    #[error("Unexpected EOL in row {row} at bit {bit_position}")]
    PrematureEol {
        /// Row being decoded.
        row: usize,
        /// Bit position of the EOL.
        bit_position: u64,
    },

    /// A 2D-coded line with no valid line above it.
    #[error("Row {row} is 2D-coded but has no reference line")]
    MissingReferenceLine {
        /// Row being decoded.
        row: usize,
    },

    /// A run or vertical offset that ends past the line width.
    #[error("Row {row}: run reaches position {position}, past width {width}")]
    Overrun {
        /// Row being decoded.
        row: usize,
        /// Position the run would end at.
        position: usize,
        /// Line width.
        width: usize,
    },

    /// A vertical offset that moves left of a0.
    #[error("Row {row}: changing element {position} lies left of a0 = {a0}")]
    Backwards {
        /// Row being decoded.
        row: usize,
        /// Position of the decoded element.
        position: isize,
        /// Current coding position.
        a0: usize,
    },

    /// A Group 3 line that does not start with an EOL.
    #[error("Missing EOL before row {row} at bit {bit_position}")]
    MissingEol {
        /// Row being decoded.
        row: usize,
        /// Bit position where the EOL was expected.
        bit_position: u64,
    },

    /// An extension code other than uncompressed mode, or uncompressed mode
    /// when it was not enabled.
    #[error("Unsupported extension {code:#05b} in row {row}")]
    UnsupportedExtension {
        /// Row being decoded.
        row: usize,
        /// The three extension bits.
        code: u8,
    },

    /// Caller-supplied parameters or buffers are unusable.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for CCITT operations.
pub type Result<T> = std::result::Result<T, FaxError>;

impl FaxError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the error describes the coded data, as opposed to the
    /// caller's parameters. Only these can be skipped by a tolerant decode.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, Self::InvalidInput { .. } | Self::Core(_))
    }
}
