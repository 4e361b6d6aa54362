//! LZW-specific error types.

use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// A code names a table slot that is not populated yet (and is not the
    /// slot about to be filled).
    #[error("Invalid LZW code: {0}")]
    InvalidCode(u16),

    /// Invalid maximum bit width specified.
    #[error("Invalid bit width: {0} (must be 9-12)")]
    InvalidBitWidth(u8),

    /// Horizontal differencing is only defined for 8- and 16-bit samples.
    #[error("Predictor not supported for {bits_per_sample}-bit samples")]
    UnsupportedPredictor {
        /// Bits per sample of the data.
        bits_per_sample: u16,
    },

    /// Width or samples per pixel is zero.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the problem.
        message: String,
    },
}

impl LzwError {
    pub(crate) fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;
