//! Error types for image-level decoding and encoding.

use oxifax_ccitt::FaxError;
use oxifax_core::CoreError;
use oxifax_lzw::LzwError;
use thiserror::Error;

/// Errors raised while decoding or encoding a whole image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// CCITT decode or encode failure.
    #[error(transparent)]
    Fax(#[from] FaxError),

    /// LZW decode or encode failure.
    #[error(transparent)]
    Lzw(#[from] LzwError),

    /// Buffer precondition failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Width, height or sample layout does not fit the compression.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the problem.
        message: String,
    },

    /// The number of strips does not match height and rows per strip.
    #[error("Expected {expected} strips, got {actual}")]
    StripCount {
        /// Strips implied by the geometry.
        expected: usize,
        /// Strips supplied.
        actual: usize,
    },

    /// TIFF compression code with no decoder here.
    #[error("Unsupported compression: {code}")]
    UnsupportedCompression {
        /// TIFF `Compression` tag value.
        code: u16,
    },

    /// TIFF predictor value with no decoder here.
    #[error("Unsupported predictor: {tag}")]
    UnsupportedPredictor {
        /// TIFF `Predictor` tag value.
        tag: u16,
    },
}

impl ImageError {
    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;
