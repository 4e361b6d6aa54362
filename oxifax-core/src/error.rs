//! Error types shared by the OxiFax crates.

use thiserror::Error;

/// Errors raised by buffer and geometry validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Buffer too small for the requested geometry.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Width, height or sample layout is unusable.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::buffer_too_small(16, 4);
        assert!(err.to_string().contains("need 16 bytes"));

        let err = CoreError::invalid_geometry("width is zero");
        assert!(err.to_string().contains("width is zero"));
    }
}
