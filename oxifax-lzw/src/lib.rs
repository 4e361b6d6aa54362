//! # OxiFax-LZW: TIFF LZW Compression
//!
//! LZW (Lempel-Ziv-Welch) decoding and encoding as used by TIFF
//! compression 5, with the horizontal-differencing predictor that usually
//! accompanies it.
//!
//! ## Features
//!
//! - **MSB-first codes** of 9 to 12 bits with early code change
//! - **Clear code** (256) resets the table; **end code** (257) stops decoding
//! - **Arena string table**: one append-only table of `(prefix, byte)` pairs
//! - **Truncation tolerant**: a stream that ends without an end code keeps
//!   everything decoded so far
//! - **Predictor**: horizontal differencing for 8- and 16-bit samples
//!
//! ## Example
//!
//! ```rust
//! use oxifax_lzw::{compress, decompress};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed, original.len()).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! With a predictor:
//!
//! ```rust
//! use oxifax_lzw::{SampleLayout, apply_horizontal_differencing, compress, decompress,
//!     reverse_horizontal_differencing};
//!
//! let layout = SampleLayout::new(4, 1);
//! let image = vec![10u8, 11, 12, 13, 20, 21, 22, 23];
//!
//! let mut differenced = image.clone();
//! apply_horizontal_differencing(&mut differenced, layout).unwrap();
//! let compressed = compress(&differenced).unwrap();
//!
//! let mut decoded = decompress(&compressed, image.len()).unwrap();
//! reverse_horizontal_differencing(&mut decoded, layout).unwrap();
//! assert_eq!(decoded, image);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;
mod predictor;

pub use config::{CLEAR_CODE, EOI_CODE, FIRST_CODE, LzwConfig, MIN_CODE_BITS};
pub use decoder::LzwDecoder;
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};
pub use predictor::{
    ByteOrder, Predictor, SampleLayout, apply_horizontal_differencing,
    reverse_horizontal_differencing,
};

/// Decompress a TIFF LZW stream into at most `expected_size` bytes.
pub fn decompress(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(LzwConfig::TIFF)?;
    decoder.decode(data, expected_size)
}

/// Compress data as a TIFF LZW stream.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(LzwConfig::TIFF)?;
    encoder.encode(data)
}

/// Decompress predicted sample data and undo the predictor.
///
/// The output holds `rows` rows of `layout.stride()` bytes; a short stream
/// leaves the remaining bytes zero.
pub fn decompress_image(
    data: &[u8],
    layout: SampleLayout,
    rows: usize,
    predictor: Predictor,
) -> Result<Vec<u8>> {
    let size = layout.stride() * rows;
    let mut output = decompress(data, size)?;
    let produced = output.len();
    if predictor == Predictor::Horizontal {
        reverse_horizontal_differencing(&mut output, layout)?;
    }
    if produced < size {
        log::debug!("LZW strip produced {} of {} bytes", produced, size);
    }
    output.resize(size, 0);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_image_pads_short_strip() {
        let layout = SampleLayout::new(3, 1);
        let compressed = compress(&[1, 1, 1]).unwrap();
        let image = decompress_image(&compressed, layout, 2, Predictor::Horizontal).unwrap();
        assert_eq!(image, vec![1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn test_decompress_image_without_predictor() {
        let layout = SampleLayout::new(2, 2);
        let data = [9u8, 8, 7, 6, 5, 4, 3, 2];
        let compressed = compress(&data).unwrap();
        let image = decompress_image(&compressed, layout, 2, Predictor::None).unwrap();
        assert_eq!(image, data);
    }
}
