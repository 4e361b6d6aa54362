//! # OxiFax-Image
//!
//! Whole-image decoding and encoding on top of the OxiFax codecs: picks the
//! codec from a [`Compression`] value, decodes each strip into its rows of
//! one image buffer and merges the per-strip diagnostics.
//!
//! ## Features
//!
//! - **Closed compression selector**: uncompressed, modified Huffman,
//!   Group 3 1D/2D, Group 4 and LZW with predictor, built from TIFF tag
//!   values with [`Compression::from_tiff`]
//! - **Strip reassembly**: Group 4 strips share the reference line; other
//!   strips are independent (and parallel with the `parallel` feature)
//! - **Fallback**: a tolerant Group 4 decode that cannot resynchronize is
//!   retried with the strips joined, and with each strip restarted
//! - **serde** feature: serializable compression, parameters and reports
//!
//! ## Example
//!
//! ```rust
//! use oxifax_image::{Compression, DecodeParams, decode_strips, encode_strips};
//!
//! let params = DecodeParams::new(16, 4).with_rows_per_strip(2);
//! let rows = vec![0x0F, 0xF0, 0x00, 0x00, 0xFF, 0xFF, 0x80, 0x01];
//! let compression = Compression::Group4 { uncompressed: false };
//!
//! let strips = encode_strips(&rows, compression, &params).unwrap();
//! assert_eq!(strips.len(), 2);
//!
//! let strips: Vec<&[u8]> = strips.iter().map(Vec::as_slice).collect();
//! let image = decode_strips(&strips, compression, &params).unwrap();
//! assert_eq!(image.data, rows);
//! assert_eq!(image.report.rows_decoded, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod compression;
mod decode;
mod encode;
mod error;
mod params;

pub use compression::Compression;
pub use decode::{DecodedImage, decode, decode_strips};
pub use encode::{encode, encode_strips};
pub use error::{ImageError, Result};
pub use params::DecodeParams;

pub use oxifax_ccitt::G3Options;
pub use oxifax_core::{DecodeReport, ErrorPolicy, FillOrder, StopReason};
pub use oxifax_lzw::{ByteOrder, Predictor};
