//! # OxiFax-CCITT: Group 3 and Group 4 fax coding
//!
//! Decoder and encoder for the bi-level image codings of ITU-T T.4
//! (Group 3, one- and two-dimensional) and T.6 (Group 4), as found in TIFF
//! compression types 2, 3 and 4 and PDF `CCITTFaxDecode` streams.
//!
//! ## Features
//!
//! - **Table-driven**: run-length and mode codes resolve through small
//!   lookup tables built at compile time from the code lists
//! - **Changing elements**: lines are held as run-end positions, so b1/b2
//!   searches and materialization are linear in the number of changes
//! - **Error policy**: strict decoding aborts on the first malformed line;
//!   tolerant decoding blanks it and resumes at the next EOL
//! - **Strip continuation**: a [`FaxDecoder`] keeps its reference line
//!   between calls
//! - **Uncompressed mode** (T.4 extension `0000001111`)
//!
//! ## Example
//!
//! ```rust
//! use oxifax_ccitt::{Coding, EncodeOptions, decode, encode};
//!
//! // 16x2 image: a black bar in the middle of each row.
//! let image = [0x0F, 0xF0, 0x0F, 0xF0];
//! let options = EncodeOptions::new(16, Coding::Group4);
//! let coded = encode(&image, options).unwrap();
//!
//! let (decoded, report) = decode(&coded, options.decode_options(), 2).unwrap();
//! assert_eq!(decoded, image);
//! assert_eq!(report.rows_decoded, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod color;
mod decoder;
mod encoder;
mod error;
pub mod line;
pub mod mode;
mod options;
mod scanline;
pub mod tables;

pub use color::Color;
pub use decoder::{FaxDecoder, decode};
pub use encoder::{FaxEncoder, encode};
pub use error::{FaxError, Result};
pub use options::{Coding, EncodeOptions, FaxOptions, G3Options, T6_UNCOMPRESSED};

pub use oxifax_core::bitstream::FillOrder;
pub use oxifax_core::policy::{DecodeReport, ErrorPolicy, StopReason};
