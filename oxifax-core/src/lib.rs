//! # OxiFax Core
//!
//! Core components shared by the OxiFax codecs.
//!
//! - [`bitstream`]: MSB-first bit cursor and bit writer with TIFF fill order
//! - [`raster`]: packed 1-bit row buffers and run filling
//! - [`policy`]: error-recovery policy and per-decode diagnostics
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Image                                               │
//! │     Compression selector, strip reassembly, CLI         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     CCITT Group 3 / Group 4, TIFF LZW + predictor       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitCursor/BitWriter, packed rows, decode policy     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxifax_core::bitstream::{BitCursor, BitWriter, FillOrder};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b000000000001, 12);
//! let data = writer.finish(FillOrder::MsbToLsb);
//!
//! let mut cursor = BitCursor::new(&data);
//! assert_eq!(cursor.read_bits(3), 0b101);
//! assert_eq!(cursor.read_bits(12), 1);
//! // Past the end the cursor yields zero bits.
//! assert_eq!(cursor.read_bits(13), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod policy;
pub mod raster;

pub use bitstream::{BitCursor, BitWriter, FillOrder};
pub use error::{CoreError, Result};
pub use policy::{DecodeReport, ErrorPolicy, StopReason};
pub use raster::Bitmap;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitCursor, BitWriter, FillOrder};
    pub use crate::error::{CoreError, Result};
    pub use crate::policy::{DecodeReport, ErrorPolicy, StopReason};
    pub use crate::raster::Bitmap;
}
