//! Image geometry and decode parameters.

use oxifax_core::bitstream::FillOrder;
use oxifax_core::policy::ErrorPolicy;
use oxifax_core::raster::stride_for;
use oxifax_lzw::{ByteOrder, SampleLayout};

use crate::error::{ImageError, Result};

/// Geometry and interpretation of one image's strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeParams {
    /// Pixels per row.
    pub width: usize,
    /// Rows in the image.
    pub height: usize,
    /// Rows per strip; `None` means one strip holds the whole image.
    pub rows_per_strip: Option<usize>,
    /// Interleaved samples per pixel.
    pub samples_per_pixel: usize,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Bit order within each stored byte.
    pub fill_order: FillOrder,
    /// Byte order of 16-bit samples.
    pub byte_order: ByteOrder,
    /// Reaction to malformed fax lines.
    pub policy: ErrorPolicy,
    /// Invert decoded samples (min-is-black data).
    pub invert: bool,
}

impl DecodeParams {
    /// Bi-level image of `width` x `height` pixels in a single strip.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows_per_strip: None,
            samples_per_pixel: 1,
            bits_per_sample: 1,
            fill_order: FillOrder::MsbToLsb,
            byte_order: ByteOrder::BigEndian,
            policy: ErrorPolicy::Strict,
            invert: false,
        }
    }

    /// Split the image into strips of `rows` rows.
    pub fn with_rows_per_strip(mut self, rows: usize) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    /// Set samples per pixel and bits per sample.
    pub fn with_samples(mut self, samples_per_pixel: usize, bits_per_sample: u16) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.bits_per_sample = bits_per_sample;
        self
    }

    /// Set the fill order.
    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    /// Set the byte order of 16-bit samples.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Invert decoded samples.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        stride_for(
            self.width,
            self.samples_per_pixel,
            usize::from(self.bits_per_sample),
        )
    }

    /// Bits of pixel data per row, padding excluded.
    pub fn row_bits(&self) -> usize {
        self.width * self.samples_per_pixel * usize::from(self.bits_per_sample)
    }

    /// Whether the image is one bit per pixel.
    pub fn is_bilevel(&self) -> bool {
        self.samples_per_pixel == 1 && self.bits_per_sample == 1
    }

    /// Effective rows per strip.
    pub fn strip_rows(&self) -> usize {
        self.rows_per_strip
            .filter(|&rows| rows > 0)
            .unwrap_or(self.height)
            .min(self.height)
            .max(1)
    }

    /// Number of strips the geometry calls for.
    pub fn strip_count(&self) -> usize {
        if self.height == 0 {
            0
        } else {
            self.height.div_ceil(self.strip_rows())
        }
    }

    /// Sample layout for LZW and the predictor.
    pub fn sample_layout(&self) -> SampleLayout {
        SampleLayout::new(self.width, self.samples_per_pixel)
            .with_bits_per_sample(self.bits_per_sample)
            .with_byte_order(self.byte_order)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 || self.samples_per_pixel == 0 || self.bits_per_sample == 0 {
            return Err(ImageError::invalid_geometry(format!(
                "width {}, samples per pixel {} and bits per sample {} must be non-zero",
                self.width, self.samples_per_pixel, self.bits_per_sample
            )));
        }
        Ok(())
    }
}
