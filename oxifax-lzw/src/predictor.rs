//! Horizontal-differencing predictor (TIFF `Predictor = 2`).
//!
//! Each sample is stored as the difference from the same channel one pixel
//! to the left. Reconstruction walks each row left to right adding the
//! sample `samples_per_pixel` positions earlier; the first pixel of a row is
//! stored as is. Arithmetic wraps modulo the sample size.

use oxifax_core::raster::stride_for;

use crate::error::{LzwError, Result};

/// Prediction scheme applied before LZW coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predictor {
    /// Samples are stored unchanged.
    #[default]
    None,
    /// Horizontal differencing.
    Horizontal,
}

impl Predictor {
    /// Interpret a TIFF `Predictor` tag value. Floating point prediction
    /// (3) is not supported.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(Predictor::None),
            2 => Some(Predictor::Horizontal),
            _ => None,
        }
    }
}

/// Byte order of 16-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Most significant byte first (TIFF `MM`).
    #[default]
    BigEndian,
    /// Least significant byte first (TIFF `II`).
    LittleEndian,
}

impl ByteOrder {
    fn read(self, pair: &[u8]) -> u16 {
        let bytes = [pair[0], pair[1]];
        match self {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        }
    }

    fn write(self, pair: &mut [u8], value: u16) {
        let bytes = match self {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        pair.copy_from_slice(&bytes);
    }
}

/// Row geometry of predicted sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleLayout {
    /// Pixels per row.
    pub width: usize,
    /// Interleaved channels per pixel.
    pub samples_per_pixel: usize,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Byte order of 16-bit samples.
    pub byte_order: ByteOrder,
}

impl SampleLayout {
    /// Layout of 8-bit samples.
    pub fn new(width: usize, samples_per_pixel: usize) -> Self {
        Self {
            width,
            samples_per_pixel,
            bits_per_sample: 8,
            byte_order: ByteOrder::BigEndian,
        }
    }

    /// Set bits per sample.
    pub fn with_bits_per_sample(mut self, bits_per_sample: u16) -> Self {
        self.bits_per_sample = bits_per_sample;
        self
    }

    /// Set the byte order of 16-bit samples.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
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

    /// Check that horizontal differencing is defined for this layout.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.samples_per_pixel == 0 {
            return Err(LzwError::invalid_geometry(format!(
                "width {} and samples per pixel {} must be non-zero",
                self.width, self.samples_per_pixel
            )));
        }
        if !matches!(self.bits_per_sample, 8 | 16) {
            return Err(LzwError::UnsupportedPredictor {
                bits_per_sample: self.bits_per_sample,
            });
        }
        Ok(())
    }
}

/// Undo horizontal differencing in place.
///
/// A trailing partial row is reconstructed as far as it goes.
pub fn reverse_horizontal_differencing(data: &mut [u8], layout: SampleLayout) -> Result<()> {
    layout.validate()?;
    let spp = layout.samples_per_pixel;
    for row in data.chunks_mut(layout.stride()) {
        match layout.bits_per_sample {
            8 => {
                for i in spp..row.len() {
                    row[i] = row[i].wrapping_add(row[i - spp]);
                }
            }
            _ => {
                let samples = row.len() / 2;
                for i in spp..samples {
                    let left = layout.byte_order.read(&row[2 * (i - spp)..]);
                    let value = layout.byte_order.read(&row[2 * i..]);
                    layout
                        .byte_order
                        .write(&mut row[2 * i..2 * i + 2], value.wrapping_add(left));
                }
            }
        }
    }
    Ok(())
}

/// Apply horizontal differencing in place; the inverse of
/// [`reverse_horizontal_differencing`].
pub fn apply_horizontal_differencing(data: &mut [u8], layout: SampleLayout) -> Result<()> {
    layout.validate()?;
    let spp = layout.samples_per_pixel;
    for row in data.chunks_mut(layout.stride()) {
        match layout.bits_per_sample {
            8 => {
                for i in (spp..row.len()).rev() {
                    row[i] = row[i].wrapping_sub(row[i - spp]);
                }
            }
            _ => {
                let samples = row.len() / 2;
                for i in (spp..samples).rev() {
                    let left = layout.byte_order.read(&row[2 * (i - spp)..]);
                    let value = layout.byte_order.read(&row[2 * i..]);
                    layout
                        .byte_order
                        .write(&mut row[2 * i..2 * i + 2], value.wrapping_sub(left));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_gray() {
        let mut data = vec![10, 1, 1, 1, 20, 255, 0, 2];
        reverse_horizontal_differencing(&mut data, SampleLayout::new(4, 1)).unwrap();
        assert_eq!(data, vec![10, 11, 12, 13, 20, 19, 19, 21]);
    }

    #[test]
    fn test_reverse_rgb_channels_independent() {
        // Two RGB pixels per row.
        let mut data = vec![100, 50, 0, 1, 2, 3];
        reverse_horizontal_differencing(&mut data, SampleLayout::new(2, 3)).unwrap();
        assert_eq!(data, vec![100, 50, 0, 101, 52, 3]);
    }

    #[test]
    fn test_16bit_both_byte_orders() {
        let layout = SampleLayout::new(3, 1).with_bits_per_sample(16);
        let mut big = vec![0x01, 0x00, 0x00, 0x10, 0xFF, 0xFF];
        reverse_horizontal_differencing(&mut big, layout).unwrap();
        assert_eq!(big, vec![0x01, 0x00, 0x01, 0x10, 0x01, 0x0F]);

        let layout = layout.with_byte_order(ByteOrder::LittleEndian);
        let mut little = vec![0x00, 0x01, 0x10, 0x00, 0xFF, 0xFF];
        reverse_horizontal_differencing(&mut little, layout).unwrap();
        assert_eq!(little, vec![0x00, 0x01, 0x10, 0x01, 0x0F, 0x01]);
    }

    #[test]
    fn test_apply_then_reverse() {
        let original: Vec<u8> = (0..60u32).map(|i| (i * 37 % 251) as u8).collect();
        for layout in [
            SampleLayout::new(10, 3),
            SampleLayout::new(5, 3).with_bits_per_sample(16),
            SampleLayout::new(15, 2)
                .with_bits_per_sample(16)
                .with_byte_order(ByteOrder::LittleEndian),
        ] {
            let mut data = original.clone();
            apply_horizontal_differencing(&mut data, layout).unwrap();
            assert_ne!(data, original);
            reverse_horizontal_differencing(&mut data, layout).unwrap();
            assert_eq!(data, original);
        }
    }

    #[test]
    fn test_partial_last_row() {
        let mut data = vec![1, 1, 1, 5, 1];
        reverse_horizontal_differencing(&mut data, SampleLayout::new(3, 1)).unwrap();
        assert_eq!(data, vec![1, 2, 3, 5, 6]);
    }

    #[test]
    fn test_unsupported_sample_size() {
        let layout = SampleLayout::new(8, 1).with_bits_per_sample(4);
        assert!(matches!(
            reverse_horizontal_differencing(&mut [0; 4], layout),
            Err(LzwError::UnsupportedPredictor { bits_per_sample: 4 })
        ));
        assert!(matches!(
            apply_horizontal_differencing(&mut [0; 4], SampleLayout::new(0, 1)),
            Err(LzwError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_predictor_tag() {
        assert_eq!(Predictor::from_tag(1), Some(Predictor::None));
        assert_eq!(Predictor::from_tag(2), Some(Predictor::Horizontal));
        assert_eq!(Predictor::from_tag(3), None);
    }
}
