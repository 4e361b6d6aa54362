//! Compression selector.

use oxifax_ccitt::{Coding, EncodeOptions, FaxOptions, G3Options, T6_UNCOMPRESSED};
use oxifax_lzw::Predictor;

use crate::error::{ImageError, Result};
use crate::params::DecodeParams;

/// How strip data is compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compression {
    /// Packed samples stored as is (TIFF 1).
    #[default]
    None,
    /// CCITT modified Huffman: 1D lines, each starting on a byte boundary,
    /// no EOLs (TIFF 2).
    ModifiedHuffman,
    /// Group 3 one-dimensional coding (TIFF 3 with `T4Options` bit 0 clear).
    Group3OneD(G3Options),
    /// Group 3 two-dimensional coding (TIFF 3 with `T4Options` bit 0 set).
    Group3TwoD(G3Options),
    /// Group 4 (TIFF 4).
    Group4 {
        /// Uncompressed-mode extensions may appear.
        uncompressed: bool,
    },
    /// LZW (TIFF 5).
    Lzw(Predictor),
}

impl Compression {
    /// Select a decoder from TIFF tag values.
    ///
    /// `options` is the `T4Options` value for compression 3 and the
    /// `T6Options` value for compression 4; `predictor` only matters for
    /// compression 5.
    pub fn from_tiff(code: u16, options: u32, predictor: u16) -> Result<Self> {
        match code {
            1 => Ok(Compression::None),
            2 => Ok(Compression::ModifiedHuffman),
            3 => {
                let g3 = G3Options::from_bits_truncate(options);
                Ok(match Coding::from_t4_options(g3) {
                    Coding::Group3TwoD => Compression::Group3TwoD(g3),
                    _ => Compression::Group3OneD(g3),
                })
            }
            4 => Ok(Compression::Group4 {
                uncompressed: options & T6_UNCOMPRESSED != 0,
            }),
            5 => Predictor::from_tag(predictor)
                .map(Compression::Lzw)
                .ok_or(ImageError::UnsupportedPredictor { tag: predictor }),
            _ => Err(ImageError::UnsupportedCompression { code }),
        }
    }

    /// TIFF `Compression` tag value.
    pub fn tiff_code(&self) -> u16 {
        match self {
            Compression::None => 1,
            Compression::ModifiedHuffman => 2,
            Compression::Group3OneD(_) | Compression::Group3TwoD(_) => 3,
            Compression::Group4 { .. } => 4,
            Compression::Lzw(_) => 5,
        }
    }

    /// Whether this is one of the CCITT bi-level codings.
    pub fn is_fax(&self) -> bool {
        self.fax_coding().is_some()
    }

    /// Check that `params` describe samples this compression can carry.
    ///
    /// CCITT codings need one bit per pixel; the horizontal predictor needs
    /// 8- or 16-bit samples.
    pub fn check_params(&self, params: &DecodeParams) -> Result<()> {
        if self.is_fax() && !params.is_bilevel() {
            return Err(ImageError::invalid_geometry(format!(
                "CCITT coding needs 1 sample of 1 bit, got {} of {}",
                params.samples_per_pixel, params.bits_per_sample
            )));
        }
        if let Compression::Lzw(Predictor::Horizontal) = self {
            params.sample_layout().validate()?;
        }
        Ok(())
    }

    /// Whether strips depend on the previous strip's last line.
    pub fn strips_are_sequential(&self) -> bool {
        matches!(self, Compression::Group4 { .. })
    }

    fn fax_coding(&self) -> Option<(Coding, G3Options, bool)> {
        match *self {
            Compression::ModifiedHuffman => Some((Coding::Group3OneD, G3Options::empty(), true)),
            Compression::Group3OneD(g3) => Some((Coding::Group3OneD, g3, false)),
            Compression::Group3TwoD(g3) => Some((Coding::Group3TwoD, g3, false)),
            Compression::Group4 { uncompressed } => {
                let g3 = if uncompressed {
                    G3Options::UNCOMPRESSED
                } else {
                    G3Options::empty()
                };
                Some((Coding::Group4, g3, false))
            }
            Compression::None | Compression::Lzw(_) => None,
        }
    }

    /// Fax decoder options for this compression, if it is a fax coding.
    pub fn fax_options(&self, params: &DecodeParams) -> Option<FaxOptions> {
        let (coding, g3, byte_aligned) = self.fax_coding()?;
        Some(
            FaxOptions::new(params.width, coding)
                .with_g3_options(g3)
                .with_fill_order(params.fill_order)
                .with_policy(params.policy)
                .with_byte_alignment(byte_aligned),
        )
    }

    /// Fax encoder options for this compression, if it is a fax coding.
    pub fn encode_options(&self, params: &DecodeParams) -> Option<EncodeOptions> {
        let (coding, g3, byte_aligned) = self.fax_coding()?;
        let options = EncodeOptions::new(params.width, coding)
            .with_g3_options(g3)
            .with_fill_order(params.fill_order);
        Some(if byte_aligned {
            options
                .with_byte_alignment(true)
                .with_eols(false)
                .with_end_marker(false)
        } else {
            options
        })
    }
}
