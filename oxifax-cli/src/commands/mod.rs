//! Command implementations for OxiFax CLI.

pub mod decode;
pub mod encode;
pub mod info;

pub use decode::cmd_decode;
pub use encode::cmd_encode;
pub use info::cmd_info;

use clap::{Args, ValueEnum};
use oxifax_image::{
    Compression, DecodeParams, ErrorPolicy, FillOrder, G3Options, Predictor,
};

/// Strip compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scheme {
    /// Uncompressed packed rows
    None,
    /// Modified Huffman (TIFF compression 2)
    Mh,
    /// Group 3 one-dimensional
    G3,
    /// Group 3 two-dimensional
    G32d,
    /// Group 4
    G4,
    /// TIFF LZW
    Lzw,
}

/// Options shared by every command that handles strip data.
#[derive(Debug, Clone, Args)]
pub struct CodingArgs {
    /// Compression scheme
    #[arg(short, long, value_enum, default_value = "g4")]
    pub compression: Scheme,

    /// Group 3 EOLs are padded to end on a byte boundary
    #[arg(long)]
    pub fill_bits: bool,

    /// Uncompressed-mode extensions may appear (2D codings)
    #[arg(long)]
    pub uncompressed: bool,

    /// LZW data uses the horizontal-differencing predictor
    #[arg(long)]
    pub predictor: bool,

    /// Bits are stored least significant first (TIFF FillOrder 2)
    #[arg(long)]
    pub lsb: bool,
}

impl CodingArgs {
    pub fn compression(&self) -> Compression {
        let mut g3 = G3Options::empty();
        g3.set(G3Options::FILL_BITS, self.fill_bits);
        g3.set(G3Options::UNCOMPRESSED, self.uncompressed);
        match self.compression {
            Scheme::None => Compression::None,
            Scheme::Mh => Compression::ModifiedHuffman,
            Scheme::G3 => Compression::Group3OneD(g3),
            Scheme::G32d => Compression::Group3TwoD(g3 | G3Options::TWO_DIMENSIONAL),
            Scheme::G4 => Compression::Group4 {
                uncompressed: self.uncompressed,
            },
            Scheme::Lzw => Compression::Lzw(if self.predictor {
                Predictor::Horizontal
            } else {
                Predictor::None
            }),
        }
    }

    pub fn fill_order(&self) -> FillOrder {
        if self.lsb {
            FillOrder::LsbToMsb
        } else {
            FillOrder::MsbToLsb
        }
    }
}

/// Geometry of raw strip data.
#[derive(Debug, Clone, Args)]
pub struct GeometryArgs {
    /// Image width in pixels
    #[arg(short = 'W', long)]
    pub width: usize,

    /// Image height in rows
    #[arg(short = 'H', long)]
    pub height: usize,

    /// Samples per pixel
    #[arg(long, default_value_t = 1)]
    pub samples: usize,

    /// Bits per sample
    #[arg(long, default_value_t = 1)]
    pub bits: u16,

    /// Skip malformed lines instead of failing
    #[arg(short, long)]
    pub tolerant: bool,

    /// Invert the decoded samples
    #[arg(long)]
    pub invert: bool,
}

impl GeometryArgs {
    pub fn params(&self, coding: &CodingArgs) -> DecodeParams {
        DecodeParams::new(self.width, self.height)
            .with_samples(self.samples, self.bits)
            .with_fill_order(coding.fill_order())
            .with_policy(if self.tolerant {
                ErrorPolicy::Tolerant
            } else {
                ErrorPolicy::Strict
            })
            .with_invert(self.invert)
    }
}
