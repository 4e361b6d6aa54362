//! OxiFax CLI
//!
//! Decodes and encodes CCITT Group 3/Group 4, TIFF LZW and uncompressed
//! strips, converting to and from binary PBM.

mod commands;
mod pbm;

use clap::{Parser, Subcommand};
use commands::{CodingArgs, GeometryArgs, cmd_decode, cmd_encode, cmd_info};
use env_logger::Env;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxifax")]
#[command(author, version, about = "Pure Rust CCITT fax and TIFF LZW strip codec")]
#[command(long_about = "
OxiFax decodes raw compressed strips (as cut out of a TIFF or PDF) into PBM
images and encodes PBM images back into strips.

Examples:
  oxifax decode page.g4 page.pbm -W 1728 -H 2200
  oxifax decode page.g3 page.pbm -W 1728 -H 2200 -c g32d --fill-bits --tolerant
  oxifax encode page.pbm page.g4
  oxifax info page.g3 -W 1728 -H 2200 -c g3 --json

Set OXIFAX_LOG=debug to trace line resynchronization.
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw strip into a PBM image
    #[command(alias = "d")]
    Decode {
        /// Raw compressed strip
        input: PathBuf,

        /// Output PBM file (raw rows for multi-bit samples)
        output: PathBuf,

        #[command(flatten)]
        coding: CodingArgs,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Encode a PBM image into a raw strip
    #[command(alias = "e")]
    Encode {
        /// Input PBM file
        input: PathBuf,

        /// Output strip file
        output: PathBuf,

        #[command(flatten)]
        coding: CodingArgs,

        /// Invert pixels before encoding (min-is-black output)
        #[arg(long)]
        invert: bool,
    },

    /// Decode a raw strip and report what was found
    #[command(alias = "i")]
    Info {
        /// Raw compressed strip
        input: PathBuf,

        #[command(flatten)]
        coding: CodingArgs,

        #[command(flatten)]
        geometry: GeometryArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("OXIFAX_LOG"))
        .init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            coding,
            geometry,
        } => cmd_decode(&input, &output, &coding, &geometry),
        Commands::Encode {
            input,
            output,
            coding,
            invert,
        } => cmd_encode(&input, &output, &coding, invert),
        Commands::Info {
            input,
            coding,
            geometry,
            json,
        } => cmd_info(&input, &coding, &geometry, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
