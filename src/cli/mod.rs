//! Command-line interface for chroma-compare.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **extract**: Call the base sequence of one chromatogram image
//! - **compare**: Extract two images and compare their sequences
//! - **match**: Compare two sequences given on the command line
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Call bases from an image and save the rendered trace
//! chroma-compare extract run1.png --png-out run1_trace.png
//!
//! # Compare two runs, calling bases at peaks only
//! chroma-compare compare run1.png run2.png --peaks
//!
//! # JSON output for scripting
//! chroma-compare match ACGTACGT ACGT --format json
//!
//! # Start the API
//! chroma-compare serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};

use crate::calling::base_caller::{
    CallingStrategy, DEFAULT_MIN_PEAK_DISTANCE, DEFAULT_MIN_PEAK_HEIGHT,
};
use crate::calling::threshold::{IntensityThresholds, DEFAULT_CHANNEL_THRESHOLD};
use crate::decoding::decoder::{DecoderConfig, LaneRow, DEFAULT_STRIDE};
use crate::pipeline::extraction::PipelineConfig;

pub mod compare;
pub mod extract;
pub mod search;

#[derive(Parser)]
#[command(name = "chroma-compare")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Call bases from chromatogram images and compare the sequences")]
#[command(
    long_about = "chroma-compare reads four-channel fluorescent chromatogram images, calls a base at every sample from the dominant dye, and compares two called sequences.\n\nEach comparison reports:\n- A positional match percentage\n- KMP and Rabin-Karp occurrences of the shorter sequence in the longer one\n- Per-algorithm wall-clock time and complexity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Call the base sequence of a chromatogram image
    Extract(extract::ExtractArgs),

    /// Extract two chromatogram images and compare their sequences
    Compare(compare::CompareArgs),

    /// Compare two nucleotide sequences directly
    #[command(name = "match")]
    Match(search::MatchArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Decoder and base caller options shared by every command that reads images
#[derive(clap::Args, Debug, Clone)]
pub struct CallingArgs {
    /// Pixel row read as the lane: 'middle' or a row index
    #[arg(long, default_value = "middle")]
    pub lane_row: LaneRow,

    /// Sample every Nth pixel column
    #[arg(long, default_value_t = DEFAULT_STRIDE, value_parser = parse_stride)]
    pub stride: usize,

    /// Call bases only at intensity peaks instead of at every sample
    #[arg(long)]
    pub peaks: bool,

    /// Minimum normalized height of a peak (with --peaks)
    #[arg(long, default_value_t = DEFAULT_MIN_PEAK_HEIGHT)]
    pub min_peak_height: f64,

    /// Minimum number of samples between peaks of one channel (with --peaks)
    #[arg(long, default_value_t = DEFAULT_MIN_PEAK_DISTANCE)]
    pub min_peak_distance: usize,

    /// Minimum red value (0-255) for the intensity sequence to read A
    #[arg(long, default_value_t = DEFAULT_CHANNEL_THRESHOLD)]
    pub red_threshold: u8,

    /// Minimum green value (0-255) for the intensity sequence to read T
    #[arg(long, default_value_t = DEFAULT_CHANNEL_THRESHOLD)]
    pub green_threshold: u8,

    /// Minimum blue value (0-255) for the intensity sequence to read C
    #[arg(long, default_value_t = DEFAULT_CHANNEL_THRESHOLD)]
    pub blue_threshold: u8,
}

impl CallingArgs {
    #[must_use]
    pub fn to_config(&self) -> PipelineConfig {
        let strategy = if self.peaks {
            CallingStrategy::Peaks {
                min_height: self.min_peak_height,
                min_distance: self.min_peak_distance,
            }
        } else {
            CallingStrategy::EverySample
        };

        PipelineConfig {
            decoder: DecoderConfig {
                lane_row: self.lane_row,
                stride: self.stride,
            },
            strategy,
            thresholds: IntensityThresholds {
                red: self.red_threshold,
                green: self.green_threshold,
                blue: self.blue_threshold,
            },
        }
    }
}

fn parse_stride(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("stride must be at least 1".to_string()),
        Ok(stride) => Ok(stride),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub calling: CallingArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
