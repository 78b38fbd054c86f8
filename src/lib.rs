//! # chroma-compare
//!
//! A library for calling DNA sequences from fluorescent chromatogram images and
//! comparing two called sequences with exact pattern matching.
//!
//! A four-dye chromatogram records one intensity channel per base. This crate
//! reads the channels from the lane row of an image, calls the base whose dye
//! dominates each sample, and compares two resulting sequences with both KMP
//! and Rabin-Karp so the two searches cross-check each other.
//!
//! ## Features
//!
//! - **Image decoding**: PNG, JPEG, BMP and GIF lanes to four normalized channels
//! - **Base calling**: argmax per sample with a fixed A > C > G > T tie-break,
//!   or at intensity peaks only
//! - **Chromatogram rendering**: the decoded trace as a PNG line plot
//! - **Dual-algorithm comparison**: KMP and Rabin-Karp occurrences, match
//!   percentages and isolated timings, plus a positional match score
//!
//! ## Example
//!
//! ```rust
//! use chroma_compare::{ComparisonAggregator, NucleotideSequence};
//!
//! let seq1: NucleotideSequence = "ACGTACGT".parse().unwrap();
//! let seq2: NucleotideSequence = "ACGT".parse().unwrap();
//!
//! let result = ComparisonAggregator::new().compare(&seq1, &seq2);
//! assert_eq!(result.kmp.matched_positions, vec![0, 4]);
//! assert!(result.algorithms_agree());
//! println!("KMP covered {:.1}% in {:.6}s", result.kmp.match_percentage, result.kmp.time_taken);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Nucleotides, sequences, counts and intensity traces
//! - [`decoding`]: Image to intensity trace, and trace to PNG plot
//! - [`calling`]: Intensity trace to base calls
//! - [`matching`]: KMP, Rabin-Karp and the comparison aggregator
//! - [`pipeline`]: Decode, call and render one or two images
//! - [`workflow`]: The upload, extract, compare state machine
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod calling;
pub mod cli;
pub mod core;
pub mod decoding;
pub mod matching;
pub mod pipeline;
pub mod utils;
pub mod web;
pub mod workflow;

// Re-export commonly used types for convenience
pub use calling::base_caller::{BaseCaller, CallingStrategy, NoSignalError};
pub use calling::threshold::IntensityThresholds;
pub use core::sequence::{InvalidSequenceError, NucleotideCounts, NucleotideSequence};
pub use core::trace::IntensityTrace;
pub use core::types::*;
pub use decoding::decoder::{ChromatogramDecoder, DecodeError};
pub use matching::algorithm::{Algorithm, MatchAlgorithm, MatchResult};
pub use matching::engine::{ComparisonAggregator, ComparisonResult};
pub use pipeline::extraction::{Extraction, ExtractionError, ExtractionPipeline};
