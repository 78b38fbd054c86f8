//! Core data types for chromatogram base calling and sequence comparison.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Nucleotide`]: One of the four DNA bases, with the fixed tie-break priority
//! - [`NucleotideSequence`]: An immutable, validated sequence of bases
//! - [`NucleotideCounts`]: Per-base tallies of a sequence
//! - [`IntensityTrace`]: Four aligned dye-channel intensity traces
//!
//! ## Dye Channels
//!
//! Four-colour chromatograms carry one dye per base:
//!
//! | Base | Dye    | Image channel        |
//! |------|--------|----------------------|
//! | A    | red    | R                    |
//! | T    | green  | G                    |
//! | C    | blue   | B                    |
//! | G    | yellow | mean of R and G      |
//!
//! [`Nucleotide`]: types::Nucleotide
//! [`NucleotideSequence`]: sequence::NucleotideSequence
//! [`NucleotideCounts`]: sequence::NucleotideCounts
//! [`IntensityTrace`]: trace::IntensityTrace

pub mod sequence;
pub mod trace;
pub mod types;
