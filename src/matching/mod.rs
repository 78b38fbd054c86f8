//! Exact-match comparison of called sequences.
//!
//! This module provides the comparator:
//!
//! - [`ComparisonAggregator`]: Main entry point; compares two sequences
//! - [`MatchAlgorithm`]: The common capability of every search algorithm
//! - [`Algorithm`]: The closed set of algorithms, selected by enumeration
//! - [`ReportRecord`]: The fields a report store persists for a comparison
//!
//! ## Comparison
//!
//! For a pair of sequences the aggregator reports:
//!
//! 1. **Basic match**: positional identity up to the shorter length
//! 2. **KMP**: occurrences of the shorter sequence in the longer one,
//!    found with a prefix table in O(n+m)
//! 3. **Rabin-Karp**: the same occurrences, found with a rolling hash and
//!    verified symbol by symbol
//!
//! Both algorithms always return the same positions; they differ only in
//! `time_taken` and the complexity label. The match percentage is the share
//! of the longer sequence covered by occurrences, clamped to 100.
//!
//! ## Example
//!
//! ```rust
//! use chroma_compare::matching::engine::ComparisonAggregator;
//!
//! let result = ComparisonAggregator::new()
//!     .compare_raw("ACGTACGT", "ACGT")
//!     .unwrap();
//! assert_eq!(result.kmp.matched_positions, vec![0, 4]);
//! assert_eq!(result.kmp.matched_positions, result.rabin_karp.matched_positions);
//! ```
//!
//! [`ComparisonAggregator`]: engine::ComparisonAggregator
//! [`MatchAlgorithm`]: algorithm::MatchAlgorithm
//! [`Algorithm`]: algorithm::Algorithm
//! [`ReportRecord`]: report::ReportRecord

pub mod algorithm;
pub mod engine;
pub mod kmp;
pub mod rabin_karp;
pub mod report;
pub mod scoring;
