use serde::Serialize;

use crate::core::sequence::{InvalidSequenceError, NucleotideSequence};
use crate::matching::algorithm::{MatchAlgorithm, MatchResult};
use crate::matching::kmp::Kmp;
use crate::matching::rabin_karp::RabinKarp;
use crate::matching::scoring::basic_match_percentage;

/// Result of comparing two sequences with every algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Positional identity up to the shorter length, 0-100
    pub basic_match_percentage: f64,
    pub kmp: MatchResult,
    pub rabin_karp: MatchResult,
}

impl ComparisonResult {
    /// Both algorithms found the same occurrences
    #[must_use]
    pub fn algorithms_agree(&self) -> bool {
        self.kmp.matched_positions == self.rabin_karp.matched_positions
    }
}

/// Which input served as the search pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    Seq1,
    Seq2,
}

/// Pick the search pattern and text for a pair of sequences.
///
/// The shorter sequence is the pattern; on equal length `seq2` is.
#[must_use]
pub fn assign_roles<'a>(
    seq1: &'a NucleotideSequence,
    seq2: &'a NucleotideSequence,
) -> (PatternSource, &'a NucleotideSequence, &'a NucleotideSequence) {
    if seq2.len() <= seq1.len() {
        (PatternSource::Seq2, seq2, seq1)
    } else {
        (PatternSource::Seq1, seq1, seq2)
    }
}

/// Runs both exact-match algorithms over a pair of sequences.
///
/// The algorithms run one after the other, each in its own timing window,
/// so neither skews the other's `time_taken`.
#[derive(Debug, Clone, Default)]
pub struct ComparisonAggregator {
    kmp: Kmp,
    rabin_karp: RabinKarp,
}

impl ComparisonAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific Rabin-Karp configuration
    #[must_use]
    pub fn with_rabin_karp(rabin_karp: RabinKarp) -> Self {
        Self {
            kmp: Kmp,
            rabin_karp,
        }
    }

    /// Compare two validated sequences
    #[must_use]
    pub fn compare(
        &self,
        seq1: &NucleotideSequence,
        seq2: &NucleotideSequence,
    ) -> ComparisonResult {
        let basic_match_percentage = basic_match_percentage(seq1, seq2);
        let (source, pattern, text) = assign_roles(seq1, seq2);

        let kmp = self.kmp.find_all(pattern, text);
        let rabin_karp = self.rabin_karp.find_all(pattern, text);

        tracing::debug!(
            seq1_len = seq1.len(),
            seq2_len = seq2.len(),
            pattern = ?source,
            basic_match_percentage,
            kmp_matches = kmp.matched_positions.len(),
            kmp_time = kmp.time_taken,
            rabin_karp_matches = rabin_karp.matched_positions.len(),
            rabin_karp_time = rabin_karp.time_taken,
            "Compared sequences"
        );

        let result = ComparisonResult {
            basic_match_percentage,
            kmp,
            rabin_karp,
        };
        if !result.algorithms_agree() {
            tracing::error!("KMP and Rabin-Karp disagree on match positions");
        }
        result
    }

    /// Validate two raw sequences and compare them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` naming `seq1` or `seq2` if either contains a
    /// symbol outside {A, C, G, T}; neither algorithm runs in that case.
    pub fn compare_raw(&self, seq1: &str, seq2: &str) -> Result<ComparisonResult, InvalidSequenceError> {
        let seq1 = NucleotideSequence::parse_named("seq1", seq1)?;
        let seq2 = NucleotideSequence::parse_named("seq2", seq2)?;
        Ok(self.compare(&seq1, &seq2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> NucleotideSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_scenario_shorter_sequence_is_pattern() {
        let result = ComparisonAggregator::new().compare(&seq("ACGTACGT"), &seq("ACGT"));
        assert_eq!(result.kmp.matched_positions, vec![0, 4]);
        assert_eq!(result.rabin_karp.matched_positions, vec![0, 4]);
        assert!((result.kmp.match_percentage - 100.0).abs() < 1e-9);
        assert!((result.rabin_karp.match_percentage - 100.0).abs() < 1e-9);
        assert!((result.basic_match_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pattern_choice_is_symmetric() {
        let agg = ComparisonAggregator::new();
        let forward = agg.compare(&seq("ACGTACGT"), &seq("ACGT"));
        let reverse = agg.compare(&seq("ACGT"), &seq("ACGTACGT"));
        assert_eq!(forward.kmp.matched_positions, reverse.kmp.matched_positions);
        assert!((forward.kmp.match_percentage - reverse.kmp.match_percentage).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_disjoint_sequences() {
        let result = ComparisonAggregator::new().compare(&seq("AAAA"), &seq("TTTT"));
        assert!(result.basic_match_percentage.abs() < 1e-9);
        assert!(result.kmp.matched_positions.is_empty());
        assert!(result.rabin_karp.matched_positions.is_empty());
        assert!(result.kmp.match_percentage.abs() < 1e-9);
        assert!(result.rabin_karp.match_percentage.abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let agg = ComparisonAggregator::new();
        for (a, b) in [("", ""), ("", "ACGT"), ("ACGT", "")] {
            let result = agg.compare_raw(a, b).unwrap();
            assert!(result.basic_match_percentage.abs() < 1e-9);
            assert!(result.kmp.matched_positions.is_empty());
            assert!(result.rabin_karp.matched_positions.is_empty());
        }
    }

    #[test]
    fn test_equal_length_uses_seq2_as_pattern() {
        let (a, c) = (seq("AAAA"), seq("CCCC"));
        let (source, pattern, text) = assign_roles(&a, &c);
        assert_eq!(source, PatternSource::Seq2);
        assert_eq!(pattern.to_string(), "CCCC");
        assert_eq!(text.to_string(), "AAAA");
    }

    #[test]
    fn test_compare_raw_rejects_invalid_symbols() {
        let err = ComparisonAggregator::new()
            .compare_raw("ACGT", "ACXT")
            .unwrap_err();
        assert!(matches!(
            err,
            InvalidSequenceError::InvalidSymbol { ref input, position: 2, symbol: 'X' } if input == "seq2"
        ));
    }

    #[test]
    fn test_results_are_reproducible() {
        let agg = ComparisonAggregator::new();
        let first = agg.compare(&seq("ACGTTACGGACGT"), &seq("ACG"));
        for _ in 0..3 {
            let again = agg.compare(&seq("ACGTTACGGACGT"), &seq("ACG"));
            assert_eq!(again.kmp.matched_positions, first.kmp.matched_positions);
            assert_eq!(
                again.rabin_karp.matched_positions,
                first.rabin_karp.matched_positions
            );
            assert!((again.kmp.match_percentage - first.kmp.match_percentage).abs() < 1e-12);
            assert!(again.kmp.time_taken >= 0.0 && again.rabin_karp.time_taken >= 0.0);
        }
        assert_eq!(first.kmp.matched_positions, vec![0, 5, 9]);
    }

    #[test]
    fn test_comparison_serializes_boundary_shape() {
        let result = ComparisonAggregator::new().compare(&seq("ACGTACGT"), &seq("ACGT"));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["basic_match_percentage"].is_number());
        assert_eq!(json["kmp"]["matches"], serde_json::json!([0, 4]));
        assert_eq!(json["rabin_karp"]["matches"], serde_json::json!([0, 4]));
        assert_eq!(
            json["rabin_karp"]["complexity"],
            "O(n*m) worst case, O(n+m) average"
        );
    }
}
