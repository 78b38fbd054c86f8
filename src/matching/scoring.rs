use crate::core::sequence::NucleotideSequence;

/// Safely convert usize to f64 for percentage calculations
///
/// This function explicitly handles the precision loss that occurs when converting
/// usize to f64 on 64-bit platforms. Sequence lengths from chromatogram images
/// are well within the safe range of f64 mantissa precision.
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Positional identity of two sequences, in percent.
///
/// Compares `seq1[i]` with `seq2[i]` for every `i` below the length of the
/// shorter sequence and returns the share of identical positions. Returns 0
/// when either sequence is empty.
#[must_use]
pub fn basic_match_percentage(seq1: &NucleotideSequence, seq2: &NucleotideSequence) -> f64 {
    let min_len = seq1.len().min(seq2.len());
    if min_len == 0 {
        return 0.0;
    }

    let identical = seq1
        .iter()
        .zip(seq2.iter())
        .filter(|(a, b)| a == b)
        .count();

    count_to_f64(identical) / count_to_f64(min_len) * 100.0
}

/// Share of the text covered by pattern occurrences, in percent.
///
/// Computed as `matches * pattern_len / text_len * 100` and clamped to
/// `[0, 100]`, so overlapping occurrences cannot exceed full coverage.
/// Returns 0 for an empty pattern or text.
#[must_use]
pub fn coverage_percentage(matches: usize, pattern_len: usize, text_len: usize) -> f64 {
    if pattern_len == 0 || text_len == 0 {
        return 0.0;
    }

    let covered = count_to_f64(matches) * count_to_f64(pattern_len) / count_to_f64(text_len);
    (covered * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> NucleotideSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_basic_match_identical() {
        assert!((basic_match_percentage(&seq("ACGT"), &seq("ACGT")) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_basic_match_disjoint() {
        assert!(basic_match_percentage(&seq("AAAA"), &seq("TTTT")).abs() < 1e-9);
    }

    #[test]
    fn test_basic_match_uses_shorter_length() {
        // Positions 0..4: A=A, C=C, G!=T, T=T -> 3/4
        let p = basic_match_percentage(&seq("ACGTACGT"), &seq("ACTT"));
        assert!((p - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_basic_match_empty() {
        assert!(basic_match_percentage(&seq(""), &seq("ACGT")).abs() < 1e-9);
        assert!(basic_match_percentage(&seq(""), &seq("")).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_percentage() {
        assert!((coverage_percentage(2, 4, 8) - 100.0).abs() < 1e-9);
        assert!((coverage_percentage(1, 2, 8) - 25.0).abs() < 1e-9);
        assert!(coverage_percentage(0, 4, 8).abs() < 1e-9);
        assert!(coverage_percentage(3, 0, 8).abs() < 1e-9);
        assert!(coverage_percentage(3, 2, 0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_percentage_is_clamped() {
        // "AA" occurs twice in "AAA", covering 4/3 of the text
        assert!((coverage_percentage(2, 2, 3) - 100.0).abs() < 1e-9);
    }
}
