use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::sequence::NucleotideSequence;
use crate::matching::engine::ComparisonResult;

/// The fields of a comparison report handed to a report store.
///
/// `id` stays `None` until a store assigns one; the core never persists reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub image1_name: String,
    pub image2_name: String,
    pub sequence1: NucleotideSequence,
    pub sequence2: NucleotideSequence,
    /// The positional (basic) match percentage
    pub peak_match_percentage: f64,
    pub kmp_time: f64,
    pub kmp_match_percentage: f64,
    pub rabin_karp_time: f64,
    pub rabin_karp_match_percentage: f64,
}

impl ReportRecord {
    #[must_use]
    pub fn new(
        image1_name: impl Into<String>,
        image2_name: impl Into<String>,
        sequence1: NucleotideSequence,
        sequence2: NucleotideSequence,
        comparison: &ComparisonResult,
    ) -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            image1_name: image1_name.into(),
            image2_name: image2_name.into(),
            sequence1,
            sequence2,
            peak_match_percentage: comparison.basic_match_percentage,
            kmp_time: comparison.kmp.time_taken,
            kmp_match_percentage: comparison.kmp.match_percentage,
            rabin_karp_time: comparison.rabin_karp.time_taken,
            rabin_karp_match_percentage: comparison.rabin_karp.match_percentage,
        }
    }

    /// Copy of this record carrying a store-assigned id
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::ComparisonAggregator;

    #[test]
    fn test_record_copies_comparison_fields() {
        let seq1: NucleotideSequence = "ACGTACGT".parse().unwrap();
        let seq2: NucleotideSequence = "ACGT".parse().unwrap();
        let comparison = ComparisonAggregator::new().compare(&seq1, &seq2);

        let record = ReportRecord::new("run1.png", "run2.png", seq1, seq2, &comparison);
        assert_eq!(record.id, None);
        assert_eq!(record.image1_name, "run1.png");
        assert!((record.peak_match_percentage - 100.0).abs() < 1e-9);
        assert!((record.kmp_match_percentage - comparison.kmp.match_percentage).abs() < 1e-12);
        assert!((record.rabin_karp_time - comparison.rabin_karp.time_taken).abs() < 1e-12);

        let stored = record.with_id(7);
        assert_eq!(stored.id, Some(7));
    }

    #[test]
    fn test_record_json_fields() {
        let seq: NucleotideSequence = "ACGT".parse().unwrap();
        let comparison = ComparisonAggregator::new().compare(&seq, &seq);
        let record = ReportRecord::new("a.png", "b.png", seq.clone(), seq, &comparison);

        let json = serde_json::to_value(&record).unwrap();
        for key in [
            "id",
            "created_at",
            "image1_name",
            "image2_name",
            "sequence1",
            "sequence2",
            "peak_match_percentage",
            "kmp_time",
            "kmp_match_percentage",
            "rabin_karp_time",
            "rabin_karp_match_percentage",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["sequence1"], "ACGT");
        assert!(json["id"].is_null());
    }
}
