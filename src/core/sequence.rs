use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Nucleotide;

/// A sequence rejected before comparison
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSequenceError {
    #[error("Sequence '{input}' is missing")]
    Missing { input: String },

    #[error("Sequence '{input}' has invalid symbol '{symbol}' at position {position} (expected A, C, G or T)")]
    InvalidSymbol {
        input: String,
        position: usize,
        symbol: char,
    },
}

/// An immutable sequence of called bases
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NucleotideSequence {
    bases: Vec<Nucleotide>,
}

impl NucleotideSequence {
    #[must_use]
    pub fn new(bases: Vec<Nucleotide>) -> Self {
        Self { bases }
    }

    /// Parse a sequence, naming the input in any error.
    ///
    /// Surrounding whitespace is ignored and lowercase symbols are accepted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError::InvalidSymbol` for the first character
    /// outside {A, C, G, T}.
    pub fn parse_named(input: &str, text: &str) -> Result<Self, InvalidSequenceError> {
        let bases = text
            .trim()
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                Nucleotide::from_char(symbol).ok_or_else(|| InvalidSequenceError::InvalidSymbol {
                    input: input.to_string(),
                    position,
                    symbol,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bases })
    }

    /// Parse an optional field, treating `None` as a missing sequence
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError::Missing` when `text` is `None`, otherwise
    /// whatever [`NucleotideSequence::parse_named`] returns.
    pub fn parse_required(input: &str, text: Option<&str>) -> Result<Self, InvalidSequenceError> {
        match text {
            Some(text) => Self::parse_named(input, text),
            None => Err(InvalidSequenceError::Missing {
                input: input.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.bases
    }

    pub fn iter(&self) -> impl Iterator<Item = Nucleotide> + '_ {
        self.bases.iter().copied()
    }

    /// Tally the bases in this sequence
    #[must_use]
    pub fn counts(&self) -> NucleotideCounts {
        NucleotideCounts::from_bases(self.iter())
    }
}

impl std::str::FromStr for NucleotideSequence {
    type Err = InvalidSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_named("sequence", s)
    }
}

impl TryFrom<String> for NucleotideSequence {
    type Error = InvalidSequenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NucleotideSequence> for String {
    fn from(seq: NucleotideSequence) -> Self {
        seq.to_string()
    }
}

impl FromIterator<Nucleotide> for NucleotideSequence {
    fn from_iter<I: IntoIterator<Item = Nucleotide>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl std::fmt::Display for NucleotideSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: String = self.bases.iter().map(|n| n.as_char()).collect();
        f.write_str(&s)
    }
}

/// Per-base tallies of a called sequence.
///
/// Serialized with the keys `A`, `T`, `C`, `G` in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NucleotideCounts {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "T")]
    pub t: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "G")]
    pub g: usize,
}

impl NucleotideCounts {
    pub fn from_bases(bases: impl IntoIterator<Item = Nucleotide>) -> Self {
        let mut counts = Self::default();
        for base in bases {
            counts.increment(base);
        }
        counts
    }

    pub fn increment(&mut self, base: Nucleotide) {
        match base {
            Nucleotide::A => self.a += 1,
            Nucleotide::C => self.c += 1,
            Nucleotide::G => self.g += 1,
            Nucleotide::T => self.t += 1,
        }
    }

    #[must_use]
    pub fn get(&self, base: Nucleotide) -> usize {
        match base {
            Nucleotide::A => self.a,
            Nucleotide::C => self.c,
            Nucleotide::G => self.g,
            Nucleotide::T => self.t,
        }
    }

    /// Sum over all four bases; equals the length of the counted sequence
    #[must_use]
    pub fn total(&self) -> usize {
        self.a + self.c + self.g + self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_sequence() {
        let seq: NucleotideSequence = "ACGTacgt".parse().unwrap();
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.to_string(), "ACGTACGT");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let seq: NucleotideSequence = "  ACG\n".parse().unwrap();
        assert_eq!(seq.to_string(), "ACG");
    }

    #[test]
    fn test_parse_empty_is_valid() {
        let seq: NucleotideSequence = "".parse().unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.counts().total(), 0);
    }

    #[test]
    fn test_parse_rejects_invalid_symbol() {
        let err = NucleotideSequence::parse_named("seq2", "ACNGT").unwrap_err();
        assert_eq!(
            err,
            InvalidSequenceError::InvalidSymbol {
                input: "seq2".to_string(),
                position: 2,
                symbol: 'N',
            }
        );
        assert!(err.to_string().contains("seq2"));
    }

    #[test]
    fn test_parse_required_missing() {
        let err = NucleotideSequence::parse_required("seq1", None).unwrap_err();
        assert!(matches!(err, InvalidSequenceError::Missing { ref input } if input == "seq1"));
    }

    #[test]
    fn test_counts_sum_to_length() {
        let seq: NucleotideSequence = "AACGTTTG".parse().unwrap();
        let counts = seq.counts();
        assert_eq!(counts.a, 2);
        assert_eq!(counts.c, 1);
        assert_eq!(counts.g, 2);
        assert_eq!(counts.t, 3);
        assert_eq!(counts.total(), seq.len());
    }

    #[test]
    fn test_counts_serialize_with_base_keys() {
        let counts = NucleotideCounts {
            a: 1,
            t: 2,
            c: 3,
            g: 4,
        };
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"A":1,"T":2,"C":3,"G":4}"#);
    }

    #[test]
    fn test_sequence_serde_as_string() {
        let seq: NucleotideSequence = "GATTACA".parse().unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "\"GATTACA\"");

        let back: NucleotideSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);

        assert!(serde_json::from_str::<NucleotideSequence>("\"GATXACA\"").is_err());
    }
}
