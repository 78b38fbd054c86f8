use serde::Serialize;
use std::time::Instant;

use crate::core::sequence::NucleotideSequence;
use crate::core::types::Nucleotide;
use crate::matching::kmp::Kmp;
use crate::matching::rabin_karp::RabinKarp;
use crate::matching::scoring::coverage_percentage;

/// Outcome of one exact-match search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Wall-clock seconds spent preprocessing and scanning
    pub time_taken: f64,

    /// Share of the text covered by occurrences, 0-100
    pub match_percentage: f64,

    /// Start offsets of every occurrence, ascending
    #[serde(rename = "matches")]
    pub matched_positions: Vec<usize>,

    /// Asymptotic cost of the algorithm that produced this result
    #[serde(rename = "complexity")]
    pub complexity_label: &'static str,
}

/// An exact substring search over nucleotide sequences.
///
/// Implementors only provide [`MatchAlgorithm::search`]; timing and
/// percentage calculation are shared so every algorithm reports the same way.
pub trait MatchAlgorithm {
    /// Fixed description of the algorithm's cost
    fn complexity(&self) -> &'static str;

    /// Start offsets of every occurrence of `pattern` in `text`, ascending.
    ///
    /// An empty pattern, or one longer than the text, has no occurrences.
    fn search(&self, pattern: &[Nucleotide], text: &[Nucleotide]) -> Vec<usize>;

    /// Search and package the result, timing only the search itself
    fn find_all(&self, pattern: &NucleotideSequence, text: &NucleotideSequence) -> MatchResult {
        let start = Instant::now();
        let matched_positions = self.search(pattern.as_slice(), text.as_slice());
        let time_taken = start.elapsed().as_secs_f64();

        MatchResult {
            time_taken,
            match_percentage: coverage_percentage(
                matched_positions.len(),
                pattern.len(),
                text.len(),
            ),
            matched_positions,
            complexity_label: self.complexity(),
        }
    }
}

/// The closed set of search algorithms offered by the comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Kmp,
    RabinKarp,
}

impl Algorithm {
    /// All algorithms, in the order the comparator runs them
    pub const ALL: [Algorithm; 2] = [Algorithm::Kmp, Algorithm::RabinKarp];

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Kmp => "KMP",
            Algorithm::RabinKarp => "Rabin-Karp",
        }
    }

    /// Run this algorithm with its default parameters
    #[must_use]
    pub fn find_all(self, pattern: &NucleotideSequence, text: &NucleotideSequence) -> MatchResult {
        match self {
            Algorithm::Kmp => Kmp.find_all(pattern, text),
            Algorithm::RabinKarp => RabinKarp::default().find_all(pattern, text),
        }
    }

    #[must_use]
    pub fn complexity(self) -> &'static str {
        match self {
            Algorithm::Kmp => Kmp.complexity(),
            Algorithm::RabinKarp => RabinKarp::default().complexity(),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
