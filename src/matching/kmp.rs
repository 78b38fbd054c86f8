//! Knuth-Morris-Pratt exact search.

use crate::core::types::Nucleotide;
use crate::matching::algorithm::MatchAlgorithm;

pub const KMP_COMPLEXITY: &str = "O(n+m)";

/// Knuth-Morris-Pratt search: O(m) preprocessing, O(n) scan
#[derive(Debug, Clone, Copy, Default)]
pub struct Kmp;

/// Longest proper prefix of `pattern[..=i]` that is also its suffix, for each `i`
#[must_use]
pub fn prefix_table(pattern: &[Nucleotide]) -> Vec<usize> {
    let mut lps = vec![0usize; pattern.len()];
    let mut k = 0usize;
    for i in 1..pattern.len() {
        while k > 0 && pattern[k] != pattern[i] {
            k = lps[k - 1];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        lps[i] = k;
    }
    lps
}

impl MatchAlgorithm for Kmp {
    fn complexity(&self) -> &'static str {
        KMP_COMPLEXITY
    }

    fn search(&self, pattern: &[Nucleotide], text: &[Nucleotide]) -> Vec<usize> {
        let n = text.len();
        let m = pattern.len();
        if m == 0 || m > n {
            return Vec::new();
        }

        let lps = prefix_table(pattern);

        let mut positions = Vec::new();
        let mut q = 0usize;
        for (i, &symbol) in text.iter().enumerate() {
            while q > 0 && pattern[q] != symbol {
                q = lps[q - 1];
            }
            if pattern[q] == symbol {
                q += 1;
            }
            if q == m {
                positions.push(i + 1 - m);
                q = lps[q - 1];
            }
        }
        positions
    }
}
