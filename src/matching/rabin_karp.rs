//! Rabin-Karp exact search with a rolling polynomial hash.

use crate::core::types::Nucleotide;
use crate::matching::algorithm::MatchAlgorithm;

pub const RABIN_KARP_COMPLEXITY: &str = "O(n*m) worst case, O(n+m) average";

/// Default hash radix (one digit per byte value)
pub const DEFAULT_RADIX: u64 = 256;
/// Default hash modulus, a prime
pub const DEFAULT_MODULUS: u64 = 1_000_000_007;

/// Rabin-Karp search.
///
/// Windows whose hash equals the pattern's are verified symbol by symbol, so
/// hash collisions never produce false matches.
#[derive(Debug, Clone, Copy)]
pub struct RabinKarp {
    radix: u64,
    modulus: u64,
}

impl Default for RabinKarp {
    fn default() -> Self {
        Self {
            radix: DEFAULT_RADIX,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl RabinKarp {
    /// Use a custom radix and modulus. A modulus below 2 is raised to 2.
    #[must_use]
    pub fn with_params(radix: u64, modulus: u64) -> Self {
        Self {
            radix,
            modulus: modulus.max(2),
        }
    }

    #[must_use]
    pub fn radix(&self) -> u64 {
        self.radix
    }

    #[must_use]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    fn reduce(&self, value: u128) -> u64 {
        // Below the modulus, which is a u64
        u64::try_from(value % u128::from(self.modulus)).unwrap_or_default()
    }

    fn mul_mod(&self, a: u64, b: u64) -> u64 {
        self.reduce(u128::from(a) * u128::from(b))
    }

    /// Append one symbol to a hash
    fn push(&self, hash: u64, symbol: Nucleotide) -> u64 {
        self.reduce(u128::from(self.mul_mod(hash, self.radix)) + u128::from(symbol.as_byte()))
    }

    /// Remove the leading symbol of a window, given `high = radix^(m-1) mod q`
    fn pop(&self, hash: u64, symbol: Nucleotide, high: u64) -> u64 {
        let lead = self.mul_mod(u64::from(symbol.as_byte()), high);
        self.reduce(u128::from(hash) + u128::from(self.modulus) - u128::from(lead))
    }

    fn hash(&self, symbols: &[Nucleotide]) -> u64 {
        symbols.iter().fold(0, |h, &s| self.push(h, s))
    }
}

impl MatchAlgorithm for RabinKarp {
    fn complexity(&self) -> &'static str {
        RABIN_KARP_COMPLEXITY
    }

    fn search(&self, pattern: &[Nucleotide], text: &[Nucleotide]) -> Vec<usize> {
        let n = text.len();
        let m = pattern.len();
        if m == 0 || m > n {
            return Vec::new();
        }

        let high = (1..m).fold(1 % self.modulus, |h, _| self.mul_mod(h, self.radix));
        let pattern_hash = self.hash(pattern);
        let mut window_hash = self.hash(&text[..m]);

        let mut positions = Vec::new();
        for start in 0..=n - m {
            if window_hash == pattern_hash && text[start..start + m] == *pattern {
                positions.push(start);
            }
            if start + m < n {
                window_hash = self.pop(window_hash, text[start], high);
                window_hash = self.push(window_hash, text[start + m]);
            }
        }
        positions
    }
}
