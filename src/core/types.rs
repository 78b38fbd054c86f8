use serde::{Deserialize, Serialize};

/// A DNA nucleotide, one per chromatogram dye channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    /// Channel priority used to break ties between equally bright channels.
    ///
    /// Earlier entries win: A > C > G > T.
    pub const PRIORITY: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    /// Parse a nucleotide from an ASCII byte (case-insensitive)
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    /// Parse a nucleotide from a character (case-insensitive)
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii() {
            #[allow(clippy::cast_possible_truncation)] // ASCII checked above
            Self::from_byte(c as u8)
        } else {
            None
        }
    }

    /// Uppercase ASCII code of this nucleotide
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }

    /// Index of this nucleotide in [`Nucleotide::PRIORITY`]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    /// Name of the dye colour carrying this base in a four-colour chromatogram
    #[must_use]
    pub fn dye(self) -> &'static str {
        match self {
            Self::A => "red",
            Self::C => "blue",
            Self::G => "yellow",
            Self::T => "green",
        }
    }
}

impl std::fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte_accepts_both_cases() {
        assert_eq!(Nucleotide::from_byte(b'A'), Some(Nucleotide::A));
        assert_eq!(Nucleotide::from_byte(b'g'), Some(Nucleotide::G));
        assert_eq!(Nucleotide::from_byte(b'N'), None);
        assert_eq!(Nucleotide::from_byte(b'-'), None);
    }

    #[test]
    fn test_from_char_rejects_non_ascii() {
        assert_eq!(Nucleotide::from_char('t'), Some(Nucleotide::T));
        assert_eq!(Nucleotide::from_char('Å'), None);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            Nucleotide::PRIORITY,
            [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T]
        );
        for (i, n) in Nucleotide::PRIORITY.iter().enumerate() {
            assert_eq!(n.index(), i);
        }
    }
}
