use image::Rgb;

use crate::core::sequence::NucleotideSequence;
use crate::core::types::Nucleotide;

/// Default minimum raw channel value (0-255) for a dye to count as present
pub const DEFAULT_CHANNEL_THRESHOLD: u8 = 30;

/// Per-channel minimum intensities for threshold classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityThresholds {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self {
            red: DEFAULT_CHANNEL_THRESHOLD,
            green: DEFAULT_CHANNEL_THRESHOLD,
            blue: DEFAULT_CHANNEL_THRESHOLD,
        }
    }
}

impl IntensityThresholds {
    /// Classify one raw pixel by its dominant primary channel.
    ///
    /// Red, green and blue must exceed their threshold and be strictly
    /// brighter than the other two channels to yield A, T and C. Every other
    /// pixel, including dark ones and red/green mixtures, is G.
    #[must_use]
    pub fn classify(&self, pixel: Rgb<u8>) -> Nucleotide {
        let [r, g, b] = pixel.0;
        if r > self.red && r > g && r > b {
            Nucleotide::A
        } else if g > self.green && g > r && g > b {
            Nucleotide::T
        } else if b > self.blue && b > r && b > g {
            Nucleotide::C
        } else {
            Nucleotide::G
        }
    }

    /// Classify every pixel of a lane, in order
    #[must_use]
    pub fn classify_lane(&self, lane: &[Rgb<u8>]) -> NucleotideSequence {
        lane.iter().map(|pixel| self.classify(*pixel)).collect()
    }
}
