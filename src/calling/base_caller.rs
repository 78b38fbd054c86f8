use thiserror::Error;

use crate::calling::peaks::find_peaks;
use crate::core::sequence::{NucleotideCounts, NucleotideSequence};
use crate::core::trace::IntensityTrace;
use crate::core::types::Nucleotide;

/// Default minimum normalized height for a peak to be called
pub const DEFAULT_MIN_PEAK_HEIGHT: f64 = 0.1;
/// Default minimum spacing between peaks of one channel, in samples
pub const DEFAULT_MIN_PEAK_DISTANCE: usize = 1;

/// The trace produced no base calls at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No usable signal: none of the {samples} samples produced a base call")]
pub struct NoSignalError {
    pub samples: usize,
}

/// Which samples of a trace are called
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CallingStrategy {
    /// Call every sample that carries any signal
    #[default]
    EverySample,
    /// Call only samples that are a peak in at least one channel
    Peaks { min_height: f64, min_distance: usize },
}

impl CallingStrategy {
    #[must_use]
    pub fn peaks() -> Self {
        CallingStrategy::Peaks {
            min_height: DEFAULT_MIN_PEAK_HEIGHT,
            min_distance: DEFAULT_MIN_PEAK_DISTANCE,
        }
    }
}

/// Output of base calling, including where each base came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCalls {
    pub sequence: NucleotideSequence,
    pub counts: NucleotideCounts,
    /// Sample index of every emitted base, ascending
    pub positions: Vec<usize>,
}

impl BaseCalls {
    /// Pairs of (sample index, called base)
    pub fn called(&self) -> impl Iterator<Item = (usize, Nucleotide)> + '_ {
        self.positions.iter().copied().zip(self.sequence.iter())
    }
}

/// Walks an intensity trace and emits the dominant base at each called sample
#[derive(Debug, Clone, Default)]
pub struct BaseCaller {
    strategy: CallingStrategy,
}

impl BaseCaller {
    #[must_use]
    pub fn new(strategy: CallingStrategy) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub fn strategy(&self) -> CallingStrategy {
        self.strategy
    }

    /// Call bases and return the sequence with its per-base counts
    ///
    /// # Errors
    ///
    /// Returns `NoSignalError` if no sample yields a base.
    pub fn call_bases(
        &self,
        trace: &IntensityTrace,
    ) -> Result<(NucleotideSequence, NucleotideCounts), NoSignalError> {
        let calls = self.call(trace)?;
        Ok((calls.sequence, calls.counts))
    }

    /// Call bases, keeping the sample index of every call
    ///
    /// # Errors
    ///
    /// Returns `NoSignalError` if no sample yields a base.
    pub fn call(&self, trace: &IntensityTrace) -> Result<BaseCalls, NoSignalError> {
        let candidates: Vec<usize> = match self.strategy {
            CallingStrategy::EverySample => (0..trace.len()).collect(),
            CallingStrategy::Peaks {
                min_height,
                min_distance,
            } => peak_positions(trace, min_height, min_distance),
        };

        let mut bases = Vec::with_capacity(candidates.len());
        let mut positions = Vec::with_capacity(candidates.len());
        for index in candidates {
            let Some(sample) = trace.sample(index) else {
                continue;
            };
            if let Some(base) = dominant_base(sample) {
                bases.push(base);
                positions.push(index);
            }
        }

        if bases.is_empty() {
            tracing::warn!(samples = trace.len(), "Trace produced no base calls");
            return Err(NoSignalError {
                samples: trace.len(),
            });
        }

        let sequence = NucleotideSequence::new(bases);
        let counts = sequence.counts();
        tracing::debug!(
            samples = trace.len(),
            called = sequence.len(),
            a = counts.a,
            c = counts.c,
            g = counts.g,
            t = counts.t,
            "Called bases"
        );

        Ok(BaseCalls {
            sequence,
            counts,
            positions,
        })
    }
}

/// The base whose channel is brightest in a `[A, C, G, T]` sample.
///
/// Ties go to the earlier base in [`Nucleotide::PRIORITY`] (A > C > G > T).
/// Returns `None` when every channel is zero.
#[must_use]
pub fn dominant_base(sample: [f64; 4]) -> Option<Nucleotide> {
    let mut best: Option<(Nucleotide, f64)> = None;
    for base in Nucleotide::PRIORITY {
        let value = sample[base.index()];
        if value <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((base, value)),
        }
    }
    best.map(|(base, _)| base)
}

/// Union of per-channel peak indices, ascending and unique
fn peak_positions(trace: &IntensityTrace, min_height: f64, min_distance: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = Nucleotide::PRIORITY
        .iter()
        .flat_map(|&base| find_peaks(trace.channel(base), min_height, min_distance))
        .collect();
    positions.sort_unstable();
    positions.dedup();
    positions
}
