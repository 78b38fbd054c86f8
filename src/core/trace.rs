use thiserror::Error;

use crate::core::types::Nucleotide;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("Channel lengths differ: A={a}, C={c}, G={g}, T={t}")]
    LengthMismatch { a: usize, c: usize, g: usize, t: usize },

    #[error("Channel {channel} has invalid intensity {value} at sample {index}")]
    InvalidIntensity {
        channel: Nucleotide,
        index: usize,
        value: f64,
    },
}

/// Four aligned intensity channels sampled along the trace axis.
///
/// All channels have the same length and hold finite, non-negative values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntensityTrace {
    a: Vec<f64>,
    c: Vec<f64>,
    g: Vec<f64>,
    t: Vec<f64>,
}

impl IntensityTrace {
    /// Build a trace from its four channels
    ///
    /// # Errors
    ///
    /// Returns `TraceError::LengthMismatch` if the channels differ in length and
    /// `TraceError::InvalidIntensity` for negative or non-finite readings.
    pub fn new(a: Vec<f64>, c: Vec<f64>, g: Vec<f64>, t: Vec<f64>) -> Result<Self, TraceError> {
        if a.len() != c.len() || a.len() != g.len() || a.len() != t.len() {
            return Err(TraceError::LengthMismatch {
                a: a.len(),
                c: c.len(),
                g: g.len(),
                t: t.len(),
            });
        }

        for (channel, values) in [
            (Nucleotide::A, &a),
            (Nucleotide::C, &c),
            (Nucleotide::G, &g),
            (Nucleotide::T, &t),
        ] {
            if let Some((index, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(TraceError::InvalidIntensity {
                    channel,
                    index,
                    value,
                });
            }
        }

        Ok(Self { a, c, g, t })
    }

    /// Build a trace from per-sample readings in `[A, C, G, T]` order
    ///
    /// # Errors
    ///
    /// Returns `TraceError::InvalidIntensity` for negative or non-finite readings.
    pub fn from_samples(samples: impl IntoIterator<Item = [f64; 4]>) -> Result<Self, TraceError> {
        let (mut a, mut c, mut g, mut t) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for [sa, sc, sg, st] in samples {
            a.push(sa);
            c.push(sc);
            g.push(sg);
            t.push(st);
        }
        Self::new(a, c, g, t)
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.a.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Readings at one sample in `[A, C, G, T]` order
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<[f64; 4]> {
        if index >= self.len() {
            return None;
        }
        Some([self.a[index], self.c[index], self.g[index], self.t[index]])
    }

    pub fn samples(&self) -> impl Iterator<Item = [f64; 4]> + '_ {
        (0..self.len()).map(|i| [self.a[i], self.c[i], self.g[i], self.t[i]])
    }

    #[must_use]
    pub fn channel(&self, base: Nucleotide) -> &[f64] {
        match base {
            Nucleotide::A => &self.a,
            Nucleotide::C => &self.c,
            Nucleotide::G => &self.g,
            Nucleotide::T => &self.t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let err = IntensityTrace::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 2], vec![0.0; 3])
            .unwrap_err();
        assert_eq!(
            err,
            TraceError::LengthMismatch {
                a: 3,
                c: 3,
                g: 2,
                t: 3
            }
        );
    }

    #[test]
    fn test_new_rejects_negative_intensity() {
        let err = IntensityTrace::new(vec![0.5], vec![-0.1], vec![0.0], vec![0.0]).unwrap_err();
        assert!(matches!(
            err,
            TraceError::InvalidIntensity {
                channel: Nucleotide::C,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_nan() {
        assert!(IntensityTrace::new(vec![f64::NAN], vec![0.0], vec![0.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_from_samples_round_trips_channels() {
        let trace =
            IntensityTrace::from_samples([[1.0, 0.0, 0.0, 0.0], [0.0, 0.2, 0.9, 0.1]]).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.channel(Nucleotide::G), &[0.0, 0.9]);
        assert_eq!(trace.sample(1), Some([0.0, 0.2, 0.9, 0.1]));
        assert_eq!(trace.sample(2), None);
        assert_eq!(trace.samples().count(), 2);
    }
}
