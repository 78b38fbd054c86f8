use base64::Engine as _;
use serde::Serialize;
use thiserror::Error;

use crate::calling::base_caller::{BaseCaller, CallingStrategy, NoSignalError};
use crate::calling::threshold::IntensityThresholds;
use crate::core::sequence::{NucleotideCounts, NucleotideSequence};
use crate::decoding::decoder::{lane_to_trace, ChromatogramDecoder, DecodeError, DecoderConfig};
use crate::decoding::render::render_chromatogram;

/// Extraction failure, naming the image it happened on
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to decode image '{image}': {source}")]
    Decode {
        image: String,
        #[source]
        source: DecodeError,
    },

    #[error("Image '{image}' has no usable signal: {source}")]
    NoSignal {
        image: String,
        #[source]
        source: NoSignalError,
    },

    #[error("Failed to render chromatogram for '{image}': {source}")]
    Render {
        image: String,
        #[source]
        source: image::ImageError,
    },
}

impl ExtractionError {
    /// Name of the image that failed
    #[must_use]
    pub fn image(&self) -> &str {
        match self {
            ExtractionError::Decode { image, .. }
            | ExtractionError::NoSignal { image, .. }
            | ExtractionError::Render { image, .. } => image,
        }
    }
}

/// Configuration for decoding and base calling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineConfig {
    pub decoder: DecoderConfig,
    pub strategy: CallingStrategy,
    pub thresholds: IntensityThresholds,
}

/// Everything extracted from one chromatogram image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub filename: String,
    pub sequence: NucleotideSequence,
    pub counts: NucleotideCounts,
    /// Threshold classification of every lane pixel; not reflected in `counts`
    pub intensity_sequence: NucleotideSequence,
    /// PNG plot of the decoded trace with called samples marked
    pub chromatogram_png: Vec<u8>,
    /// Number of samples in the decoded trace
    pub samples: usize,
}

/// The extraction payload returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionPayload {
    pub filename: String,
    /// Base64-encoded PNG
    pub chromatogram: String,
    pub dna_sequence: NucleotideSequence,
    pub intensity_sequence: NucleotideSequence,
    pub nucleotide_counts: NucleotideCounts,
}

impl Extraction {
    #[must_use]
    pub fn chromatogram_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.chromatogram_png)
    }

    #[must_use]
    pub fn to_payload(&self) -> ExtractionPayload {
        ExtractionPayload {
            filename: self.filename.clone(),
            chromatogram: self.chromatogram_base64(),
            dna_sequence: self.sequence.clone(),
            intensity_sequence: self.intensity_sequence.clone(),
            nucleotide_counts: self.counts,
        }
    }
}

/// Image to sequence: decode, call bases, render the chromatogram
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    decoder: ChromatogramDecoder,
    caller: BaseCaller,
    thresholds: IntensityThresholds,
}

impl ExtractionPipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            decoder: ChromatogramDecoder::new(config.decoder),
            caller: BaseCaller::new(config.strategy),
            thresholds: config.thresholds,
        }
    }

    /// Extract the sequence of one image
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Decode` if the bytes are not a usable image,
    /// `ExtractionError::NoSignal` if no base could be called and
    /// `ExtractionError::Render` if the chromatogram plot cannot be encoded.
    pub fn extract(&self, filename: &str, image_bytes: &[u8]) -> Result<Extraction, ExtractionError> {
        let decode_error = |source| ExtractionError::Decode {
            image: filename.to_string(),
            source,
        };
        let lane = self.decoder.read_lane(image_bytes).map_err(decode_error)?;
        let trace = lane_to_trace(&lane).map_err(decode_error)?;

        let calls = self
            .caller
            .call(&trace)
            .map_err(|source| ExtractionError::NoSignal {
                image: filename.to_string(),
                source,
            })?;

        let called: Vec<_> = calls.called().collect();
        let chromatogram_png =
            render_chromatogram(&trace, &called).map_err(|source| ExtractionError::Render {
                image: filename.to_string(),
                source,
            })?;

        tracing::info!(
            image = filename,
            samples = trace.len(),
            bases = calls.sequence.len(),
            "Extracted sequence"
        );

        Ok(Extraction {
            filename: filename.to_string(),
            sequence: calls.sequence,
            counts: calls.counts,
            intensity_sequence: self.thresholds.classify_lane(&lane),
            chromatogram_png,
            samples: trace.len(),
        })
    }

    /// Extract two images in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first image's error if it failed, otherwise the second's.
    pub fn extract_pair(
        &self,
        first: (&str, &[u8]),
        second: (&str, &[u8]),
    ) -> Result<(Extraction, Extraction), ExtractionError> {
        let (a, b) = rayon::join(
            || self.extract(first.0, first.1),
            || self.extract(second.0, second.1),
        );
        Ok((a?, b?))
    }
}
