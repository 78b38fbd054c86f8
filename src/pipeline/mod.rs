//! The image-to-sequence extraction pipeline.
//!
//! [`ExtractionPipeline`] chains the stages for one image:
//!
//! 1. **Decode**: image bytes to a four-channel [`IntensityTrace`]
//! 2. **Call**: trace to a [`NucleotideSequence`] with per-base counts
//! 3. **Render**: trace to a PNG chromatogram with called samples marked
//!
//! Failures carry the name of the image so callers can tell which upload
//! was a bad file ([`ExtractionError::Decode`]) and which simply had no
//! usable signal ([`ExtractionError::NoSignal`]).
//!
//! [`ExtractionPipeline`]: extraction::ExtractionPipeline
//! [`IntensityTrace`]: crate::core::trace::IntensityTrace
//! [`NucleotideSequence`]: crate::core::sequence::NucleotideSequence
//! [`ExtractionError::Decode`]: extraction::ExtractionError::Decode
//! [`ExtractionError::NoSignal`]: extraction::ExtractionError::NoSignal

pub mod extraction;
