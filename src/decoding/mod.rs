//! Chromatogram image decoding.
//!
//! Turns a fluorescent chromatogram image into an [`IntensityTrace`]:
//! one pixel row (the lane) is read left to right, and each sampled column
//! becomes one base-calling slot with four dye intensities.
//!
//! - [`decoder`]: [`ChromatogramDecoder`] and its configuration
//! - [`render`]: draws a trace back out as a PNG line plot for display
//!
//! ## Example
//!
//! ```rust,no_run
//! use chroma_compare::decoding::decoder::ChromatogramDecoder;
//!
//! let bytes = std::fs::read("run1.png").unwrap();
//! let trace = ChromatogramDecoder::default().decode(&bytes).unwrap();
//! println!("{} samples", trace.len());
//! ```
//!
//! [`IntensityTrace`]: crate::core::trace::IntensityTrace
//! [`ChromatogramDecoder`]: decoder::ChromatogramDecoder

pub mod decoder;
pub mod render;
