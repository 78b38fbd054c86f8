//! Base calling from intensity traces.
//!
//! [`BaseCaller`] walks the four channels of an [`IntensityTrace`] and emits
//! the base of the brightest channel at each called sample:
//!
//! - Strictly greatest channel wins
//! - Ties go to the fixed priority A > C > G > T
//! - Samples where all four channels are zero are skipped
//! - A trace that yields no bases at all is a [`NoSignalError`]
//!
//! Two [`CallingStrategy`] values choose which samples are called: every
//! sample (the default) or only samples that are a peak in some channel.
//!
//! [`IntensityThresholds`] is a second, coarser reading of the raw lane
//! pixels: each pixel is classified by its dominant primary channel against
//! fixed thresholds, with G as the fallback. It never affects the counts.
//!
//! [`BaseCaller`]: base_caller::BaseCaller
//! [`IntensityTrace`]: crate::core::trace::IntensityTrace
//! [`NoSignalError`]: base_caller::NoSignalError
//! [`CallingStrategy`]: base_caller::CallingStrategy
//! [`IntensityThresholds`]: threshold::IntensityThresholds

pub mod base_caller;
pub mod peaks;
pub mod threshold;
