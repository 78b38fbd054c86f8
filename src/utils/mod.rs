//! Shared helpers.
//!
//! - [`validation`]: filename sanitization and image upload checks

pub mod validation;
