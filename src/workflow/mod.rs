//! Client-side comparison workflow.
//!
//! A comparison session moves through three stages:
//!
//! ```text
//! Upload --extract--> Extracted --compare--> Compared
//!    ^                                           |
//!    +------------------- reset -----------------+
//! ```
//!
//! [`Workflow`] enforces the order: comparing before both images have been
//! extracted is a [`WorkflowError::InvalidTransition`], and a stage that fails
//! leaves the workflow where it was so the user can retry.
//!
//! [`Workflow`]: machine::Workflow
//! [`WorkflowError::InvalidTransition`]: machine::WorkflowError::InvalidTransition

pub mod machine;
