use std::fmt;

use thiserror::Error;

use crate::matching::engine::{ComparisonAggregator, ComparisonResult};
use crate::matching::report::ReportRecord;
use crate::pipeline::extraction::{Extraction, ExtractionError, ExtractionPipeline};

/// The stage a [`Workflow`] is in, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Extracted,
    Compared,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Extracted => "extracted",
            Stage::Compared => "compared",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Cannot {action} from the {from} stage")]
    InvalidTransition { from: Stage, action: &'static str },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// An image named by the user, with its raw bytes
#[derive(Debug, Clone, Copy)]
pub struct ImageUpload<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> ImageUpload<'a> {
    #[must_use]
    pub fn new(name: &'a str, bytes: &'a [u8]) -> Self {
        Self { name, bytes }
    }
}

/// Comparison session state
#[derive(Debug, Clone, Default)]
pub enum Workflow {
    #[default]
    Upload,
    Extracted {
        first: Box<Extraction>,
        second: Box<Extraction>,
    },
    Compared {
        first: Box<Extraction>,
        second: Box<Extraction>,
        comparison: ComparisonResult,
        report: Box<ReportRecord>,
    },
}

impl Workflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Workflow::Upload => Stage::Upload,
            Workflow::Extracted { .. } => Stage::Extracted,
            Workflow::Compared { .. } => Stage::Compared,
        }
    }

    /// Extract both images and move to `Extracted`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless in `Upload`, or
    /// `WorkflowError::Extraction` naming the image that failed. The workflow
    /// stays in `Upload` on either error.
    pub fn extract(
        &mut self,
        pipeline: &ExtractionPipeline,
        image1: ImageUpload<'_>,
        image2: ImageUpload<'_>,
    ) -> Result<(), WorkflowError> {
        self.require(Stage::Upload, "extract")?;

        let (first, second) =
            pipeline.extract_pair((image1.name, image1.bytes), (image2.name, image2.bytes))?;

        tracing::debug!(
            image1 = image1.name,
            image2 = image2.name,
            "Workflow moved to extracted"
        );
        *self = Workflow::Extracted {
            first: Box::new(first),
            second: Box::new(second),
        };
        Ok(())
    }

    /// Compare the extracted sequences and move to `Compared`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless in `Extracted`.
    pub fn compare(&mut self, aggregator: &ComparisonAggregator) -> Result<&ComparisonResult, WorkflowError> {
        self.require(Stage::Extracted, "compare")?;

        let Workflow::Extracted { first, second } = std::mem::take(self) else {
            return Err(self.invalid("compare"));
        };

        let comparison = aggregator.compare(&first.sequence, &second.sequence);
        let report = ReportRecord::new(
            first.filename.clone(),
            second.filename.clone(),
            first.sequence.clone(),
            second.sequence.clone(),
            &comparison,
        );

        *self = Workflow::Compared {
            first,
            second,
            comparison,
            report: Box::new(report),
        };
        self.comparison().ok_or_else(|| self.invalid("compare"))
    }

    /// Drop all session data and return to `Upload`
    pub fn reset(&mut self) {
        *self = Workflow::Upload;
    }

    /// The two extractions, once available
    #[must_use]
    pub fn extractions(&self) -> Option<(&Extraction, &Extraction)> {
        match self {
            Workflow::Upload => None,
            Workflow::Extracted { first, second } | Workflow::Compared { first, second, .. } => {
                Some((first, second))
            }
        }
    }

    #[must_use]
    pub fn comparison(&self) -> Option<&ComparisonResult> {
        match self {
            Workflow::Compared { comparison, .. } => Some(comparison),
            _ => None,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&ReportRecord> {
        match self {
            Workflow::Compared { report, .. } => Some(report),
            _ => None,
        }
    }

    fn require(&self, expected: Stage, action: &'static str) -> Result<(), WorkflowError> {
        if self.stage() == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            from: self.stage(),
            action,
        }
    }
}
