//! reconcile
//!
//! Drives the tracker toward the blueprint.
//!
//! # Modules
//!
//! - [`labels`] - Label set-difference and creation
//! - [`epics`] - Epic and child issue creation
//! - [`run`] - Phase ordering, dry-run planning, and reporting
//!
//! # Failure policy
//!
//! Label creation failures are recoverable and reported as warnings. Every
//! other failure is returned as an [`ApplyError`] and ends the run. Nothing
//! is retried.

pub mod epics;
pub mod labels;
pub mod run;

pub use epics::EpicOutcome;
pub use labels::{LabelReport, LabelSettings};
pub use run::{apply, plan, ApplyPlan, ApplyReport};

use thiserror::Error;

use crate::tracker::TrackerError;

/// Fatal errors during an application.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to list existing labels")]
    ListLabels(#[source] TrackerError),

    #[error("failed to create epic issue for '{title}'")]
    EpicIssue {
        title: String,
        #[source]
        source: TrackerError,
    },

    #[error("failed to create child issue '{title}' of epic #{epic}")]
    ChildIssue {
        epic: u64,
        title: String,
        #[source]
        source: TrackerError,
    },
}

impl ApplyError {
    /// The underlying tracker error.
    pub fn tracker_error(&self) -> &TrackerError {
        match self {
            ApplyError::ListLabels(source)
            | ApplyError::EpicIssue { source, .. }
            | ApplyError::ChildIssue { source, .. } => source,
        }
    }
}
