//! reconcile::labels
//!
//! Label reconciliation: ensure every desired label exists on the tracker.
//!
//! # Algorithm
//!
//! 1. Desired = document labels followed by [`CONTROL_LABELS`], de-duplicated
//!    case-insensitively (first spelling wins).
//! 2. Fetch the existing labels once. The snapshot is never refreshed, so
//!    labels created by someone else mid-run are not seen; a resulting
//!    conflict is reported as already present.
//! 3. Create each desired label whose lower-cased name is not in the
//!    snapshot. A failed creation is recorded and the run continues.
//!
//! A listing failure is fatal.

use std::collections::HashSet;

use tracing::debug;

use super::ApplyError;
use crate::core::config::Config;
use crate::core::policy::{self, CONTROL_LABELS};
use crate::core::types::RepoCoordinate;
use crate::tracker::{CreateLabelRequest, Label, LabelOutcome, Tracker, TrackerError};
use crate::ui::output::{self, Verbosity};

/// Metadata applied to every label the reconciler creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSettings {
    pub color: String,
    pub description: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            color: policy::DEFAULT_LABEL_COLOR.to_string(),
            description: policy::DEFAULT_LABEL_DESCRIPTION.to_string(),
        }
    }
}

impl From<&Config> for LabelSettings {
    fn from(config: &Config) -> Self {
        Self {
            color: config.label_color().to_string(),
            description: config.label_description().to_string(),
        }
    }
}

/// A label whose creation failed.
#[derive(Debug, Clone)]
pub struct LabelFailure {
    pub name: String,
    pub error: TrackerError,
}

/// What the label phase did.
#[derive(Debug, Clone, Default)]
pub struct LabelReport {
    /// Number of labels on the tracker before the phase.
    pub existing: usize,
    /// Labels created, in creation order.
    pub created: Vec<String>,
    /// Labels the tracker reported as already existing on create.
    pub already_present: Vec<String>,
    /// Labels whose creation failed.
    pub failed: Vec<LabelFailure>,
}

/// Document labels plus control labels, de-duplicated case-insensitively.
pub fn desired_labels(document_labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    document_labels
        .iter()
        .map(String::as_str)
        .chain(CONTROL_LABELS)
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Lower-cased names of existing labels.
pub fn existing_names(labels: &[Label]) -> HashSet<String> {
    labels.iter().map(|l| l.name.to_lowercase()).collect()
}

/// Desired labels absent from `existing` (lower-cased names), in order.
pub fn missing_labels(desired: &[String], existing: &HashSet<String>) -> Vec<String> {
    desired
        .iter()
        .filter(|name| !existing.contains(&name.to_lowercase()))
        .cloned()
        .collect()
}

/// Fetch the label snapshot and return the labels that would be created.
pub async fn plan_labels(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    desired: &[String],
) -> Result<(Vec<Label>, Vec<String>), ApplyError> {
    let existing = tracker
        .list_labels(repo)
        .await
        .map_err(ApplyError::ListLabels)?;
    let missing = missing_labels(desired, &existing_names(&existing));
    debug!(
        existing = existing.len(),
        missing = missing.len(),
        "planned labels"
    );
    Ok((existing, missing))
}

/// Create every desired label that does not exist yet.
///
/// # Errors
///
/// Only a failure to list the existing labels is returned. Creation
/// failures are collected in [`LabelReport::failed`] and printed as warnings.
pub async fn ensure_labels(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    desired: &[String],
    settings: &LabelSettings,
    verbosity: Verbosity,
) -> Result<LabelReport, ApplyError> {
    let (existing, missing) = plan_labels(tracker, repo, desired).await?;

    let mut report = LabelReport {
        existing: existing.len(),
        ..Default::default()
    };

    for name in missing {
        let request = CreateLabelRequest {
            name: name.clone(),
            color: settings.color.clone(),
            description: settings.description.clone(),
        };

        match tracker.create_label(repo, request).await {
            Ok(LabelOutcome::Created(_)) => {
                output::print(format!("Label created: {}", name), verbosity);
                report.created.push(name);
            }
            Ok(LabelOutcome::AlreadyExists) => {
                debug!(label = %name, "label appeared after snapshot");
                report.already_present.push(name);
            }
            Err(error) => {
                debug!(label = %name, %error, "label creation failed");
                output::warn(
                    format!("Label {} creation warning: {}", name, error),
                    verbosity,
                );
                report.failed.push(LabelFailure { name, error });
            }
        }
    }

    Ok(report)
}
