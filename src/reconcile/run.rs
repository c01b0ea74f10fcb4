//! reconcile::run
//!
//! Sequencing of a full blueprint application.
//!
//! # Ordering
//!
//! 1. Label phase completes (every create attempted) before any issue exists.
//! 2. Epics are processed in document order.
//! 3. Each epic's children follow it, in document order.
//!
//! Requests are issued one at a time.

use tracing::{info, instrument};

use super::epics::{self, EpicOutcome};
use super::labels::{self, LabelReport, LabelSettings};
use super::ApplyError;
use crate::core::blueprint::Blueprint;
use crate::core::policy;
use crate::core::types::RepoCoordinate;
use crate::tracker::Tracker;
use crate::ui::output::{self, Verbosity};

/// Result of a successful application.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub labels: LabelReport,
    /// One entry per epic, in document order.
    pub epics: Vec<EpicOutcome>,
}

impl ApplyReport {
    /// Number of child issues created.
    pub fn child_count(&self) -> usize {
        self.epics.iter().map(|e| e.children.len()).sum()
    }

    /// Final summary line.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Blueprint application completed: {} label(s) created, {} epic(s), {} child issue(s)",
            self.labels.created.len(),
            self.epics.len(),
            self.child_count()
        );
        if !self.labels.failed.is_empty() {
            line.push_str(&format!(
                " ({} label(s) could not be created)",
                self.labels.failed.len()
            ));
        }
        line
    }
}

/// Apply a blueprint to a repository.
///
/// # Errors
///
/// Returns the first fatal error: failing to list labels, or failing to
/// create any epic or child issue. Label creation failures are not fatal
/// and appear in the report.
#[instrument(skip_all, fields(repo = %repo, tracker = tracker.name()))]
pub async fn apply(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    blueprint: &Blueprint,
    settings: &LabelSettings,
    verbosity: Verbosity,
) -> Result<ApplyReport, ApplyError> {
    output::print(format!("Applying blueprint to {}", repo), verbosity);

    let desired = labels::desired_labels(&blueprint.labels);
    let label_report = labels::ensure_labels(tracker, repo, &desired, settings, verbosity).await?;
    output::print("Labels ensured.", verbosity);
    info!(
        created = label_report.created.len(),
        failed = label_report.failed.len(),
        "label phase complete"
    );

    let epics = epics::materialize_epics(tracker, repo, &blueprint.epics, verbosity).await?;

    let report = ApplyReport {
        labels: label_report,
        epics,
    };
    output::print(report.summary(), verbosity);
    Ok(report)
}

/// An epic and its children as they would be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEpic {
    /// Issue title of the epic
    pub title: String,
    /// Child issue titles
    pub children: Vec<String>,
}

/// What an application would do, computed without creating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPlan {
    /// Labels that would be created, in order.
    pub labels_to_create: Vec<String>,
    /// Epics that would be created, in order.
    pub epics: Vec<PlannedEpic>,
}

impl ApplyPlan {
    /// Total issues the plan would create.
    pub fn issue_count(&self) -> usize {
        self.epics.iter().map(|e| 1 + e.children.len()).sum()
    }

    /// Human-readable rendering.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if self.labels_to_create.is_empty() {
            lines.push("Labels: all present".to_string());
        } else {
            lines.push(format!("Labels to create ({}):", self.labels_to_create.len()));
            lines.push(output::format_list(&self.labels_to_create, "  + "));
        }

        lines.push(format!("Issues to create ({}):", self.issue_count()));
        for epic in &self.epics {
            lines.push(format!("  + {}", epic.title));
            if !epic.children.is_empty() {
                lines.push(output::format_list(&epic.children, "    + "));
            }
        }

        lines.join("\n")
    }
}

/// Compute the plan for a blueprint. Only lists labels; creates nothing.
///
/// # Errors
///
/// Returns `ApplyError::ListLabels` if the label snapshot cannot be fetched.
pub async fn plan(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    blueprint: &Blueprint,
) -> Result<ApplyPlan, ApplyError> {
    let desired = labels::desired_labels(&blueprint.labels);
    let (_, labels_to_create) = labels::plan_labels(tracker, repo, &desired).await?;

    let epics = blueprint
        .epics
        .iter()
        .map(|spec| PlannedEpic {
            title: policy::epic_title(&spec.title),
            children: spec.children.clone(),
        })
        .collect();

    Ok(ApplyPlan {
        labels_to_create,
        epics,
    })
}
