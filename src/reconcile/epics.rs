//! reconcile::epics
//!
//! Epic and child issue materialization.
//!
//! Each epic becomes one issue. Its children are then created one at a time,
//! each body referencing the epic's issue number, so a child is never
//! created without a confirmed epic number.
//!
//! Any creation failure aborts the run. Issues created before the failure
//! are left in place.

use tracing::{debug, info};

use super::ApplyError;
use crate::core::blueprint::EpicSpec;
use crate::core::policy;
use crate::core::types::RepoCoordinate;
use crate::tracker::{CreateIssueRequest, IssueRef, Tracker};
use crate::ui::output::{self, Verbosity};

/// The issues created for one epic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicOutcome {
    pub epic: IssueRef,
    /// Child issues, in creation order.
    pub children: Vec<IssueRef>,
}

/// Request that creates the issue representing an epic.
pub fn epic_request(spec: &EpicSpec) -> CreateIssueRequest {
    CreateIssueRequest {
        title: policy::epic_title(&spec.title),
        body: policy::epic_body(&spec.description),
        labels: policy::label_list(&policy::EPIC_LABELS),
    }
}

/// Request that creates a child issue of epic `epic_number`.
pub fn child_request(epic_number: u64, title: &str) -> CreateIssueRequest {
    CreateIssueRequest {
        title: title.to_string(),
        body: policy::child_body(epic_number),
        labels: policy::label_list(&policy::CHILD_LABELS),
    }
}

/// Create one epic issue followed by its children, in order.
///
/// # Errors
///
/// - `ApplyError::EpicIssue` if the epic cannot be created (no child is attempted)
/// - `ApplyError::ChildIssue` for the first child that fails (later children are not attempted)
pub async fn materialize_epic(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    spec: &EpicSpec,
    verbosity: Verbosity,
) -> Result<EpicOutcome, ApplyError> {
    let epic = tracker
        .create_issue(repo, epic_request(spec))
        .await
        .map_err(|source| ApplyError::EpicIssue {
            title: spec.title.clone(),
            source,
        })?;
    output::print(
        format!("Epic issue created: {}", output::format_issue(&epic)),
        verbosity,
    );
    info!(epic = epic.number, children = spec.children.len(), "epic created");

    let mut children = Vec::with_capacity(spec.children.len());
    for title in &spec.children {
        let child = tracker
            .create_issue(repo, child_request(epic.number, title))
            .await
            .map_err(|source| ApplyError::ChildIssue {
                epic: epic.number,
                title: title.clone(),
                source,
            })?;
        output::print(
            format!("  Child issue created: {}", output::format_issue(&child)),
            verbosity,
        );
        debug!(epic = epic.number, child = child.number, "child created");
        children.push(child);
    }

    Ok(EpicOutcome { epic, children })
}

/// Materialize every epic in document order, stopping at the first failure.
pub async fn materialize_epics(
    tracker: &dyn Tracker,
    repo: &RepoCoordinate,
    epics: &[EpicSpec],
    verbosity: Verbosity,
) -> Result<Vec<EpicOutcome>, ApplyError> {
    let mut outcomes = Vec::with_capacity(epics.len());
    for spec in epics {
        outcomes.push(materialize_epic(tracker, repo, spec, verbosity).await?);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::mock::{FailOn, MockTracker};
    use crate::tracker::{Method, TrackerError};

    fn repo() -> RepoCoordinate {
        RepoCoordinate::new("octo", "hello").unwrap()
    }

    fn spec(title: &str, children: &[&str]) -> EpicSpec {
        EpicSpec {
            title: title.to_string(),
            description: format!("{} description", title),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn server_error() -> TrackerError {
        TrackerError::Api {
            method: Method::Post,
            path: "/repos/octo/hello/issues".into(),
            status: 502,
            body: "Bad Gateway".into(),
        }
    }

    #[test]
    fn epic_request_shape() {
        let request = epic_request(&spec("Login", &[]));
        assert_eq!(request.title, "Login (EPIC)");
        assert!(request.body.starts_with("Login description\n\n"));
        assert_eq!(request.labels, vec!["epic", "type:feature"]);
    }

    #[test]
    fn child_request_shape() {
        let request = child_request(9, "Add form");
        assert_eq!(request.title, "Add form");
        assert!(request.body.starts_with("Part of Epic #9\n"));
        assert_eq!(request.labels, vec!["type:feature", "phase:planning"]);
    }

    #[tokio::test]
    async fn children_reference_epic_number() {
        let tracker = MockTracker::new();
        let outcome = materialize_epic(
            &tracker,
            &repo(),
            &spec("Login", &["Add form", "Add validation"]),
            Verbosity::Quiet,
        )
        .await
        .unwrap();

        assert_eq!(outcome.epic.number, 1);
        assert_eq!(outcome.children.len(), 2);
        for issue in &tracker.issues()[1..] {
            assert!(issue.body.contains("Part of Epic #1"));
        }
    }

    #[tokio::test]
    async fn epic_without_children_creates_one_issue() {
        let tracker = MockTracker::new();
        let outcome = materialize_epic(&tracker, &repo(), &spec("Solo", &[]), Verbosity::Quiet)
            .await
            .unwrap();

        assert!(outcome.children.is_empty());
        assert_eq!(tracker.create_issue_calls(), vec!["Solo (EPIC)"]);
    }

    #[tokio::test]
    async fn epic_failure_skips_children() {
        let tracker = MockTracker::new().fail_on(FailOn::CreateIssue {
            title: "Login (EPIC)".into(),
            error: server_error(),
        });

        let err = materialize_epic(&tracker, &repo(), &spec("Login", &["a"]), Verbosity::Quiet)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplyError::EpicIssue { ref title, .. } if title == "Login"));
        assert_eq!(tracker.create_issue_calls(), vec!["Login (EPIC)"]);
    }

    #[tokio::test]
    async fn child_failure_stops_remaining_children_and_epics() {
        let tracker = MockTracker::new().fail_on(FailOn::CreateIssue {
            title: "b".into(),
            error: server_error(),
        });

        let err = materialize_epics(
            &tracker,
            &repo(),
            &[spec("One", &["a", "b", "c"]), spec("Two", &["d"])],
            Verbosity::Quiet,
        )
        .await
        .unwrap_err();

        match err {
            ApplyError::ChildIssue {
                epic,
                ref title,
                ref source,
            } => {
                assert_eq!(epic, 1);
                assert_eq!(title, "b");
                assert_eq!(source.status(), Some(502));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tracker.create_issue_calls(), vec!["One (EPIC)", "a", "b"]);
    }
}
