//! tracker::mock
//!
//! Mock tracker implementation for deterministic testing.
//!
//! # Design
//!
//! The mock tracker keeps labels and issues in memory, records every call,
//! and can be configured to fail specific operations. Label names are
//! compared case-insensitively, as GitHub does.
//!
//! # Example
//!
//! ```
//! use backlog_blueprint::core::types::RepoCoordinate;
//! use backlog_blueprint::tracker::mock::MockTracker;
//! use backlog_blueprint::tracker::{CreateIssueRequest, Tracker};
//!
//! # tokio_test::block_on(async {
//! let tracker = MockTracker::new();
//! let repo = RepoCoordinate::parse("octocat/hello-world").unwrap();
//!
//! let issue = tracker
//!     .create_issue(&repo, CreateIssueRequest {
//!         title: "Login (EPIC)".to_string(),
//!         body: String::new(),
//!         labels: vec!["epic".to_string()],
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(issue.number, 1);
//! assert_eq!(tracker.issues()[0].title, "Login (EPIC)");
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::traits::{
    CreateIssueRequest, CreateLabelRequest, IssueRef, Label, LabelOutcome, Tracker, TrackerError,
};
use crate::core::types::RepoCoordinate;

/// Mock tracker for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTracker {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockTrackerInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockTrackerInner {
    /// Labels currently on the tracker.
    labels: Vec<Label>,
    /// Issues created so far.
    issues: Vec<MockIssue>,
    /// Failure rules, checked in order.
    fail_on: Vec<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// An issue stored by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockIssue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_labels with the given error.
    ListLabels(TrackerError),
    /// Fail create_label for the named label (case-insensitive).
    CreateLabel { name: String, error: TrackerError },
    /// Fail create_issue for the given title.
    CreateIssue { title: String, error: TrackerError },
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListLabels {
        repo: String,
    },
    CreateLabel {
        repo: String,
        name: String,
        color: String,
        description: String,
    },
    CreateIssue {
        repo: String,
        title: String,
        body: String,
        labels: Vec<String>,
    },
}

impl MockTracker {
    /// Create a new empty mock tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock tracker with pre-existing labels.
    ///
    /// # Example
    ///
    /// ```
    /// use backlog_blueprint::tracker::mock::MockTracker;
    ///
    /// let tracker = MockTracker::with_labels(&["bug", "Epic"]);
    /// assert_eq!(tracker.label_names(), vec!["bug", "Epic"]);
    /// ```
    pub fn with_labels(names: &[&str]) -> Self {
        let tracker = Self::new();
        tracker.state().labels = names
            .iter()
            .map(|name| Label {
                name: name.to_string(),
                color: "ffffff".to_string(),
            })
            .collect();
        tracker
    }

    /// Add a failure rule. Rules accumulate.
    ///
    /// # Example
    ///
    /// ```
    /// use backlog_blueprint::tracker::mock::{FailOn, MockTracker};
    /// use backlog_blueprint::tracker::{Method, TrackerError};
    ///
    /// let tracker = MockTracker::new().fail_on(FailOn::CreateIssue {
    ///     title: "Add validation".to_string(),
    ///     error: TrackerError::Api {
    ///         method: Method::Post,
    ///         path: "/repos/o/r/issues".to_string(),
    ///         status: 500,
    ///         body: "boom".to_string(),
    ///     },
    /// });
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().fail_on.push(fail_on);
        self
    }

    /// Clear all failure rules.
    pub fn clear_fail_on(&self) {
        self.state().fail_on.clear();
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }

    /// Names of the labels currently on the tracker, in creation order.
    pub fn label_names(&self) -> Vec<String> {
        self.state().labels.iter().map(|l| l.name.clone()).collect()
    }

    /// Issues created so far, in creation order.
    pub fn issues(&self) -> Vec<MockIssue> {
        self.state().issues.clone()
    }

    /// Names passed to create_label calls, in call order.
    pub fn create_label_calls(&self) -> Vec<String> {
        self.state()
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::CreateLabel { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Titles passed to create_issue calls, in call order.
    pub fn create_issue_calls(&self) -> Vec<String> {
        self.state()
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::CreateIssue { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MockTrackerInner> {
        // A poisoned lock means a test already panicked.
        self.inner.lock().expect("mock tracker state poisoned")
    }
}

#[async_trait]
impl Tracker for MockTracker {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_labels(&self, repo: &RepoCoordinate) -> Result<Vec<Label>, TrackerError> {
        let mut inner = self.state();
        inner.operations.push(MockOperation::ListLabels {
            repo: repo.to_string(),
        });

        let failure = inner.fail_on.iter().find_map(|rule| match rule {
            FailOn::ListLabels(error) => Some(error.clone()),
            _ => None,
        });
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(inner.labels.clone())
    }

    async fn create_label(
        &self,
        repo: &RepoCoordinate,
        request: CreateLabelRequest,
    ) -> Result<LabelOutcome, TrackerError> {
        let mut inner = self.state();
        inner.operations.push(MockOperation::CreateLabel {
            repo: repo.to_string(),
            name: request.name.clone(),
            color: request.color.clone(),
            description: request.description.clone(),
        });

        let failure = inner.fail_on.iter().find_map(|rule| match rule {
            FailOn::CreateLabel { name, error } if name.eq_ignore_ascii_case(&request.name) => {
                Some(error.clone())
            }
            _ => None,
        });
        if let Some(error) = failure {
            return Err(error);
        }

        if inner
            .labels
            .iter()
            .any(|l| l.name.to_lowercase() == request.name.to_lowercase())
        {
            return Ok(LabelOutcome::AlreadyExists);
        }

        let label = Label {
            name: request.name,
            color: request.color,
        };
        inner.labels.push(label.clone());
        Ok(LabelOutcome::Created(label))
    }

    async fn create_issue(
        &self,
        repo: &RepoCoordinate,
        request: CreateIssueRequest,
    ) -> Result<IssueRef, TrackerError> {
        let mut inner = self.state();
        inner.operations.push(MockOperation::CreateIssue {
            repo: repo.to_string(),
            title: request.title.clone(),
            body: request.body.clone(),
            labels: request.labels.clone(),
        });

        let failure = inner.fail_on.iter().find_map(|rule| match rule {
            FailOn::CreateIssue { title, error } if *title == request.title => {
                Some(error.clone())
            }
            _ => None,
        });
        if let Some(error) = failure {
            return Err(error);
        }

        let number = inner.issues.len() as u64 + 1;
        inner.issues.push(MockIssue {
            number,
            title: request.title.clone(),
            body: request.body,
            labels: request.labels,
        });

        Ok(IssueRef {
            number,
            title: request.title,
        })
    }
}
