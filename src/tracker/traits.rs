//! tracker::traits
//!
//! Tracker trait definition for the remote issue tracker.
//!
//! # Design
//!
//! The `Tracker` trait is async because every operation is a network call.
//! Operations are idempotent at the HTTP level but the client does not
//! deduplicate anything itself: creating the same issue twice creates two
//! issues.
//!
//! Label creation distinguishes a conflict (the label already exists) from
//! a failure through [`LabelOutcome`], so callers never inspect error text.
//!
//! # Example
//!
//! ```ignore
//! use backlog_blueprint::tracker::{CreateIssueRequest, Tracker, TrackerError};
//! use backlog_blueprint::core::types::RepoCoordinate;
//!
//! async fn file_bug(tracker: &dyn Tracker, repo: &RepoCoordinate) -> Result<(), TrackerError> {
//!     let issue = tracker
//!         .create_issue(
//!             repo,
//!             CreateIssueRequest {
//!                 title: "Crash on save".to_string(),
//!                 body: "Steps to reproduce...".to_string(),
//!                 labels: vec!["type:bug".to_string()],
//!             },
//!         )
//!         .await?;
//!     println!("Created #{}", issue.number);
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::RepoCoordinate;

/// HTTP method of a failed request, kept for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Errors from tracker operations.
///
/// Every variant carries the method and path of the request so a single
/// log line identifies the failing call.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The tracker answered with a non-2xx status.
    #[error("{method} {path} failed: {status} :: {body}")]
    Api {
        method: Method,
        path: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced an HTTP response.
    #[error("{method} {path} failed: network error: {message}")]
    Transport {
        method: Method,
        path: String,
        message: String,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("{method} {path} returned an unreadable response: {message}")]
    Decode {
        method: Method,
        path: String,
        message: String,
    },

    /// The credential cannot be placed in an HTTP header.
    #[error("credential contains characters not allowed in an HTTP header")]
    InvalidCredential,
}

impl TrackerError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A label as reported by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    /// Hex color without `#`
    pub color: String,
}

/// Request to create a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLabelRequest {
    pub name: String,
    /// Hex color without `#`
    pub color: String,
    pub description: String,
}

/// Result of a label creation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    /// The label was created.
    Created(Label),
    /// The tracker already has a label with this name.
    AlreadyExists,
}

/// Request to create an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    pub title: String,
    pub body: String,
    /// Label names to attach
    pub labels: Vec<String>,
}

/// A created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// Issue number assigned by the tracker
    pub number: u64,
    pub title: String,
}

/// The Tracker trait for the remote issue tracker.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a tracker can be shared as
/// `&dyn Tracker` across the reconcile phases.
///
/// # Error Handling
///
/// All methods return `Result<T, TrackerError>`. Non-2xx responses surface
/// as `Api` with the status and body; connection problems as `Transport`.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Get the tracker name (e.g., "github").
    fn name(&self) -> &'static str;

    /// List the repository's labels.
    ///
    /// Implementations follow pagination up to a fixed page cap; label
    /// volume is expected to be small.
    async fn list_labels(&self, repo: &RepoCoordinate) -> Result<Vec<Label>, TrackerError>;

    /// Create a label.
    ///
    /// # Returns
    ///
    /// `LabelOutcome::AlreadyExists` when the tracker reports a name conflict.
    ///
    /// # Errors
    ///
    /// Any other non-2xx response or transport problem.
    async fn create_label(
        &self,
        repo: &RepoCoordinate,
        request: CreateLabelRequest,
    ) -> Result<LabelOutcome, TrackerError>;

    /// Create an issue.
    ///
    /// # Returns
    ///
    /// The created issue's number and title.
    async fn create_issue(
        &self,
        repo: &RepoCoordinate,
        request: CreateIssueRequest,
    ) -> Result<IssueRef, TrackerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(format!("{}", Method::Get), "GET");
        assert_eq!(format!("{}", Method::Post), "POST");
    }

    #[test]
    fn tracker_error_display() {
        assert_eq!(
            format!(
                "{}",
                TrackerError::Api {
                    method: Method::Post,
                    path: "/repos/o/r/issues".into(),
                    status: 422,
                    body: "{\"message\":\"Validation Failed\"}".into(),
                }
            ),
            "POST /repos/o/r/issues failed: 422 :: {\"message\":\"Validation Failed\"}"
        );
        assert_eq!(
            format!(
                "{}",
                TrackerError::Transport {
                    method: Method::Get,
                    path: "/repos/o/r/labels".into(),
                    message: "connection refused".into(),
                }
            ),
            "GET /repos/o/r/labels failed: network error: connection refused"
        );
        assert!(format!("{}", TrackerError::InvalidCredential).contains("HTTP header"));
    }

    #[test]
    fn status_only_for_api_errors() {
        let api = TrackerError::Api {
            method: Method::Get,
            path: "/x".into(),
            status: 500,
            body: String::new(),
        };
        assert_eq!(api.status(), Some(500));

        let transport = TrackerError::Transport {
            method: Method::Get,
            path: "/x".into(),
            message: "timeout".into(),
        };
        assert_eq!(transport.status(), None);
    }
}
