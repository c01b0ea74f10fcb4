//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoCoordinate`] - Validated `owner/name` pair identifying a repository
//!
//! # Validation
//!
//! These types enforce validity at construction time. A coordinate with an
//! empty owner or name cannot be represented, so no tracker call is ever
//! issued against a half-resolved repository.
//!
//! # Examples
//!
//! ```
//! use backlog_blueprint::core::types::RepoCoordinate;
//!
//! let repo = RepoCoordinate::parse("octocat/hello-world").unwrap();
//! assert_eq!(repo.owner(), "octocat");
//! assert_eq!(repo.name(), "hello-world");
//!
//! assert!(RepoCoordinate::parse("octocat").is_err());
//! assert!(RepoCoordinate::new("", "hello-world").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository coordinate: {0}")]
    InvalidRepoCoordinate(String),
}

/// A repository on the tracker, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoCoordinate {
    owner: String,
    name: String,
}

impl RepoCoordinate {
    /// Create a coordinate from discrete owner and name parts.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoCoordinate` if either part is empty or
    /// contains a `/`.
    pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Result<Self, TypeError> {
        let owner = owner.as_ref().trim();
        let name = name.as_ref().trim();

        if owner.is_empty() {
            return Err(TypeError::InvalidRepoCoordinate(
                "owner cannot be empty".into(),
            ));
        }
        if name.is_empty() {
            return Err(TypeError::InvalidRepoCoordinate(
                "repository name cannot be empty".into(),
            ));
        }
        if owner.contains('/') || name.contains('/') {
            return Err(TypeError::InvalidRepoCoordinate(format!(
                "'{}/{}' has too many path segments",
                owner, name
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse the combined `owner/name` form.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoCoordinate` if the value is not exactly
    /// two non-empty segments separated by `/`.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        match value.trim().split_once('/') {
            Some((owner, name)) => Self::new(owner, name),
            None => Err(TypeError::InvalidRepoCoordinate(format!(
                "expected 'owner/name', got '{}'",
                value
            ))),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for RepoCoordinate {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RepoCoordinate> for String {
    fn from(repo: RepoCoordinate) -> Self {
        repo.to_string()
    }
}
