//! tracker::github
//!
//! GitHub tracker implementation using the REST API.
//!
//! # Design
//!
//! Three endpoints are consumed:
//! - `GET /repos/{owner}/{repo}/labels?per_page=100&page=N`
//! - `POST /repos/{owner}/{repo}/labels`
//! - `POST /repos/{owner}/{repo}/issues`
//!
//! Every request carries a bearer token, the GitHub JSON media type, a
//! User-Agent (GitHub rejects requests without one) and the pinned REST API
//! version header.
//!
//! # Errors
//!
//! Non-2xx responses become [`TrackerError::Api`] with the method, path,
//! status and raw body. There are no retries; each failure is reported once.
//!
//! # Example
//!
//! ```ignore
//! use backlog_blueprint::core::config::Token;
//! use backlog_blueprint::core::types::RepoCoordinate;
//! use backlog_blueprint::tracker::{github::GitHubTracker, Tracker};
//!
//! let tracker = GitHubTracker::new(Token::new("ghp_xxx"));
//! let repo = RepoCoordinate::parse("octocat/hello-world")?;
//! for label in tracker.list_labels(&repo).await? {
//!     println!("{} #{}", label.name, label.color);
//! }
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{
    CreateIssueRequest, CreateLabelRequest, IssueRef, Label, LabelOutcome, Method, Tracker,
    TrackerError,
};
use crate::core::config::{Token, DEFAULT_API_BASE};
use crate::core::types::RepoCoordinate;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "backlog-blueprint";

/// Labels requested per page (GitHub's maximum).
const LABELS_PER_PAGE: usize = 100;

/// Upper bound on label pages fetched in one listing.
const MAX_LABEL_PAGES: u32 = 10;

/// Error code GitHub reports when a label name is taken.
const ALREADY_EXISTS_CODE: &str = "already_exists";

/// GitHub tracker.
pub struct GitHubTracker {
    /// HTTP client for making requests
    client: Client,
    /// Bearer credential
    token: Token,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubTracker")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubTracker {
    /// Create a tracker against `https://api.github.com`.
    pub fn new(token: Token) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a tracker against a custom API base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token or Actions token
    /// * `api_base` - e.g. `https://github.example.com/api/v3`
    pub fn with_api_base(token: Token, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, TrackerError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token.expose()))
            .map_err(|_| TrackerError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build the API path for a repository endpoint.
    fn repo_path(repo: &RepoCoordinate, path: &str) -> String {
        format!("/repos/{}/{}/{}", repo.owner(), repo.name(), path)
    }

    /// Send a request and return the response if its status is 2xx.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, TrackerError> {
        let url = format!("{}{}", self.api_base, path);
        let request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .headers(self.headers()?);

        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await.map_err(|e| TrackerError::Transport {
            method,
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "tracker request");

        if status.is_success() {
            Ok(response)
        } else {
            // Body text is best effort; the status alone is still reported.
            let body = response.text().await.unwrap_or_default();
            Err(TrackerError::Api {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Decode a successful response body.
    async fn decode<T: for<'de> Deserialize<'de>>(
        method: Method,
        path: &str,
        response: Response,
    ) -> Result<T, TrackerError> {
        response.json().await.map_err(|e| TrackerError::Decode {
            method,
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Whether a 422 body reports a name conflict.
fn is_already_exists(body: &str) -> bool {
    serde_json::from_str::<GitHubErrorResponse>(body)
        .map(|err| err.errors.iter().any(|e| e.code == ALREADY_EXISTS_CODE))
        .unwrap_or(false)
}

#[async_trait]
impl Tracker for GitHubTracker {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_labels(&self, repo: &RepoCoordinate) -> Result<Vec<Label>, TrackerError> {
        let mut labels = Vec::new();

        for page in 1..=MAX_LABEL_PAGES {
            let path = Self::repo_path(
                repo,
                &format!("labels?per_page={}&page={}", LABELS_PER_PAGE, page),
            );
            let response = self.send::<()>(Method::Get, &path, None).await?;
            let page_labels: Vec<GitHubLabel> = Self::decode(Method::Get, &path, response).await?;

            let page_count = page_labels.len();
            labels.extend(page_labels.into_iter().map(Label::from));

            if page_count < LABELS_PER_PAGE {
                break;
            }
        }

        debug!(repo = %repo, count = labels.len(), "listed labels");
        Ok(labels)
    }

    async fn create_label(
        &self,
        repo: &RepoCoordinate,
        request: CreateLabelRequest,
    ) -> Result<LabelOutcome, TrackerError> {
        let path = Self::repo_path(repo, "labels");
        let body = CreateLabelBody {
            name: &request.name,
            color: &request.color,
            description: &request.description,
        };

        match self.send(Method::Post, &path, Some(&body)).await {
            Ok(response) => {
                let label: GitHubLabel = Self::decode(Method::Post, &path, response).await?;
                Ok(LabelOutcome::Created(label.into()))
            }
            Err(TrackerError::Api { status: 422, body, .. }) if is_already_exists(&body) => {
                debug!(label = %request.name, "label already exists");
                Ok(LabelOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    async fn create_issue(
        &self,
        repo: &RepoCoordinate,
        request: CreateIssueRequest,
    ) -> Result<IssueRef, TrackerError> {
        let path = Self::repo_path(repo, "issues");
        let body = CreateIssueBody {
            title: &request.title,
            body: &request.body,
            labels: &request.labels,
        };

        let response = self.send(Method::Post, &path, Some(&body)).await?;
        let issue: GitHubIssue = Self::decode(Method::Post, &path, response).await?;
        Ok(issue.into())
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a label.
#[derive(Serialize)]
struct CreateLabelBody<'a> {
    name: &'a str,
    color: &'a str,
    description: &'a str,
}

/// Request body for creating an issue.
#[derive(Serialize)]
struct CreateIssueBody<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

/// Label from the GitHub API.
#[derive(Deserialize)]
struct GitHubLabel {
    name: String,
    #[serde(default)]
    color: String,
}

impl From<GitHubLabel> for Label {
    fn from(gh: GitHubLabel) -> Self {
        Label {
            name: gh.name,
            color: gh.color,
        }
    }
}

/// Issue from the GitHub API.
#[derive(Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
}

impl From<GitHubIssue> for IssueRef {
    fn from(gh: GitHubIssue) -> Self {
        IssueRef {
            number: gh.number,
            title: gh.title,
        }
    }
}

/// Error response from the GitHub API.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

/// Entry of a validation error's `errors` array.
#[derive(Deserialize)]
struct GitHubErrorDetail {
    #[serde(default)]
    code: String,
}
