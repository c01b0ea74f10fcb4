//! core::config
//!
//! Configuration loading and run-setting resolution.
//!
//! # Overview
//!
//! A run needs three things before it may talk to the tracker:
//! - the target repository ([`resolve_repository`])
//! - a credential ([`resolve_token`])
//! - the API base URL ([`Config::api_base`])
//!
//! Everything else (document path, label color and description) has a
//! default and may be overridden by the config file.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment variables
//! 4. CLI flags
//!
//! # Environment
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GITHUB_TOKEN`, `GH_TOKEN`, `GITHUB_PAT` | Credential, first non-empty wins |
//! | `GITHUB_REPOSITORY` | Combined `owner/name` |
//! | `OWNER`, `REPO` | Discrete fallback when `GITHUB_REPOSITORY` is unset |
//! | `GITHUB_API_URL` | API base override |
//! | `BLUEPRINT_CONFIG` | Config file path |
//!
//! Empty variables are treated as unset.
//!
//! # Example
//!
//! ```no_run
//! use backlog_blueprint::core::config::{self, Config};
//!
//! let settings = Config::load(None, config::env_var).unwrap();
//! let repo = config::resolve_repository(None, config::env_var).unwrap();
//! let token = config::resolve_token(config::env_var).unwrap();
//! println!("Applying to {} via {}", repo, settings.api_base(None, config::env_var));
//! # let _ = token;
//! ```

pub mod schema;

pub use schema::{FileConfig, LabelDefaults};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::policy;
use crate::core::types::RepoCoordinate;

/// Credential variables, in priority order.
pub const TOKEN_VARS: [&str; 3] = ["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_PAT"];

/// Combined `owner/name` repository variable.
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";

/// Discrete repository owner variable.
pub const OWNER_VAR: &str = "OWNER";

/// Discrete repository name variable.
pub const REPO_VAR: &str = "REPO";

/// API base override variable.
pub const API_URL_VAR: &str = "GITHUB_API_URL";

/// Config file path variable.
pub const CONFIG_VAR: &str = "BLUEPRINT_CONFIG";

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default blueprint document, relative to the working directory.
pub const DEFAULT_DOCUMENT: &str = "zenhub/blueprint.yml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("repository not resolved: {0}. Set GITHUB_REPOSITORY=owner/repo, or OWNER and REPO, or pass --repo")]
    RepositoryUnresolved(String),

    #[error("credential missing: set one of {}", TOKEN_VARS.join(", "))]
    CredentialMissing,

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Read an environment variable, treating empty values as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// A tracker credential.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Resolve the credential from the first non-empty of [`TOKEN_VARS`].
///
/// # Errors
///
/// Returns `ConfigError::CredentialMissing` if none is set.
pub fn resolve_token<F>(lookup: F) -> Result<Token, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_VARS
        .iter()
        .find_map(|&name| {
            lookup(name).map(|value| {
                debug!(source = name, "resolved credential");
                Token::new(value.trim())
            })
        })
        .ok_or(ConfigError::CredentialMissing)
}

/// Resolve the target repository.
///
/// An explicit `--repo` value wins; then `GITHUB_REPOSITORY`; then the
/// `OWNER` and `REPO` pair.
///
/// # Errors
///
/// Returns `ConfigError::RepositoryUnresolved` if no form is present or the
/// chosen form is malformed.
pub fn resolve_repository<F>(flag: Option<&str>, lookup: F) -> Result<RepoCoordinate, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = flag {
        return RepoCoordinate::parse(value)
            .map_err(|e| ConfigError::RepositoryUnresolved(format!("--repo: {}", e)));
    }

    if let Some(value) = lookup(REPOSITORY_VAR) {
        return RepoCoordinate::parse(&value)
            .map_err(|e| ConfigError::RepositoryUnresolved(format!("{}: {}", REPOSITORY_VAR, e)));
    }

    match (lookup(OWNER_VAR), lookup(REPO_VAR)) {
        (Some(owner), Some(name)) => RepoCoordinate::new(owner, name)
            .map_err(|e| ConfigError::RepositoryUnresolved(e.to_string())),
        (Some(_), None) => Err(ConfigError::RepositoryUnresolved(format!(
            "{} is set but {} is not",
            OWNER_VAR, REPO_VAR
        ))),
        (None, Some(_)) => Err(ConfigError::RepositoryUnresolved(format!(
            "{} is set but {} is not",
            REPO_VAR, OWNER_VAR
        ))),
        (None, None) => Err(ConfigError::RepositoryUnresolved(format!(
            "{} is not set",
            REPOSITORY_VAR
        ))),
    }
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file (defaults if none was found)
    pub file: FileConfig,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. An explicitly requested file that does not exist is an
    /// error; a missing file at a standard location is not.
    pub fn load<F>(explicit: Option<&Path>, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::locate(&lookup),
        };

        let Some(path) = path else {
            debug!("no config file found, using defaults");
            return Ok(Config::default());
        };

        let file = Self::read_file(&path)?;
        file.validate()?;
        debug!(path = %path.display(), "loaded config");

        Ok(Config {
            file,
            path: Some(path),
        })
    }

    /// Find the first existing config file at a standard location.
    fn locate<F>(lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An explicitly named file is returned even if missing so the read
        // error reaches the user.
        if let Some(path) = lookup(CONFIG_VAR) {
            return Some(PathBuf::from(path));
        }

        if let Some(xdg_home) = lookup("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("blueprint/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let home = lookup("HOME").map(PathBuf::from).or_else(dirs::home_dir)?;
        let path = home.join(".blueprint/config.toml");
        path.exists().then_some(path)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Blueprint document path: flag, then config file, then default.
    pub fn document(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.file.document.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT))
    }

    /// API base URL: flag, then `GITHUB_API_URL`, then config file, then default.
    ///
    /// Trailing slashes are removed.
    pub fn api_base<F>(&self, flag: Option<&str>, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = flag
            .map(str::to_string)
            .or_else(|| lookup(API_URL_VAR))
            .or_else(|| self.file.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        base.trim_end_matches('/').to_string()
    }

    /// Color for created labels.
    pub fn label_color(&self) -> &str {
        self.file
            .labels
            .as_ref()
            .and_then(|l| l.color.as_deref())
            .unwrap_or(policy::DEFAULT_LABEL_COLOR)
    }

    /// Description for created labels.
    pub fn label_description(&self) -> &str {
        self.file
            .labels
            .as_ref()
            .and_then(|l| l.description.as_deref())
            .unwrap_or(policy::DEFAULT_LABEL_DESCRIPTION)
    }
}
