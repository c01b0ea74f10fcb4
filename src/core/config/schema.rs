//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Location
//!
//! Searched in order:
//! 1. `--config <path>`
//! 2. `$BLUEPRINT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/blueprint/config.toml`
//! 4. `~/.blueprint/config.toml`
//!
//! # Validation
//!
//! Values are validated after parsing so a bad color or API URL is reported
//! before any network call.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Contents of the config file.
///
/// # Example
///
/// ```toml
/// document = "planning/blueprint.yml"
/// api_base = "https://github.example.com/api/v3"
///
/// [labels]
/// color = "c5def5"
/// description = "Managed by the planning blueprint"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Default blueprint document path
    pub document: Option<PathBuf>,

    /// Tracker API base URL (GitHub Enterprise)
    pub api_base: Option<String>,

    /// Defaults for labels the reconciler creates
    pub labels: Option<LabelDefaults>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api_base) = &self.api_base {
            validate_api_base(api_base)?;
        }

        if let Some(labels) = &self.labels {
            labels.validate()?;
        }

        Ok(())
    }
}

/// Metadata applied to created labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LabelDefaults {
    /// Six hex digits, without the leading `#`
    pub color: Option<String>,

    /// Label description
    pub description: Option<String>,
}

impl LabelDefaults {
    /// Validate label defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(color) = &self.color {
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid label color '{}', expected six hex digits like 'ededed'",
                    color
                )));
            }
        }
        Ok(())
    }
}

/// Check that an API base is an absolute http(s) URL.
pub fn validate_api_base(api_base: &str) -> Result<(), ConfigError> {
    if api_base.starts_with("https://") || api_base.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "invalid api_base '{}', must start with http:// or https://",
            api_base
        )))
    }
}
