//! core::blueprint
//!
//! The declarative backlog document and its loader.
//!
//! # Document shape
//!
//! ```yaml
//! labels:
//!   - release
//!   - area:auth
//! epics:
//!   - title: Login
//!     description: Users can sign in with email and password.
//!     children:
//!       - Add form
//!       - Add validation
//! ```
//!
//! # Ingestion rules
//!
//! The document itself must be well formed: a YAML mapping whose `labels` and
//! `epics` keys, when present, hold sequences. Individual entries are ingested
//! permissively. A label that is not a string, an epic without a string
//! `title`, or a child that is not a string is skipped and reported as a
//! [`BlueprintWarning`] instead of failing the load.
//!
//! # Example
//!
//! ```
//! use backlog_blueprint::core::blueprint::Blueprint;
//!
//! let result = Blueprint::parse(
//!     "labels: [release]\nepics:\n  - title: Login\n    children: [Add form, 7]\n",
//! )
//! .unwrap();
//!
//! assert_eq!(result.blueprint.labels, vec!["release".to_string()]);
//! assert_eq!(result.blueprint.epics[0].children, vec!["Add form".to_string()]);
//! assert_eq!(result.warnings.len(), 1);
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

/// Origin reported for documents parsed from memory.
const INLINE_ORIGIN: &str = "<inline>";

/// Errors from loading a blueprint document.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("blueprint document not found at '{0}'")]
    DocumentNotFound(PathBuf),

    #[error("failed to read blueprint document '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed blueprint document '{origin}': {message}")]
    DocumentMalformed { origin: String, message: String },
}

/// An entry skipped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintWarning {
    /// Where in the document the entry sits (e.g. `epics[1].children[0]`).
    pub location: String,
    /// Why it was skipped.
    pub message: String,
}

impl fmt::Display for BlueprintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// One epic and the titles of its child issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicSpec {
    pub title: String,
    pub description: String,
    /// Child issue titles, in creation order.
    pub children: Vec<String>,
}

/// The desired backlog: labels plus epics with their children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blueprint {
    /// Document-declared labels, de-duplicated, in document order.
    pub labels: Vec<String>,
    /// Epics in document order.
    pub epics: Vec<EpicSpec>,
}

/// Result of loading a blueprint.
#[derive(Debug)]
pub struct BlueprintLoadResult {
    /// The loaded blueprint.
    pub blueprint: Blueprint,
    /// Entries that were skipped during ingestion.
    pub warnings: Vec<BlueprintWarning>,
}

impl Blueprint {
    /// Load a blueprint from a YAML file, discarding skipped-entry warnings.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if `path` does not exist
    /// - `Read` if the file exists but cannot be read
    /// - `DocumentMalformed` if the content does not have the expected shape
    pub fn load(path: &Path) -> Result<Blueprint, BlueprintError> {
        Self::load_with_warnings(path).map(|result| result.blueprint)
    }

    /// Load a blueprint from a YAML file, keeping skipped-entry warnings.
    ///
    /// # Errors
    ///
    /// Same as [`Blueprint::load`].
    pub fn load_with_warnings(path: &Path) -> Result<BlueprintLoadResult, BlueprintError> {
        if !path.exists() {
            return Err(BlueprintError::DocumentNotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| BlueprintError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let origin = path.display().to_string();

        let content = String::from_utf8(bytes).map_err(|e| BlueprintError::DocumentMalformed {
            origin: origin.clone(),
            message: format!("not valid UTF-8: {}", e.utf8_error()),
        })?;

        debug!(path = %path.display(), bytes = content.len(), "loading blueprint");
        Self::parse_from(&content, &origin)
    }

    /// Parse a blueprint from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `DocumentMalformed` if the content does not have the expected shape.
    pub fn parse(content: &str) -> Result<BlueprintLoadResult, BlueprintError> {
        Self::parse_from(content, INLINE_ORIGIN)
    }

    fn parse_from(content: &str, origin: &str) -> Result<BlueprintLoadResult, BlueprintError> {
        let malformed = |message: String| BlueprintError::DocumentMalformed {
            origin: origin.to_string(),
            message,
        };

        let doc: Value = serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;
        if !doc.is_mapping() {
            return Err(malformed(format!(
                "top level must be a mapping, found {}",
                kind_of(&doc)
            )));
        }

        let mut warnings = Vec::new();
        let labels = ingest_labels(doc.get("labels"), &mut warnings).map_err(malformed)?;
        let epics = ingest_epics(doc.get("epics"), &mut warnings).map_err(malformed)?;

        for warning in &warnings {
            debug!(%warning, "skipped blueprint entry");
        }

        Ok(BlueprintLoadResult {
            blueprint: Blueprint { labels, epics },
            warnings,
        })
    }

    /// Total number of child issues across all epics.
    pub fn child_count(&self) -> usize {
        self.epics.iter().map(|e| e.children.len()).sum()
    }

    /// Total number of issues a full apply creates (epics plus children).
    pub fn issue_count(&self) -> usize {
        self.epics.len() + self.child_count()
    }
}

/// Fetch an optional top-level sequence. `null` or absent means empty.
fn sequence<'a>(value: Option<&'a Value>, key: &str) -> Result<&'a [Value], String> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items.as_slice()),
        Some(other) => Err(format!(
            "'{}' must be a sequence, found {}",
            key,
            kind_of(other)
        )),
    }
}

fn ingest_labels(
    value: Option<&Value>,
    warnings: &mut Vec<BlueprintWarning>,
) -> Result<Vec<String>, String> {
    let mut labels: Vec<String> = Vec::new();

    for (i, item) in sequence(value, "labels")?.iter().enumerate() {
        match item.as_str() {
            Some(name) if !name.trim().is_empty() => {
                if !labels.iter().any(|l| l == name) {
                    labels.push(name.to_string());
                }
            }
            Some(_) => warnings.push(BlueprintWarning {
                location: format!("labels[{}]", i),
                message: "label name is empty".into(),
            }),
            None => warnings.push(BlueprintWarning {
                location: format!("labels[{}]", i),
                message: format!("label entry is not a string ({})", kind_of(item)),
            }),
        }
    }

    Ok(labels)
}

fn ingest_epics(
    value: Option<&Value>,
    warnings: &mut Vec<BlueprintWarning>,
) -> Result<Vec<EpicSpec>, String> {
    let mut epics = Vec::new();

    for (i, item) in sequence(value, "epics")?.iter().enumerate() {
        let location = format!("epics[{}]", i);

        if !item.is_mapping() {
            warnings.push(BlueprintWarning {
                location,
                message: format!("epic entry is not a mapping ({})", kind_of(item)),
            });
            continue;
        }

        let title = match item.get("title").and_then(Value::as_str) {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => {
                warnings.push(BlueprintWarning {
                    location,
                    message: "epic has no title".into(),
                });
                continue;
            }
        };

        let description = match item.get("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                warnings.push(BlueprintWarning {
                    location: format!("{}.description", location),
                    message: format!("description is not a string ({}), using empty", kind_of(other)),
                });
                String::new()
            }
        };

        let mut children = Vec::new();
        match item.get("children") {
            None | Some(Value::Null) => {}
            Some(Value::Sequence(items)) => {
                for (j, child) in items.iter().enumerate() {
                    match child.as_str() {
                        Some(child_title) => children.push(child_title.to_string()),
                        None => warnings.push(BlueprintWarning {
                            location: format!("{}.children[{}]", location, j),
                            message: format!("child entry is not a string ({})", kind_of(child)),
                        }),
                    }
                }
            }
            Some(other) => warnings.push(BlueprintWarning {
                location: format!("{}.children", location),
                message: format!("children is not a sequence ({}), ignoring", kind_of(other)),
            }),
        }

        epics.push(EpicSpec {
            title,
            description,
            children,
        });
    }

    Ok(epics)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
