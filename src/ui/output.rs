//! ui::output
//!
//! Console output for a blueprint run.
//!
//! Progress lines (labels created, issues created, the summary) go to
//! stdout. Warnings and errors go to stderr with a fixed prefix so CI logs
//! can be grepped. `--quiet` silences everything except errors and a
//! command's requested result (the dry-run plan).
//! Diagnostics belong in `tracing`, not here.

use std::fmt::Display;

use crate::tracker::IssueRef;

/// How much the run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Progress, warnings, and summary
    #[default]
    Normal,
}

impl Verbosity {
    /// `--quiet` maps to [`Verbosity::Quiet`].
    pub fn from_flags(quiet: bool) -> Self {
        match quiet {
            true => Verbosity::Quiet,
            false => Verbosity::Normal,
        }
    }

    /// Whether progress lines and warnings are shown.
    pub fn is_chatty(self) -> bool {
        matches!(self, Verbosity::Normal)
    }
}

/// Progress line on stdout.
pub fn print(line: impl Display, verbosity: Verbosity) {
    if verbosity.is_chatty() {
        println!("{line}");
    }
}

/// Command result on stdout. Shown even with `--quiet`.
pub fn result(line: impl Display) {
    println!("{line}");
}

/// Warning on stderr, silenced by `--quiet`.
pub fn warn(line: impl Display, verbosity: Verbosity) {
    if verbosity.is_chatty() {
        eprintln!("warning: {line}");
    }
}

/// Error on stderr. Never silenced.
pub fn error(line: impl Display) {
    eprintln!("error: {line}");
}

/// `#<number> <title>`
pub fn format_issue(issue: &IssueRef) -> String {
    format!("#{} {}", issue.number, issue.title)
}

/// One line per item, each with `prefix`.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    let lines: Vec<String> = items.iter().map(|item| format!("{prefix}{item}")).collect();
    lines.join("\n")
}
