//! core::policy
//!
//! Fixed reconciliation policy: control labels, label defaults, and the
//! issue title/body templates.
//!
//! Keeping these out of the reconcile logic lets the policy be read and
//! tested on its own.

/// Workflow-control labels ensured on every run regardless of the document.
pub const CONTROL_LABELS: [&str; 8] = [
    "epic",
    "type:feature",
    "type:bug",
    "phase:planning",
    "phase:development",
    "phase:validation",
    "quality-gate:passed",
    "quality-gate:failed",
];

/// Color given to labels created by the reconciler.
pub const DEFAULT_LABEL_COLOR: &str = "ededed";

/// Description given to labels created by the reconciler.
pub const DEFAULT_LABEL_DESCRIPTION: &str = "Managed by blueprint";

/// Labels attached to every epic issue.
pub const EPIC_LABELS: [&str; 2] = ["epic", "type:feature"];

/// Labels attached to every child issue.
pub const CHILD_LABELS: [&str; 2] = ["type:feature", "phase:planning"];

/// Suffix appended to an epic's title.
pub const EPIC_TITLE_SUFFIX: &str = " (EPIC)";

/// Note appended to an epic body. The tracker's native epic type cannot be
/// set through the issues API, so promotion is left to the user.
pub const EPIC_PROMOTION_NOTE: &str = "> Convert this issue into a Zenhub Epic in the Zenhub UI.";

/// Title of the issue that represents an epic.
pub fn epic_title(title: &str) -> String {
    format!("{}{}", title, EPIC_TITLE_SUFFIX)
}

/// Body of the issue that represents an epic.
pub fn epic_body(description: &str) -> String {
    format!("{}\n\n{}", description, EPIC_PROMOTION_NOTE)
}

/// Body of a child issue, linking back to its epic.
pub fn child_body(epic_number: u64) -> String {
    format!(
        "Part of Epic #{}\n\nAcceptance Criteria:\n- [ ] ",
        epic_number
    )
}

/// Owned copy of a fixed label list, as sent in issue requests.
pub fn label_list(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}
