//! Property-based tests for label reconciliation and document ingestion.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashSet;

use proptest::prelude::*;

use backlog_blueprint::core::blueprint::Blueprint;
use backlog_blueprint::core::policy::CONTROL_LABELS;
use backlog_blueprint::core::types::RepoCoordinate;
use backlog_blueprint::reconcile::labels::{desired_labels, missing_labels};

/// Strategy for label-like names with mixed case.
fn label_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9:_-]{0,15}"
}

/// Flip the case of every ASCII letter.
fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn desired_always_contains_control_labels(doc in prop::collection::vec(label_name(), 0..20)) {
        let desired: HashSet<String> = desired_labels(&doc)
            .iter()
            .map(|l| l.to_lowercase())
            .collect();
        for control in CONTROL_LABELS {
            prop_assert!(desired.contains(control));
        }
    }

    #[test]
    fn desired_has_no_case_insensitive_duplicates(doc in prop::collection::vec(label_name(), 0..20)) {
        let desired = desired_labels(&doc);
        let lowered: HashSet<String> = desired.iter().map(|l| l.to_lowercase()).collect();
        prop_assert_eq!(lowered.len(), desired.len());
    }

    #[test]
    fn nothing_missing_once_all_exist_in_any_case(doc in prop::collection::vec(label_name(), 0..20)) {
        let desired = desired_labels(&doc);
        let existing: HashSet<String> = desired
            .iter()
            .map(|l| swap_case(l).to_lowercase())
            .collect();
        prop_assert!(missing_labels(&desired, &existing).is_empty());
    }

    #[test]
    fn missing_is_an_ordered_subset(
        doc in prop::collection::vec(label_name(), 0..20),
        present in prop::collection::vec(label_name(), 0..20),
    ) {
        let desired = desired_labels(&doc);
        let existing: HashSet<String> = present.iter().map(|l| l.to_lowercase()).collect();
        let missing = missing_labels(&desired, &existing);

        let mut cursor = desired.iter();
        for name in &missing {
            prop_assert!(!existing.contains(&name.to_lowercase()));
            prop_assert!(cursor.any(|d| d == name));
        }
    }

    #[test]
    fn child_titles_survive_ingestion(titles in prop::collection::vec("[a-zA-Z][a-zA-Z0-9 ]{0,20}", 0..10)) {
        let children: Vec<String> = titles.iter().map(|t| format!("'{}'", t)).collect();
        let doc = format!("epics:\n  - title: E\n    children: [{}]\n", children.join(", "));

        let result = Blueprint::parse(&doc).unwrap();
        prop_assert!(result.warnings.is_empty());
        prop_assert_eq!(&result.blueprint.epics[0].children, &titles);
    }

    #[test]
    fn repo_coordinate_display_parses_back(
        owner in "[a-zA-Z0-9][a-zA-Z0-9-]{0,20}",
        name in "[a-zA-Z0-9._-]{1,20}",
    ) {
        let repo = RepoCoordinate::new(&owner, &name).unwrap();
        let parsed = RepoCoordinate::parse(&repo.to_string()).unwrap();
        prop_assert_eq!(parsed, repo);
    }
}
