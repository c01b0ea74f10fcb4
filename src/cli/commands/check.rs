//! cli::commands::check
//!
//! Validate a blueprint document offline.

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::core::blueprint::Blueprint;
use crate::core::config::{self, Config};
use crate::reconcile::labels;
use crate::ui::output;

/// Run the check command.
pub fn check(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let config = Config::load(ctx.config.as_deref(), config::env_var)?;
    let path = config.document(file);
    let loaded = Blueprint::load_with_warnings(&path)?;

    for warning in &loaded.warnings {
        output::warn(format!("skipped {}", warning), ctx.verbosity);
    }

    let blueprint = &loaded.blueprint;
    let desired = labels::desired_labels(&blueprint.labels);

    output::print(format!("{}: ok", path.display()), ctx.verbosity);
    output::print(
        format!(
            "Labels: {} declared, {} with control labels",
            blueprint.labels.len(),
            desired.len()
        ),
        ctx.verbosity,
    );
    output::print(
        format!(
            "Epics: {} ({} child issue(s), {} issue(s) total)",
            blueprint.epics.len(),
            blueprint.child_count(),
            blueprint.issue_count()
        ),
        ctx.verbosity,
    );
    for epic in &blueprint.epics {
        output::print(
            format!("  {} [{}]", epic.title, epic.children.len()),
            ctx.verbosity,
        );
    }

    Ok(())
}
