//! cli::commands::apply
//!
//! Apply a blueprint document to a repository.
//!
//! # Pre-flight
//!
//! Before any tracker request, in order:
//! 1. Load configuration
//! 2. Load the blueprint document
//! 3. Resolve the target repository
//! 4. Resolve the credential
//!
//! Any failure here exits non-zero with zero tracker requests.
//!
//! # Example
//!
//! ```bash
//! # Apply the default document using CI environment variables
//! blueprint apply
//!
//! # Preview only
//! blueprint apply --dry-run --repo octocat/hello-world
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::Context;
use crate::core::blueprint::Blueprint;
use crate::core::config::{self, schema, Config};
use crate::reconcile::{self, LabelSettings};
use crate::tracker::github::GitHubTracker;
use crate::ui::output;

/// Options for the apply command.
#[derive(Debug, Clone, Default)]
pub struct ApplyArgs {
    pub file: Option<PathBuf>,
    pub repo: Option<String>,
    pub api_base: Option<String>,
    pub dry_run: bool,
}

/// Run the apply command.
///
/// This is a synchronous wrapper that runs the async implementation on a
/// single-threaded runtime.
pub fn apply(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(apply_async(ctx, args))
}

async fn apply_async(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let config = Config::load(ctx.config.as_deref(), config::env_var)?;

    let path = config.document(args.file.as_deref());
    let loaded = Blueprint::load_with_warnings(&path)?;
    for warning in &loaded.warnings {
        output::warn(format!("skipped {}", warning), ctx.verbosity);
    }
    let blueprint = loaded.blueprint;

    let repo = config::resolve_repository(args.repo.as_deref(), config::env_var)?;
    let token = config::resolve_token(config::env_var)?;

    let api_base = config.api_base(args.api_base.as_deref(), config::env_var);
    schema::validate_api_base(&api_base)?;
    debug!(%api_base, document = %path.display(), "pre-flight complete");

    let tracker = GitHubTracker::with_api_base(token, api_base);

    if args.dry_run {
        let plan = reconcile::plan(&tracker, &repo, &blueprint)
            .await
            .with_context(|| format!("Failed to plan blueprint for {}", repo))?;
        output::result(format!("Plan for {}:", repo));
        output::result(plan.render());
        return Ok(());
    }

    reconcile::apply(
        &tracker,
        &repo,
        &blueprint,
        &LabelSettings::from(&config),
        ctx.verbosity,
    )
    .await
    .with_context(|| format!("Failed to apply blueprint to {}", repo))?;

    Ok(())
}
