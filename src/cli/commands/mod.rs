//! cli::commands
//!
//! Command handlers. Each handler is synchronous; commands that talk to the
//! tracker build their own runtime.

mod apply;
mod check;
mod completion;

pub use apply::{apply, ApplyArgs};
pub use check::check;
pub use completion::completion;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Apply {
            file,
            repo,
            api_base,
            dry_run,
        } => apply::apply(
            ctx,
            ApplyArgs {
                file,
                repo,
                api_base,
                dry_run,
            },
        ),
        Command::Check { file } => check::check(ctx, file.as_deref()),
        Command::Completion { shell } => completion::completion(shell),
    }
}
