//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Delegate to command handlers
//!
//! The CLI layer is thin. Loading, resolution, and reconciliation live in
//! [`crate::core`] and [`crate::reconcile`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::ui::output::Verbosity;

/// Settings shared by every command, taken from the global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file (`--config`)
    pub config: Option<PathBuf>,
    /// Progress output level
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let ctx = Context {
        config: cli.config.clone(),
        verbosity: Verbosity::from_flags(cli.quiet),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--debug`.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(debug)));

    // A subscriber may already be installed when run from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log level used when `RUST_LOG` is unset.
fn default_log_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}
