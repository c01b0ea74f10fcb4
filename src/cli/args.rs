//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read settings from this config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blueprint - apply a declarative backlog to a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read settings from this config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only; no progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Usage errors exit with code 1 like every other fatal error; `--help`
    /// and `--version` exit 0.
    pub fn parse_args() -> Self {
        Self::try_parse().unwrap_or_else(|err| {
            let _ = err.print();
            std::process::exit(usage_exit_code(&err))
        })
    }
}

/// Exit code for a clap parse outcome.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing labels, epics, and child issues from a blueprint
    #[command(
        name = "apply",
        long_about = "Apply a blueprint document to a GitHub repository.\n\n\
            Ensures every label in the document, plus the fixed workflow-control \
            labels, exists on the repository. Then creates one issue per epic and \
            one issue per child, each child linking back to its epic's number.\n\n\
            Label creation failures are reported as warnings. Any issue creation \
            failure stops the run with exit code 1.",
        after_help = "\
ENVIRONMENT:
    GITHUB_TOKEN, GH_TOKEN, GITHUB_PAT   credential (first set wins)
    GITHUB_REPOSITORY                    target as owner/repo
    OWNER, REPO                          target when GITHUB_REPOSITORY is unset
    GITHUB_API_URL                       API base (GitHub Enterprise)

WORKFLOW EXAMPLES:
    # Inside GitHub Actions (token and repository are provided)
    blueprint apply

    # Preview what would be created
    blueprint apply --dry-run

    # Explicit document and repository
    blueprint apply --file planning/blueprint.yml --repo octocat/hello-world"
    )]
    Apply {
        /// Blueprint document [default: zenhub/blueprint.yml]
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Target repository, overriding the environment
        #[arg(long, value_name = "OWNER/NAME")]
        repo: Option<String>,

        /// Tracker API base URL
        #[arg(long, value_name = "URL")]
        api_base: Option<String>,

        /// List labels and print the plan without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a blueprint document without contacting the tracker
    #[command(
        name = "check",
        long_about = "Load and validate a blueprint document offline.\n\n\
            Prints the labels and epics that would be applied, and a warning for \
            every entry that apply would skip (non-string labels or children, \
            epics without a title)."
    )]
    Check {
        /// Blueprint document [default: zenhub/blueprint.yml]
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    blueprint completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    blueprint completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
