//! completion command - Generate shell completion scripts

use std::io::Write;

use crate::cli::args::{Cli, Shell};
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    write_completion(shell, &mut std::io::stdout().lock())
}

/// Write the completion script for `shell` to `out`.
pub fn write_completion(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &bin, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &bin, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, &bin, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &bin, out),
    }

    out.flush()?;
    Ok(())
}
