//! The `completions` command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::error::Result;

/// Write a completion script for `shell` to stdout.
pub fn run_completions(shell: Shell) -> Result<bool> {
    clap_complete::generate(shell, &mut Cli::command(), "cruft", &mut std::io::stdout());
    Ok(true)
}
