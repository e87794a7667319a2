//! The `create` command

use colored::Colorize;

use cruft_core::{CreateOptions, Reconciler};

use crate::error::Result;
use crate::interactive::TerminalPrompter;

/// Render `template` into a new project.
pub fn run_create(template: &str, options: CreateOptions) -> Result<bool> {
    let mut reconciler = Reconciler::new();
    if !options.no_input {
        reconciler = reconciler.with_prompter(Box::new(TerminalPrompter));
    }

    let project_dir = reconciler.create(template, &options)?;
    println!(
        "{} Created project at {}",
        "OK".green().bold(),
        project_dir.display().to_string().cyan()
    );
    Ok(true)
}
