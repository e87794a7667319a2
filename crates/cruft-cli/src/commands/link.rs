//! The `link` command

use colored::Colorize;

use cruft_core::{LinkOptions, Reconciler};

use crate::error::Result;
use crate::interactive::TerminalPrompter;

/// Record `template` as the origin of an existing project.
pub fn run_link(template: &str, options: LinkOptions) -> Result<bool> {
    super::require_project_dir(&options.project_dir)?;

    let mut reconciler = Reconciler::new();
    if !options.no_input {
        reconciler = reconciler.with_prompter(Box::new(TerminalPrompter));
    }

    let record = reconciler.link(template, &options)?;
    println!(
        "{} Linked {} to {} at {}",
        "OK".green().bold(),
        options.project_dir.display(),
        record.template.cyan(),
        record.commit
    );
    Ok(true)
}
