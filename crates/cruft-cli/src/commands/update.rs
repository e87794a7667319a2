//! The `update` command

use colored::Colorize;

use cruft_core::{Reconciler, UpdateOptions, UpdateOutcome};

use crate::error::Result;
use crate::interactive::{TerminalDecider, TerminalPrompter};

const UPDATED: &str = "Good work! Project's cruft has been updated and is as clean as possible!";

/// Merge the target template revision into the project.
pub fn run_update(options: UpdateOptions) -> Result<bool> {
    super::require_project_dir(&options.project_dir)?;

    let mut reconciler = Reconciler::new();
    if options.cookiecutter_input {
        reconciler = reconciler.with_prompter(Box::new(TerminalPrompter));
    }
    if !options.skip_apply_ask {
        reconciler = reconciler.with_decider(Box::new(TerminalDecider));
    }

    let outcome = reconciler.update(&options)?;
    match &outcome {
        UpdateOutcome::AlreadyUpToDate => {
            println!(
                "{}",
                "Nothing to do, project's cruft is already up to date!".green()
            );
        }
        UpdateOutcome::Cancelled => {
            println!("{}", "User cancelled Cookiecutter template update.".yellow());
        }
        UpdateOutcome::Skipped => {
            println!("{}", UPDATED.green());
        }
        UpdateOutcome::Applied(applied) => {
            if applied.is_clean() {
                println!("{}", UPDATED.green());
            } else {
                println!(
                    "{}",
                    "Project's cruft has been updated, but some changes need your attention:"
                        .yellow()
                );
                for path in &applied.conflicted {
                    println!("  {} {}", "conflict".yellow().bold(), path);
                }
                for path in &applied.rejected {
                    println!("  {} {}.rej", "rejected".red().bold(), path);
                }
                for line in &applied.errors {
                    println!("  {} {}", "error".red().bold(), line);
                }
            }
        }
    }
    Ok(outcome.is_success())
}
