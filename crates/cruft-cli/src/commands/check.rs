//! The `check` command

use colored::Colorize;

use cruft_core::{CheckOptions, Reconciler};

use crate::error::Result;

/// Report whether the project is up to date with its template.
pub fn run_check(options: CheckOptions) -> Result<bool> {
    super::require_project_dir(&options.project_dir)?;

    if Reconciler::new().check(&options)? {
        println!(
            "{}",
            "SUCCESS: Good work! Project's cruft is up to date and as clean as possible :).".green()
        );
        Ok(true)
    } else {
        println!(
            "{}",
            "FAILURE: Project's cruft is out of date! Run `cruft update` to clean this mess up."
                .red()
        );
        Ok(false)
    }
}
