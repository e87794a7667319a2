//! The `diff` command

use std::io::{IsTerminal, Write};

use cruft_core::{DiffOptions, Reconciler};

use crate::error::Result;

/// Print the difference between the project and a clean render.
///
/// Colors are used only on a terminal and never with `--exit-code`, so the
/// printed text can be fed to `git apply`.
pub fn run_diff(options: DiffOptions, exit_code: bool) -> Result<bool> {
    super::require_project_dir(&options.project_dir)?;

    let report = Reconciler::new().diff(&options)?;
    if report.has_diff {
        let mut stdout = std::io::stdout().lock();
        if exit_code || !stdout.is_terminal() {
            stdout.write_all(report.diff.as_bytes())?;
        } else {
            stdout.write_all(cruft_diff::colorize(&report.diff).as_bytes())?;
        }
        stdout.flush()?;
    }
    Ok(!(exit_code && report.has_diff))
}
