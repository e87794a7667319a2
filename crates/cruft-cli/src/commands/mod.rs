//! Command implementations for cruft-cli
//!
//! Every command returns `Ok(true)` when it succeeded and `Ok(false)` when
//! it ran to completion but the process should exit with status 1.

pub mod check;
pub mod completions;
pub mod create;
pub mod diff;
pub mod link;
pub mod update;

use std::path::Path;

use crate::error::{CliError, Result};

pub use check::run_check;
pub use completions::run_completions;
pub use create::run_create;
pub use diff::run_diff;
pub use link::run_link;
pub use update::run_update;

/// Fail early with a readable message when the project directory is missing.
fn require_project_dir(project_dir: &Path) -> Result<()> {
    if project_dir.is_dir() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "Project directory does not exist: {}",
            project_dir.display()
        )))
    }
}
