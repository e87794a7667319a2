//! Reconciliation of generated projects with their cookiecutter templates
//!
//! This crate composes the lower layers into the five public operations:
//!
//! - **create**: render a template into a new project and record its state
//! - **link**: record the template of a project that was generated earlier
//! - **check**: decide whether the recorded revision is still fresh
//! - **diff**: compare the project with a clean render of its template
//! - **update**: three-way merge a newer template revision into the project
//!
//! # Architecture
//!
//! ```text
//!                     cruft-cli
//!                         |
//!                    cruft-core
//!                         |
//!     +-----------+-------+-------+-----------+
//!     |           |               |           |
//! cruft-fs    cruft-git    cruft-template  cruft-diff
//! ```
//!
//! Every operation goes through a [`Reconciler`], which owns the
//! [`RevisionSource`](cruft_git::RevisionSource) used to clone templates, the
//! [`Prompter`](cruft_template::Prompter) used for parameter values and the
//! [`Decider`] that answers the apply/skip/view/cancel question.

pub mod check;
pub mod checkout;
pub mod config;
pub mod create;
pub mod decide;
pub mod diff;
pub mod error;
pub mod link;
pub mod reconciler;
pub mod skip;
pub mod state;
pub mod update;

pub use check::{CheckOptions, is_fresh};
pub use config::{UserConfig, parse_extra_context};
pub use create::CreateOptions;
pub use decide::{AutoApply, Decider, Decision};
pub use diff::{DiffOptions, DiffReport};
pub use error::{Error, Result};
pub use link::LinkOptions;
pub use reconciler::Reconciler;
pub use state::{RecordedContext, StateRecord};
pub use update::{UpdateOptions, UpdateOutcome};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_state_record_points_at_create_and_link() {
        let error = Error::StateRecordMissing {
            project_dir: PathBuf::from("/work/project"),
        };

        let display = error.to_string();
        assert!(display.contains("/work/project"), "got: {}", display);
        assert!(display.contains("cruft create"), "got: {}", display);
        assert!(display.contains("cruft link"), "got: {}", display);
    }

    #[test]
    fn dirty_tree_lists_entries() {
        let error = Error::DirtyWorkingTree {
            entries: vec!["README.md".into(), "src/lib.rs".into()],
        };

        let display = error.to_string();
        assert!(display.contains("README.md, src/lib.rs"), "got: {}", display);
        assert!(display.contains("stash"), "got: {}", display);
    }
}
