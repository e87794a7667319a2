//! Git abstraction for cruft
//!
//! Template sources are reached through the [`RevisionRepository`] trait so
//! the reconciliation layer never talks to git directly. The [`worktree`]
//! module answers questions about the live project's own repository.

pub mod error;
pub mod repository;
pub mod url;
pub mod worktree;

pub use error::{Error, Result};
pub use repository::{GitRepository, GitSource, RevisionRepository, RevisionSource};
pub use url::resolve_template_url;
pub use worktree::{IgnoreRules, WorkTreeState, prefix_in_worktree, working_tree_status};
