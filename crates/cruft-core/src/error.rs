//! Error types for cruft-core

use std::path::PathBuf;

/// Result type for cruft-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling a project with its template
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The project has no state record
    #[error(
        "Unable to locate a .cruft.json file in {project_dir}; run `cruft create` or `cruft link` first"
    )]
    StateRecordMissing { project_dir: PathBuf },

    /// `link` was asked to overwrite an existing state record
    #[error("{path} already exists; the project is already linked to a template")]
    AlreadyLinked { path: PathBuf },

    /// The state record exists but cannot be used
    #[error("Invalid state record {path}: {message}")]
    StateRecord { path: PathBuf, message: String },

    /// `update` needs a clean work tree so a partial merge can be discarded
    #[error(
        "Cruft cannot apply updates on an unclean git project; commit or stash these changes first: {}",
        .entries.join(", ")
    )]
    DirtyWorkingTree { entries: Vec<String> },

    /// `--extra-context` or `--extra-context-file` is not a JSON object
    #[error("Invalid extra context: {message}")]
    ExtraContext { message: String },

    /// An explicitly named user config file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The apply/skip/view/cancel question could not be answered
    #[error("Decision failed: {message}")]
    Decision { message: String },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] cruft_fs::Error),

    #[error(transparent)]
    Git(#[from] cruft_git::Error),

    #[error(transparent)]
    Template(#[from] cruft_template::Error),

    #[error(transparent)]
    Diff(#[from] cruft_diff::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
