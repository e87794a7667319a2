//! Error types for cruft-git

/// Result type for cruft-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a template repository
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to clone template repository '{locator}': {message}")]
    Clone { locator: String, message: String },

    #[error("Reference '{reference}' not found in template repository")]
    ReferenceNotFound { reference: String },

    #[error("Revision '{revision}' not found in template repository")]
    RevisionNotFound { revision: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] cruft_fs::Error),
}
