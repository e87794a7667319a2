//! Error types for cruft-diff

use std::path::PathBuf;

/// Result type for cruft-diff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while comparing or patching trees
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Diff output is not valid UTF-8: {message}")]
    Encoding { message: String },

    #[error("git {command} failed ({status}): {stderr}")]
    Tool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Git(#[from] cruft_git::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] cruft_fs::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
