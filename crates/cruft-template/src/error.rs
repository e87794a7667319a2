//! Error types for cruft-template

use std::path::PathBuf;

/// Result type for cruft-template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating, resolving or rendering a template
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to find a cookiecutter template in {path}: {reason}")]
    TemplateNotFound { path: PathBuf, reason: String },

    #[error("Invalid template manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Output directory {path} already exists")]
    OutputExists { path: PathBuf },

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

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

/// Errors from placeholder substitution.
///
/// These describe the template's own content and are surfaced unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{message}")]
    Undefined { message: String },

    #[error("{message}")]
    UnknownFilter { message: String },

    #[error("Unable to load extension '{name}'")]
    UnknownExtension { name: String },

    #[error("{message}")]
    Syntax { message: String },

    #[error("{message}")]
    Template { message: String },
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            minijinja::ErrorKind::UndefinedError => Self::Undefined { message },
            minijinja::ErrorKind::UnknownFilter => Self::UnknownFilter { message },
            minijinja::ErrorKind::SyntaxError => Self::Syntax { message },
            _ => Self::Template { message },
        }
    }
}
