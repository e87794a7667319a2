//! Well-known file names inside a generated project.

use std::path::Path;

/// Files cruft reads or writes at a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFile {
    /// The state record linking a project to its template
    StateRecord,
    /// Python project metadata (`[tool.cruft]` section)
    PyProject,
    /// Cargo manifest (`[package.metadata.cruft]` section)
    CargoManifest,
    /// The git database directory
    GitDir,
}

impl ProjectFile {
    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateRecord => ".cruft.json",
            Self::PyProject => "pyproject.toml",
            Self::CargoManifest => "Cargo.toml",
            Self::GitDir => ".git",
        }
    }
}

impl AsRef<Path> for ProjectFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
