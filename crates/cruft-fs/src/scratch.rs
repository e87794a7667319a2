//! Scoped scratch directories for template clones and renders
//!
//! Every operation works inside a [`ScratchDir`] that is removed on every
//! exit path. Removal is retried a bounded number of times because cloned
//! git objects are written read-only and some platforms release file
//! handles lazily.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::io::RobustnessConfig;
use crate::{Error, Result};

/// A temporary directory owned by one cruft operation.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    robustness: RobustnessConfig,
}

impl ScratchDir {
    /// Create a fresh scratch directory under the system temp directory.
    pub fn new() -> Result<Self> {
        Self::new_in(&std::env::temp_dir())
    }

    /// Create a fresh scratch directory under `parent`.
    pub fn new_in(parent: &Path) -> Result<Self> {
        let path = parent.join(format!("cruft-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        // Canonical so that paths derived from it match what git prints
        let path = dunce::canonicalize(&path).map_err(|e| Error::io(&path, e))?;
        tracing::debug!(path = %path.display(), "Created scratch directory");
        Ok(Self {
            path,
            robustness: RobustnessConfig::default(),
        })
    }

    /// Root of the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (if needed) and return a named subdirectory.
    pub fn subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.path.join(name);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(dir)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = remove_with_retry(&self.path, self.robustness) {
            tracing::warn!(error = %e, "Scratch directory left behind");
        }
    }
}

/// Remove `path` recursively, clearing read-only bits between attempts.
pub fn remove_with_retry(path: &Path, robustness: RobustnessConfig) -> Result<()> {
    robustness
        .run(|attempt| {
            if attempt > 1 {
                make_writable(path);
            }
            match fs::remove_dir_all(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => {
                    tracing::debug!(path = %path.display(), attempt, error = %e, "Removal failed");
                    Err(e)
                }
            }
        })
        .map_err(|(source, attempts)| Error::CleanupFailed {
            path: path.to_path_buf(),
            attempts,
            source,
        })
}

fn make_writable(path: &Path) {
    for entry in WalkDir::new(path).into_iter().filter_map(|entry| entry.ok()) {
        if entry.path_is_symlink() {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            let _ = fs::set_permissions(entry.path(), permissions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_scratch_dir_is_removed() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new_in(parent.path()).unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(path.join("file.txt"), "x").unwrap();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn retry_clears_read_only_entries() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new_in(parent.path()).unwrap();
        let objects = scratch.subdir("objects").unwrap();
        let file = objects.join("pack");
        fs::write(&file, "x").unwrap();
        for path in [&file, &objects] {
            let mut permissions = fs::metadata(path).unwrap().permissions();
            permissions.set_readonly(true);
            fs::set_permissions(path, permissions).unwrap();
        }

        make_writable(scratch.path());

        assert!(!fs::metadata(&file).unwrap().permissions().readonly());
        assert!(!fs::metadata(&objects).unwrap().permissions().readonly());
    }
}
