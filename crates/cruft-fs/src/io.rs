//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use backoff::backoff::Constant;
use fs2::FileExt;

use crate::{Error, Result};

/// Retry policy for filesystem operations that can fail transiently.
///
/// Used for acquiring the advisory lock on state record writes and for
/// removing scratch directories whose files are briefly held open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// Total number of attempts, including the first one
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(100),
        }
    }
}

impl RobustnessConfig {
    /// A policy that tries exactly once.
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the last error together with the number of attempts made.
    pub fn run<T, E>(
        &self,
        mut op: impl FnMut(u32) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, (E, u32)> {
        let budget = self.attempts.max(1);
        let mut attempt = 0u32;
        let result = backoff::retry(Constant::new(self.delay), || {
            attempt += 1;
            op(attempt).map_err(|e| {
                if attempt >= budget {
                    backoff::Error::permanent(e)
                } else {
                    backoff::Error::transient(e)
                }
            })
        });
        result.map_err(|e| match e {
            backoff::Error::Permanent(err) => (err, attempt),
            backoff::Error::Transient { err, .. } => (err, attempt),
        })
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// state record, and holds an advisory lock on the temp file while writing.
pub fn write_atomic(path: &Path, content: &[u8], robustness: RobustnessConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    robustness
        .run(|_| temp_file.try_lock_exclusive())
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically, skipping the write when the
/// file already holds exactly these bytes.
///
/// Returns `true` when the file was (re)written.
pub fn write_text_if_changed(path: &Path, content: &str) -> Result<bool> {
    if let Ok(existing) = fs::read(path)
        && existing == content.as_bytes()
    {
        tracing::debug!(path = %path.display(), "Content unchanged, skipping write");
        return Ok(false);
    }
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())?;
    Ok(true)
}

/// Remove a file or a directory tree; missing paths are not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(path, e)),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}
