//! State of the live project's own git work tree

use std::path::{Path, PathBuf};

use cruft_fs::NormalizedPath;
use git2::{ErrorCode, Repository, Status, StatusOptions};

use crate::Result;

/// Change-tracking state of a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkTreeState {
    /// The directory is not inside a git work tree
    NotARepository,
    /// No uncommitted changes
    Clean,
    /// Paths with uncommitted changes, relative to the work tree root
    Dirty { entries: Vec<String> },
}

impl WorkTreeState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty { .. })
    }
}

fn discover(dir: &Path) -> Result<Option<Repository>> {
    match Repository::discover(dir) {
        Ok(repo) if repo.is_bare() => Ok(None),
        Ok(repo) => Ok(Some(repo)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Inspect the work tree enclosing `dir`.
///
/// Ignored files never count. Untracked files count unless
/// `allow_untracked` is set.
pub fn working_tree_status(dir: &Path, allow_untracked: bool) -> Result<WorkTreeState> {
    let Some(repo) = discover(dir)? else {
        return Ok(WorkTreeState::NotARepository);
    };

    let mut options = StatusOptions::new();
    options
        .include_untracked(!allow_untracked)
        .recurse_untracked_dirs(!allow_untracked)
        .include_ignored(false);

    let statuses = repo.statuses(Some(&mut options))?;
    let entries: Vec<String> = statuses
        .iter()
        .filter(|entry| {
            let status = entry.status();
            status != Status::CURRENT && !status.is_ignored()
        })
        .filter_map(|entry| entry.path().map(str::to_string))
        .collect();

    if entries.is_empty() {
        Ok(WorkTreeState::Clean)
    } else {
        tracing::debug!(count = entries.len(), "Work tree has uncommitted changes");
        Ok(WorkTreeState::Dirty { entries })
    }
}

/// Path of `dir` relative to the root of its enclosing work tree.
///
/// Returns `None` when `dir` is not inside a work tree.
pub fn prefix_in_worktree(dir: &Path) -> Result<Option<NormalizedPath>> {
    let Some(repo) = discover(dir)? else {
        return Ok(None);
    };
    let Some(workdir) = repo.workdir() else {
        return Ok(None);
    };
    let workdir = canonical(workdir)?;
    let dir = canonical(dir)?;
    Ok(NormalizedPath::relative(&dir, &workdir))
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| cruft_fs::Error::io(path, e).into())
}

/// Ignore rules of the work tree enclosing a directory.
///
/// Paths are given relative to that directory, which need not be the work
/// tree root and need not contain the path at all: rules are evaluated as if
/// the path existed there.
pub struct IgnoreRules {
    repo: Repository,
    prefix: NormalizedPath,
}

impl IgnoreRules {
    /// Load the ignore rules that apply below `root`.
    ///
    /// A directory outside any work tree has no rules and yields `None`.
    pub fn open(root: &Path) -> Result<Option<Self>> {
        let Some(repo) = discover(root)? else {
            return Ok(None);
        };
        let Some(workdir) = repo.workdir() else {
            return Ok(None);
        };
        let workdir = canonical(workdir)?;
        let Some(prefix) = NormalizedPath::relative(&canonical(root)?, &workdir) else {
            return Ok(None);
        };
        Ok(Some(Self { repo, prefix }))
    }

    /// True if `relative` (a directory when `is_dir`) is ignored.
    pub fn is_ignored(&self, relative: &NormalizedPath, is_dir: bool) -> bool {
        if relative.is_root() {
            return false;
        }
        let mut candidate = self.prefix.join(relative.as_str()).as_str().to_string();
        if is_dir {
            candidate.push('/');
        }
        match self.repo.is_path_ignored(Path::new(&candidate)) {
            Ok(ignored) => ignored,
            Err(e) => {
                tracing::debug!(path = %candidate, error = %e, "Ignore lookup failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for IgnoreRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgnoreRules")
            .field("prefix", &self.prefix)
            .finish()
    }
}
