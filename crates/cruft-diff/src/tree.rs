//! Deciding which paths of a tree take part in a comparison

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use cruft_fs::{NormalizedPath, ProjectFile};
use cruft_git::IgnoreRules;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Paths below a root split into those compared and those left out.
///
/// Both lists are relative to the root and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub keep: Vec<NormalizedPath>,
    pub ignore: Vec<NormalizedPath>,
}

/// Include filter plus optional ignore rules, reusable across trees.
#[derive(Debug)]
pub struct Classifier {
    include: Vec<NormalizedPath>,
    ignore: Option<IgnoreRules>,
}

impl Classifier {
    /// `ignore_root` supplies git ignore rules; a directory that is not in a
    /// work tree simply contributes none.
    pub fn new(include: &[NormalizedPath], ignore_root: Option<&Path>) -> Result<Self> {
        let ignore = match ignore_root {
            Some(root) => IgnoreRules::open(root)?,
            None => None,
        };
        Ok(Self {
            include: include.iter().filter(|p| !p.is_root()).cloned().collect(),
            ignore,
        })
    }

    /// Classify everything below `start`, which must lie inside `root`.
    ///
    /// A directory is kept when something below it is kept; `.git` is
    /// ignored at any depth and never descended into.
    pub fn classify(&self, root: &Path, start: &Path) -> Result<Classification> {
        let base = NormalizedPath::relative(start, root).unwrap_or_else(|| NormalizedPath::new(""));
        let mut result = Classification::default();
        let mut kept_dirs = BTreeSet::new();

        let mut walker = WalkDir::new(start).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry?;
            let Some(below) = NormalizedPath::relative(entry.path(), start) else {
                continue;
            };
            let path = base.join(below.as_str());
            let is_dir = entry.file_type().is_dir();

            if entry.file_name() == ProjectFile::GitDir.as_str() {
                if is_dir {
                    walker.skip_current_dir();
                }
                result.ignore.push(path);
                continue;
            }

            if self.excluded(&path, is_dir) {
                result.ignore.push(path);
            } else if !is_dir {
                let mut parent = path.parent();
                while let Some(dir) = parent.filter(|dir| !dir.is_root() && *dir != base) {
                    parent = dir.parent();
                    kept_dirs.insert(dir);
                }
                result.keep.push(path);
            }
        }

        result.keep.extend(kept_dirs);
        result.keep.sort();
        result.ignore.sort();
        Ok(result)
    }

    fn excluded(&self, path: &NormalizedPath, is_dir: bool) -> bool {
        let outside_include = !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|included| included.contains(path) || path.contains(included));
        if outside_include {
            return true;
        }
        self.ignore
            .as_ref()
            .is_some_and(|rules| rules.is_ignored(path, is_dir))
    }
}

/// Classify everything below `root`.
pub fn classify(
    root: &Path,
    include: &[NormalizedPath],
    ignore_root: Option<&Path>,
) -> Result<Classification> {
    Classifier::new(include, ignore_root)?.classify(root, root)
}

/// Copy `paths` (relative to `from`) into `to`, skipping any that do not
/// exist in `from`. Directories are created; files are copied with their
/// permissions.
pub fn copy_projection(from: &Path, to: &Path, paths: &[NormalizedPath]) -> Result<usize> {
    let mut copied = 0;
    for path in paths {
        let source = path.under(from);
        let target = path.under(to);
        let Ok(metadata) = fs::metadata(&source) else {
            continue;
        };
        if metadata.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(&source, &target).map_err(|e| Error::io(&source, e))?;
        copied += 1;
    }
    Ok(copied)
}
