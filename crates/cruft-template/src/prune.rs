//! Post-render pruning of skipped and user-deleted paths

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use cruft_fs::{NormalizedPath, PatternSet};

use walkdir::WalkDir;

use crate::Result;

/// Every path below `root`, files and directories, sorted.
pub fn list_tree(root: &Path) -> Result<BTreeSet<NormalizedPath>> {
    let mut paths = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        if let Some(path) = NormalizedPath::relative(entry.path(), root) {
            paths.insert(path);
        }
    }
    Ok(paths)
}

/// Paths present in a render of the template but missing from the project.
///
/// These are files the user removed on purpose; an update must not bring
/// them back.
pub fn deleted_paths(rendered: &Path, project: &Path) -> Result<BTreeSet<NormalizedPath>> {
    let deleted: BTreeSet<NormalizedPath> = list_tree(rendered)?
        .into_iter()
        .filter(|path| fs::symlink_metadata(path.under(project)).is_err())
        .collect();
    if !deleted.is_empty() {
        tracing::debug!(count = deleted.len(), "Paths deleted from the project");
    }
    Ok(deleted)
}

/// Remove every path under `root` matched by `skip` or listed in `deleted`.
///
/// Returns the number of entries removed; descendants of a removed
/// directory are not counted separately.
pub fn prune(root: &Path, skip: &PatternSet, deleted: &BTreeSet<NormalizedPath>) -> Result<usize> {
    let mut removed: Vec<NormalizedPath> = Vec::new();
    for path in list_tree(root)? {
        if removed.iter().any(|gone| gone.contains(&path)) {
            continue;
        }
        if skip.is_match(&path) || deleted.contains(&path) {
            cruft_fs::io::remove_path(&path.under(root))?;
            removed.push(path);
        }
    }
    if !removed.is_empty() {
        tracing::debug!(root = %root.display(), count = removed.len(), "Pruned render");
    }
    Ok(removed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file).unwrap();
        }
    }

    fn names(set: &BTreeSet<NormalizedPath>) -> Vec<&str> {
        set.iter().map(NormalizedPath::as_str).collect()
    }

    #[test]
    fn deleted_paths_lists_missing_files_and_dirs() {
        let rendered = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        tree(rendered.path(), &["README.md", "docs/guide.md", "src/lib.rs"]);
        tree(project.path(), &["README.md", "src/lib.rs"]);

        let deleted = deleted_paths(rendered.path(), project.path()).unwrap();

        assert_eq!(names(&deleted), vec!["docs", "docs/guide.md"]);
    }

    #[test]
    fn prune_removes_skipped_and_deleted() {
        let root = tempfile::tempdir().unwrap();
        tree(root.path(), &["README.md", "docs/guide.md", "src/lib.rs", "poetry.lock"]);
        let skip = PatternSet::new(["*.lock"]).unwrap();
        let deleted: BTreeSet<_> = [NormalizedPath::new("docs")].into_iter().collect();

        let count = prune(root.path(), &skip, &deleted).unwrap();

        assert_eq!(count, 2);
        assert_eq!(names(&list_tree(root.path()).unwrap()), vec!["README.md", "src", "src/lib.rs"]);
    }
}
