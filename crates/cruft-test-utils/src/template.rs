//! [`TemplateRepo`] builder for cookiecutter-layout template repositories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// Name of the rendering root used by [`TemplateRepo::new`].
pub const ROOT_DIR: &str = "{{cookiecutter.project_slug}}";

/// A git repository holding a template, committed on `main`.
///
/// # Example
///
/// ```rust,no_run
/// use cruft_test_utils::TemplateRepo;
///
/// let template = TemplateRepo::new();
/// let first = template.head();
/// template.write_file("greeting.txt", "hi\n");
/// let second = template.commit("Change greeting");
/// assert_ne!(first, second);
/// ```
pub struct TemplateRepo {
    temp_dir: TempDir,
}

impl Default for TemplateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRepo {
    /// A committed template with a `project_slug` and a `greeting` parameter
    /// rendering `greeting.txt`, `README.md` and `docs/guide.md`.
    pub fn new() -> Self {
        let template = Self::empty();
        template.write_manifest(&serde_json::json!({
            "project_slug": "demo",
            "greeting": "hello",
        }));
        template.write_file("greeting.txt", "{{ cookiecutter.greeting }}\n");
        template.write_file("README.md", "# {{ cookiecutter.project_slug }}\n");
        template.write_file("docs/guide.md", "Guide for {{ cookiecutter.project_slug }}\n");
        template.commit("Initial template");
        template
    }

    /// An initialised repository with no files and no commits.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
        git::init_repo(temp_dir.path());
        Self { temp_dir }
    }

    /// Root of the repository.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The locator to pass to cruft.
    pub fn locator(&self) -> String {
        self.root().display().to_string()
    }

    /// Overwrite `cookiecutter.json` at the repository root.
    pub fn write_manifest(&self, manifest: &serde_json::Value) {
        self.write_raw(
            "cookiecutter.json",
            &serde_json::to_string_pretty(manifest).unwrap_or_default(),
        );
    }

    /// Write a file below the rendering root.
    pub fn write_file(&self, relative: &str, content: &str) {
        self.write_raw(&format!("{ROOT_DIR}/{relative}"), content);
    }

    /// Remove a file below the rendering root.
    pub fn remove_file(&self, relative: &str) {
        let path = self.root().join(ROOT_DIR).join(relative);
        fs::remove_file(&path)
            .unwrap_or_else(|e| panic!("failed to remove {}: {e}", path.display()));
    }

    /// Write any file relative to the repository root.
    pub fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
        path
    }

    /// Commit all changes on the current branch; returns the commit id.
    pub fn commit(&self, message: &str) -> String {
        git::commit_all(self.root(), message)
    }

    /// Current tip of the checked-out branch.
    pub fn head(&self) -> String {
        git::head(self.root())
    }

    /// Tag the current commit.
    pub fn tag(&self, name: &str) {
        git::git(self.root(), &["tag", name]);
    }

    /// Create `name` from the current commit and switch to it.
    pub fn branch(&self, name: &str) {
        git::git(self.root(), &["checkout", "--quiet", "-b", name]);
    }

    /// Switch to an existing branch.
    pub fn switch(&self, name: &str) {
        git::git(self.root(), &["checkout", "--quiet", name]);
    }
}
