//! A template clone inside a scratch directory

use std::path::PathBuf;

use cruft_fs::{NormalizedPath, ScratchDir};
use cruft_git::{RevisionRepository, RevisionSource};

use crate::Result;

/// A cloned template checked out at some revision.
///
/// Renders made for the same operation live next to the clone and are
/// removed with it.
pub struct TemplateCheckout {
    // Dropped before the scratch directory so no handle outlives the files
    repo: Box<dyn RevisionRepository>,
    scratch: ScratchDir,
    revision: String,
}

impl std::fmt::Debug for TemplateCheckout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCheckout")
            .field("workdir", &self.repo.workdir())
            .field("scratch", &self.scratch)
            .field("revision", &self.revision)
            .finish()
    }
}

impl TemplateCheckout {
    /// Clone `locator` and check out `reference`, or the default branch.
    pub fn open(source: &dyn RevisionSource, locator: &str, reference: Option<&str>) -> Result<Self> {
        let scratch = ScratchDir::new()?;
        let repo = source.clone_into(locator, &scratch.path().join("repo"))?;
        let revision = repo.checkout(reference)?;
        tracing::debug!(locator, reference = ?reference, %revision, "Checked out template");
        Ok(Self {
            repo,
            scratch,
            revision,
        })
    }

    /// Revision the checkout was opened at.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn repo(&self) -> &dyn RevisionRepository {
        self.repo.as_ref()
    }

    /// Template directory inside the clone, honouring a nested `directory`.
    pub fn template_dir(&self, directory: Option<&str>) -> PathBuf {
        match directory {
            Some(directory) => NormalizedPath::new(directory).under(self.repo.workdir()),
            None => self.repo.workdir().to_path_buf(),
        }
    }

    /// A fresh directory for renders or projections.
    pub fn workspace(&self, name: &str) -> Result<PathBuf> {
        Ok(self.scratch.subdir(name)?)
    }

    /// Move the working tree to `revision`.
    pub fn reset_to(&self, revision: &str) -> Result<()> {
        self.repo.reset_to(revision)?;
        Ok(())
    }
}

/// The `directory` to record: the requested one plus any nested choice.
pub fn recorded_directory(
    requested: Option<&str>,
    sub_template: Option<&NormalizedPath>,
) -> Option<String> {
    let requested = requested
        .map(NormalizedPath::new)
        .filter(|path| !path.is_root());
    match (requested, sub_template) {
        (Some(base), Some(sub)) => Some(base.join(sub.as_str()).to_string()),
        (Some(base), None) => Some(base.to_string()),
        (None, Some(sub)) => Some(sub.to_string()),
        (None, None) => None,
    }
}
