//! Revision repository trait and its git2 implementation

use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Oid, Repository, ResetType};

use crate::{Error, Result};

/// A cloned template repository that can be moved between revisions.
///
/// Revisions are exchanged as full hexadecimal commit ids.
pub trait RevisionRepository {
    /// Directory holding the checked-out files
    fn workdir(&self) -> &Path;

    /// Check out `reference` (or the default branch tip) and return its id.
    ///
    /// A reference is looked up as `refs/remotes/origin/<reference>` first,
    /// then as any revision expression (tag, sha, local branch).
    fn checkout(&self, reference: Option<&str>) -> Result<String>;

    /// Hard reset the working tree and `HEAD` to `revision`.
    fn reset_to(&self, revision: &str) -> Result<()>;

    /// True if both revisions are equal or their trees do not differ.
    fn revisions_equivalent(&self, a: &str, b: &str) -> Result<bool>;

    /// True if `ancestor` equals `descendant` or is reachable from it.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;
}

/// Something that can produce [`RevisionRepository`] handles.
pub trait RevisionSource {
    /// Clone `locator` into `destination`.
    ///
    /// On failure, whatever was created in `destination` is removed.
    fn clone_into(&self, locator: &str, destination: &Path)
    -> Result<Box<dyn RevisionRepository>>;
}

/// The default [`RevisionSource`], backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitSource;

impl RevisionSource for GitSource {
    fn clone_into(
        &self,
        locator: &str,
        destination: &Path,
    ) -> Result<Box<dyn RevisionRepository>> {
        Ok(Box::new(GitRepository::clone_from(locator, destination)?))
    }
}

/// A template clone managed through git2.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
    default_tip: Oid,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("workdir", &self.workdir)
            .field("default_tip", &self.default_tip)
            .finish()
    }
}

impl GitRepository {
    /// Clone `locator` into `destination`.
    pub fn clone_from(locator: &str, destination: &Path) -> Result<Self> {
        let existed = destination.exists();
        tracing::debug!(locator, destination = %destination.display(), "Cloning template");

        match RepoBuilder::new().clone(locator, destination) {
            Ok(repo) => Self::from_repository(repo),
            Err(e) => {
                if !existed && let Err(cleanup) = cruft_fs::io::remove_path(destination) {
                    tracing::warn!(error = %cleanup, "Failed to clean up partial clone");
                }
                Err(Error::Clone {
                    locator: locator.to_string(),
                    message: e.message().to_string(),
                })
            }
        }
    }

    fn from_repository(repo: Repository) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| git2::Error::from_str("template repository has no working tree"))?;
        let default_tip = repo.head()?.peel_to_commit()?.id();
        Ok(Self {
            repo,
            workdir,
            default_tip,
        })
    }

    fn resolve(&self, reference: Option<&str>) -> Result<Oid> {
        let Some(reference) = reference else {
            return Ok(self.default_tip);
        };

        let remote_ref = format!("refs/remotes/origin/{}", reference);
        if let Ok(found) = self.repo.find_reference(&remote_ref) {
            return Ok(found.peel_to_commit()?.id());
        }

        self.repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|_| Error::ReferenceNotFound {
                reference: reference.to_string(),
            })
    }

    fn find_revision(&self, revision: &str) -> Result<git2::Commit<'_>> {
        self.repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(|_| Error::RevisionNotFound {
                revision: revision.to_string(),
            })
    }

    fn force_checkout() -> CheckoutBuilder<'static> {
        let mut builder = CheckoutBuilder::new();
        builder.force().remove_untracked(true);
        builder
    }
}

impl RevisionRepository for GitRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn checkout(&self, reference: Option<&str>) -> Result<String> {
        let oid = self.resolve(reference)?;
        let object = self.repo.find_object(oid, None)?;
        self.repo
            .checkout_tree(&object, Some(&mut Self::force_checkout()))?;
        self.repo.set_head_detached(oid)?;
        tracing::debug!(reference = ?reference, revision = %oid, "Checked out template");
        Ok(oid.to_string())
    }

    fn reset_to(&self, revision: &str) -> Result<()> {
        let commit = self.find_revision(revision)?;
        self.repo.reset(
            commit.as_object(),
            ResetType::Hard,
            Some(&mut Self::force_checkout()),
        )?;
        self.repo.set_head_detached(commit.id())?;
        tracing::debug!(revision = %commit.id(), "Reset template");
        Ok(())
    }

    fn revisions_equivalent(&self, a: &str, b: &str) -> Result<bool> {
        let first = self.find_revision(a)?;
        let second = self.find_revision(b)?;
        if first.id() == second.id() {
            return Ok(true);
        }
        let (first_tree, second_tree) = (first.tree()?, second.tree()?);
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&first_tree), Some(&second_tree), None)?;
        Ok(diff.deltas().len() == 0)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let ancestor = self.find_revision(ancestor)?.id();
        let descendant = self.find_revision(descendant)?.id();
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }
}
