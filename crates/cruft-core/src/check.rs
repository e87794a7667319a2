//! `check`: is the recorded revision still fresh?

use std::path::PathBuf;

use cruft_git::RevisionRepository;

use crate::checkout::TemplateCheckout;
use crate::{Reconciler, Result, StateRecord};

/// Options for [`Reconciler::check`].
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub project_dir: PathBuf,
    /// Reference to compare against; defaults to the recorded one
    pub checkout: Option<String>,
    /// Only exact or content-equivalent revisions count as fresh
    pub strict: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            checkout: None,
            strict: true,
        }
    }
}

/// The freshness policy.
///
/// `pinned` is fresh against `tip` if they are the same revision, if their
/// trees do not differ, or, when `strict` is off, if `pinned` is an
/// ancestor of `tip`.
pub fn is_fresh(repo: &dyn RevisionRepository, pinned: &str, tip: &str, strict: bool) -> Result<bool> {
    if pinned == tip || repo.revisions_equivalent(pinned, tip)? {
        return Ok(true);
    }
    Ok(!strict && repo.is_ancestor(pinned, tip)?)
}

impl Reconciler {
    /// True if the project's recorded revision is fresh. Never writes.
    pub fn check(&self, options: &CheckOptions) -> Result<bool> {
        let record = StateRecord::load(&options.project_dir)?;
        let reference = options.checkout.as_deref().or(record.checkout.as_deref());
        let checkout = TemplateCheckout::open(self.source.as_ref(), &record.template, reference)?;

        let fresh = is_fresh(checkout.repo(), &record.commit, checkout.revision(), options.strict)?;
        tracing::info!(
            pinned = %record.commit,
            tip = %checkout.revision(),
            strict = options.strict,
            fresh,
            "Checked template freshness"
        );
        Ok(fresh)
    }
}
