//! The entry point for every cruft operation

use cruft_git::{GitSource, RevisionSource};
use cruft_template::{Materializer, NoPrompt, Prompter};

use crate::decide::{AutoApply, Decider};

/// Runs `create`, `link`, `check`, `diff` and `update`.
///
/// The default reconciler clones with libgit2, never prompts and applies
/// every update without asking. Interactive front ends swap in their own
/// [`Prompter`] and [`Decider`].
pub struct Reconciler {
    pub(crate) source: Box<dyn RevisionSource>,
    pub(crate) prompter: Box<dyn Prompter>,
    pub(crate) decider: Box<dyn Decider>,
    pub(crate) materializer: Materializer,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            source: Box::new(GitSource),
            prompter: Box::new(NoPrompt),
            decider: Box::new(AutoApply),
            materializer: Materializer::new(),
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone templates through `source`.
    pub fn with_source(mut self, source: Box<dyn RevisionSource>) -> Self {
        self.source = source;
        self
    }

    /// Ask for parameter values through `prompter`.
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Answer the update question through `decider`.
    pub fn with_decider(mut self, decider: Box<dyn Decider>) -> Self {
        self.decider = decider;
        self
    }
}
