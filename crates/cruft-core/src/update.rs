//! `update`: merge a newer template revision into the project
//!
//! The template is rendered twice with the project's context: once at the
//! recorded revision and once at the target. Paths that are skipped, or that
//! the user deleted from the project, are pruned from both renders. The
//! diff between the two renders is what the template changed; it is applied
//! to the project with a three-way merge where possible.

use std::path::PathBuf;

use cruft_diff::{ApplyOutcome, DiffLabels, apply_diff, compute_diff};
use cruft_git::{WorkTreeState, working_tree_status};
use cruft_template::prune::{deleted_paths, prune};
use cruft_template::{Context, RenderRequest};

use crate::check::is_fresh;
use crate::checkout::{TemplateCheckout, recorded_directory};
use crate::decide::{self, Decision};
use crate::skip::skip_patterns;
use crate::{Error, Reconciler, Result, StateRecord};

/// Options for [`Reconciler::update`].
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub project_dir: PathBuf,
    /// Prompt for parameter values of the new render
    pub cookiecutter_input: bool,
    /// Take private values from the template instead of the record
    pub refresh_private: bool,
    /// Apply without asking
    pub skip_apply_ask: bool,
    /// Advance the record without touching files
    pub skip_update: bool,
    pub checkout: Option<String>,
    pub strict: bool,
    /// Tolerate untracked files in the project work tree
    pub allow_untracked_files: bool,
    pub extra_context: Context,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            cookiecutter_input: false,
            refresh_private: false,
            skip_apply_ask: true,
            skip_update: false,
            checkout: None,
            strict: true,
            allow_untracked_files: false,
            extra_context: Context::new(),
        }
    }
}

/// How an update ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing to do; the record was not touched
    AlreadyUpToDate,
    /// The user declined; the record was not touched
    Cancelled,
    /// The record advanced but no file was changed
    Skipped,
    /// The diff was applied, possibly with conflicts, and the record advanced
    Applied(ApplyOutcome),
}

impl UpdateOutcome {
    /// False only for [`UpdateOutcome::Cancelled`].
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl Reconciler {
    /// Update the project to the target revision of its template.
    pub fn update(&self, options: &UpdateOptions) -> Result<UpdateOutcome> {
        let project_dir = options.project_dir.as_path();
        let mut record = StateRecord::load(project_dir)?;

        match working_tree_status(project_dir, options.allow_untracked_files)? {
            WorkTreeState::Dirty { entries } => return Err(Error::DirtyWorkingTree { entries }),
            WorkTreeState::NotARepository => {
                tracing::warn!(project = %project_dir.display(), "Project is not a git repository, conflicts will be left as reject files");
            }
            WorkTreeState::Clean => {}
        }

        let reference = options.checkout.clone().or_else(|| record.checkout.clone());
        let checkout = TemplateCheckout::open(self.source.as_ref(), &record.template, reference.as_deref())?;
        let target = checkout.revision().to_string();

        let refresh_requested =
            !options.extra_context.is_empty() || options.cookiecutter_input || options.refresh_private;
        if !refresh_requested && is_fresh(checkout.repo(), &record.commit, &target, options.strict)? {
            tracing::info!(commit = %record.commit, "Project is already up to date");
            return Ok(UpdateOutcome::AlreadyUpToDate);
        }

        let template_dir = checkout.template_dir(record.directory.as_deref());
        let no_overrides = Context::new();

        let new_parent = checkout.workspace("new")?;
        let new_request = RenderRequest {
            locator: &record.template,
            revision: Some(&target),
            prior: Some(record.parameters()),
            overrides: &options.extra_context,
            defaults: &no_overrides,
            no_prompt: !options.cookiecutter_input,
            refresh_private: options.refresh_private,
            prompter: self.prompter.as_ref(),
            output_parent: &new_parent,
            overwrite_if_exists: true,
        };
        let new_tree = self.materializer.render(&template_dir, &new_request)?;

        checkout.reset_to(&record.commit)?;
        let old_parent = checkout.workspace("old")?;
        let old_request = RenderRequest {
            revision: Some(&record.commit),
            prior: Some(record.parameters()),
            overwrite_if_exists: true,
            ..RenderRequest::new(&record.template, &old_parent, &no_overrides)
        };
        let old_tree = self.materializer.render(&template_dir, &old_request)?;

        let skip = skip_patterns(&record, project_dir)?;
        let deleted = deleted_paths(&old_tree.project_dir, project_dir)?;
        prune(&old_tree.project_dir, &skip, &deleted)?;
        prune(&new_tree.project_dir, &skip, &deleted)?;

        let diff = compute_diff(&old_tree.project_dir, &new_tree.project_dir, DiffLabels::default())?;

        let decision = if options.skip_update {
            Decision::Skip
        } else if options.skip_apply_ask {
            Decision::Apply
        } else {
            decide::resolve(self.decider.as_ref(), &diff)?
        };

        let outcome = match decision {
            Decision::Cancel | Decision::View => {
                tracing::info!("Update cancelled");
                return Ok(UpdateOutcome::Cancelled);
            }
            Decision::Skip => UpdateOutcome::Skipped,
            Decision::Apply => {
                UpdateOutcome::Applied(apply_diff(&diff, project_dir, options.allow_untracked_files)?)
            }
        };

        record.commit = target;
        record.checkout = reference;
        record.context.cookiecutter = new_tree.context;
        record.directory =
            recorded_directory(record.directory.as_deref(), new_tree.sub_template.as_ref());
        record.save(project_dir)?;

        match &outcome {
            UpdateOutcome::Applied(applied) if !applied.is_clean() => tracing::warn!(
                conflicted = ?applied.conflicted,
                rejected = ?applied.rejected,
                "Update applied with conflicts"
            ),
            _ => tracing::info!(commit = %record.commit, "Project updated"),
        }
        Ok(outcome)
    }
}
