//! `diff`: compare a project with a clean render of its template
//!
//! The render is made at the recorded revision with the recorded context,
//! then pruned of skipped paths and of paths the user deleted. Both sides
//! are reduced to the same set of paths and copied into scratch
//! directories, so the diff never mentions anything outside that set.
//!
//! Forward mode (template to project) takes the set from the render.
//! Reverse mode (project to template) takes it from the project, filtered by
//! the project's ignore rules and skip patterns, which surfaces files the
//! project added.

use std::path::{Path, PathBuf};

use cruft_diff::{Classifier, DiffLabels, compute_diff, copy_projection};
use cruft_fs::{NormalizedPath, PatternSet, ProjectFile};
use cruft_template::{Context, RenderRequest};
use cruft_template::prune::{deleted_paths, prune};

use crate::checkout::TemplateCheckout;
use crate::skip::skip_patterns;
use crate::{Reconciler, Result, StateRecord};

/// Options for [`Reconciler::diff`].
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub project_dir: PathBuf,
    /// Revision to render instead of the recorded one
    pub checkout: Option<String>,
    /// Limit the comparison to these project-relative paths
    pub include_paths: Vec<String>,
    /// Diff project to template instead of template to project
    pub reverse: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            checkout: None,
            include_paths: Vec::new(),
            reverse: false,
        }
    }
}

/// Result of [`Reconciler::diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub diff: String,
    pub has_diff: bool,
}

impl DiffReport {
    fn new(diff: String) -> Self {
        let has_diff = !diff.trim().is_empty();
        Self { diff, has_diff }
    }
}

impl Reconciler {
    /// Diff the project against its template. Never writes to the project.
    pub fn diff(&self, options: &DiffOptions) -> Result<DiffReport> {
        let project_dir = options.project_dir.as_path();
        let record = StateRecord::load(project_dir)?;
        let reference = options.checkout.as_deref().unwrap_or(&record.commit);
        let checkout = TemplateCheckout::open(self.source.as_ref(), &record.template, Some(reference))?;

        let render_parent = checkout.workspace("render")?;
        let no_overrides = Context::new();
        let request = RenderRequest {
            revision: Some(checkout.revision()),
            prior: Some(record.parameters()),
            overwrite_if_exists: true,
            ..RenderRequest::new(&record.template, &render_parent, &no_overrides)
        };
        let rendered = self
            .materializer
            .render(&checkout.template_dir(record.directory.as_deref()), &request)?;
        let render_dir = rendered.project_dir;

        let skip = skip_patterns(&record, project_dir)?;
        let deleted = deleted_paths(&render_dir, project_dir)?;
        prune(&render_dir, &skip, &deleted)?;

        let include: Vec<NormalizedPath> =
            options.include_paths.iter().map(NormalizedPath::new).collect();
        let left = checkout.workspace("left")?;
        let right = checkout.workspace("right")?;

        if options.reverse {
            let universe = project_universe(project_dir, &include, &skip)?;
            copy_projection(project_dir, &left, &universe)?;
            copy_projection(&render_dir, &right, &universe)?;
        } else {
            let universe = Classifier::new(&include, None)?
                .classify(&render_dir, &render_dir)?
                .keep;
            copy_projection(&render_dir, &left, &universe)?;
            copy_projection(project_dir, &right, &universe)?;
        }

        let report = DiffReport::new(compute_diff(&left, &right, DiffLabels::default())?);
        tracing::debug!(reverse = options.reverse, has_diff = report.has_diff, "Computed project diff");
        Ok(report)
    }
}

/// Project paths compared in reverse mode.
fn project_universe(
    project_dir: &Path,
    include: &[NormalizedPath],
    skip: &PatternSet,
) -> Result<Vec<NormalizedPath>> {
    let state_record = NormalizedPath::new(ProjectFile::StateRecord.as_str());
    let kept = Classifier::new(include, Some(project_dir))?
        .classify(project_dir, project_dir)?
        .keep;
    Ok(kept
        .into_iter()
        .filter(|path| *path != state_record && !skip.is_match(path))
        .collect())
}
