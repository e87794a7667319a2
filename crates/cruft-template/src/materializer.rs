//! Template materialization: context resolution plus file generation

use std::path::{Path, PathBuf};

use cruft_fs::NormalizedPath;

use crate::context::{self, ContextOptions, ContextSources};
use crate::generate::{self, GenerateOptions};
use crate::{Context, ExtensionScope, Manifest, NoPrompt, Prompter, Result, TemplateKind};

/// Everything one render needs besides the template directory.
pub struct RenderRequest<'a> {
    /// Recorded as `_template` in the context
    pub locator: &'a str,
    /// Recorded as `_commit` in the context when known
    pub revision: Option<&'a str>,
    /// Context of the previous render of this project
    pub prior: Option<&'a Context>,
    /// Values that beat every other source
    pub overrides: &'a Context,
    /// The user's configured `default_context`
    pub defaults: &'a Context,
    pub no_prompt: bool,
    pub refresh_private: bool,
    pub prompter: &'a dyn Prompter,
    /// The project directory is created inside this directory
    pub output_parent: &'a Path,
    pub overwrite_if_exists: bool,
}

impl<'a> RenderRequest<'a> {
    /// A non-interactive request with no prior context and no overrides.
    pub fn new(locator: &'a str, output_parent: &'a Path, empty: &'a Context) -> Self {
        Self {
            locator,
            revision: None,
            prior: None,
            overrides: empty,
            defaults: empty,
            no_prompt: true,
            refresh_private: false,
            prompter: &NoPrompt,
            output_parent,
            overwrite_if_exists: false,
        }
    }

    fn sources(&self) -> ContextSources<'a> {
        ContextSources {
            overrides: self.overrides,
            prior: self.prior,
            defaults: self.defaults,
        }
    }

    fn options(&self) -> ContextOptions {
        ContextOptions {
            no_prompt: self.no_prompt,
            refresh_private: self.refresh_private,
        }
    }
}

/// A template directory with its context resolved but nothing written.
#[derive(Debug)]
pub struct ResolvedTemplate {
    /// Directory holding the manifest and rendering root that will be used
    pub template_dir: PathBuf,
    pub context: Context,
    /// Path of the chosen nested template, relative to the requested directory
    pub sub_template: Option<NormalizedPath>,
    scope: ExtensionScope,
}

/// Output of a render.
#[derive(Debug, Clone)]
pub struct RenderedTree {
    pub project_dir: PathBuf,
    pub context: Context,
    pub sub_template: Option<NormalizedPath>,
}

/// Renders templates; stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct Materializer;

impl Materializer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the context of `template_dir`, following dispatchers.
    pub fn resolve(&self, template_dir: &Path, request: &RenderRequest<'_>) -> Result<ResolvedTemplate> {
        let manifest = Manifest::load(template_dir)?;

        let selector = request
            .overrides
            .get("template")
            .or_else(|| request.prior.and_then(|prior| prior.get("template")));
        let kind = TemplateKind::resolve(&manifest, selector, request.no_prompt, request.prompter)?;

        match kind {
            TemplateKind::Simple => {
                generate::find_root(template_dir)?;
                let scope = ExtensionScope::acquire(manifest.extensions().as_slice())?;
                let mut context = context::resolve_context(
                    &manifest,
                    request.sources(),
                    request.options(),
                    request.prompter,
                    &scope,
                )?;
                context::inject_internal(&mut context, request.locator, request.revision);
                Ok(ResolvedTemplate {
                    template_dir: template_dir.to_path_buf(),
                    context,
                    sub_template: None,
                    scope,
                })
            }
            TemplateKind::Dispatcher { ref choices, chosen } => {
                let sub = &choices[chosen];
                let sub_path = NormalizedPath::new(&sub.path);
                tracing::info!(template = %sub.name, path = %sub_path, "Selected nested template");

                let mut nested = self.resolve(&sub_path.under(template_dir), request)?;
                nested.sub_template = Some(match nested.sub_template.take() {
                    Some(deeper) => sub_path.join(deeper.as_str()),
                    None => sub_path,
                });
                Ok(nested)
            }
        }
    }

    /// Resolve the context and write the project tree.
    pub fn render(&self, template_dir: &Path, request: &RenderRequest<'_>) -> Result<RenderedTree> {
        let resolved = self.resolve(template_dir, request)?;
        let project_dir = generate::generate_files(
            &resolved.template_dir,
            &resolved.context,
            &resolved.scope,
            GenerateOptions {
                output_parent: request.output_parent,
                overwrite_if_exists: request.overwrite_if_exists,
            },
        )?;
        Ok(RenderedTree {
            project_dir,
            context: resolved.context,
            sub_template: resolved.sub_template,
        })
    }
}
