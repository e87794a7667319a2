//! `link`: attach an existing project to its template

use std::path::PathBuf;

use cruft_git::resolve_template_url;
use cruft_template::{Context, RenderRequest, context::inject_internal};

use crate::checkout::{TemplateCheckout, recorded_directory};
use crate::{Reconciler, Result, StateRecord, UserConfig};

/// Options for [`Reconciler::link`].
#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub project_dir: PathBuf,
    pub checkout: Option<String>,
    pub directory: Option<String>,
    pub extra_context: Context,
    pub config_file: Option<PathBuf>,
    pub default_config: bool,
    /// Record the tip without asking for another revision
    pub no_input: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            checkout: None,
            directory: None,
            extra_context: Context::new(),
            config_file: None,
            default_config: false,
            no_input: true,
        }
    }
}

impl Reconciler {
    /// Write a state record for a project generated without cruft.
    ///
    /// The context is resolved exactly as `create` would resolve it; nothing
    /// is rendered into the project.
    pub fn link(&self, template: &str, options: &LinkOptions) -> Result<StateRecord> {
        StateRecord::ensure_absent(&options.project_dir)?;

        let locator = resolve_template_url(template);
        let user = UserConfig::load(options.config_file.as_deref(), options.default_config)?;
        let checkout = TemplateCheckout::open(self.source.as_ref(), &locator, options.checkout.as_deref())?;
        let template_dir = checkout.template_dir(options.directory.as_deref());
        let output_parent = checkout.workspace("render")?;

        let request = RenderRequest {
            locator: &locator,
            revision: Some(checkout.revision()),
            prior: None,
            overrides: &options.extra_context,
            defaults: &user.default_context,
            no_prompt: options.no_input,
            refresh_private: false,
            prompter: self.prompter.as_ref(),
            output_parent: &output_parent,
            overwrite_if_exists: false,
        };
        let resolved = self.materializer.resolve(&template_dir, &request)?;

        let commit = if options.no_input {
            checkout.revision().to_string()
        } else {
            self.prompter.read_text("commit", checkout.revision())?
        };
        let mut context = resolved.context;
        if commit != checkout.revision() {
            inject_internal(&mut context, &locator, Some(&commit));
        }

        let mut record = StateRecord::new(&locator, commit, context);
        record.checkout = options.checkout.clone();
        record.directory =
            recorded_directory(options.directory.as_deref(), resolved.sub_template.as_ref());
        record.save(&options.project_dir)?;

        tracing::info!(project = %options.project_dir.display(), commit = %record.commit, "Linked project");
        Ok(record)
    }
}
