//! `create`: render a template into a new project

use std::path::PathBuf;

use cruft_git::resolve_template_url;
use cruft_template::{Context, RenderRequest};

use crate::checkout::{TemplateCheckout, recorded_directory};
use crate::{Reconciler, Result, StateRecord, UserConfig};

/// Options for [`Reconciler::create`].
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// The project directory is created inside this directory
    pub output_dir: PathBuf,
    pub checkout: Option<String>,
    /// Nested template inside the repository
    pub directory: Option<String>,
    pub extra_context: Context,
    pub config_file: Option<PathBuf>,
    pub default_config: bool,
    pub no_input: bool,
    pub overwrite_if_exists: bool,
    /// Recorded as the project's `skip` list
    pub skip: Vec<String>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            checkout: None,
            directory: None,
            extra_context: Context::new(),
            config_file: None,
            default_config: false,
            no_input: true,
            overwrite_if_exists: false,
            skip: Vec::new(),
        }
    }
}

impl Reconciler {
    /// Render `template` into a new project and write its state record.
    ///
    /// Returns the project directory. Nothing is written when cloning or
    /// locating the template fails.
    pub fn create(&self, template: &str, options: &CreateOptions) -> Result<PathBuf> {
        let locator = resolve_template_url(template);
        let user = UserConfig::load(options.config_file.as_deref(), options.default_config)?;
        let checkout = TemplateCheckout::open(self.source.as_ref(), &locator, options.checkout.as_deref())?;
        let template_dir = checkout.template_dir(options.directory.as_deref());

        let request = RenderRequest {
            locator: &locator,
            revision: Some(checkout.revision()),
            prior: None,
            overrides: &options.extra_context,
            defaults: &user.default_context,
            no_prompt: options.no_input,
            refresh_private: false,
            prompter: self.prompter.as_ref(),
            output_parent: &options.output_dir,
            overwrite_if_exists: options.overwrite_if_exists,
        };
        let rendered = self.materializer.render(&template_dir, &request)?;

        let mut record = StateRecord::new(&locator, checkout.revision(), rendered.context);
        record.checkout = options.checkout.clone();
        record.directory =
            recorded_directory(options.directory.as_deref(), rendered.sub_template.as_ref());
        record.skip = options.skip.clone();
        record.save(&rendered.project_dir)?;

        tracing::info!(
            project = %rendered.project_dir.display(),
            commit = %record.commit,
            "Created project"
        );
        Ok(rendered.project_dir)
    }
}
