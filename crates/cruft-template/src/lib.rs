//! Template materializer for cruft
//!
//! Renders cookiecutter-layout templates (a `cookiecutter.json` manifest next
//! to a `{{cookiecutter.*}}` directory) into plain directory trees. Rendering
//! is a pure function of the template content and the resolved context, which
//! is what lets a project be re-rendered at any historical revision.
//!
//! The pieces, in the order a render uses them:
//!
//! - [`Manifest`] reads `cookiecutter.json` and decides the [`TemplateKind`]
//! - [`context`] resolves parameter values from overrides, the prior context,
//!   user defaults and the manifest
//! - [`engine`] substitutes `{{ cookiecutter.* }}` placeholders, with filters
//!   provided by an [`ExtensionScope`]
//! - [`generate`] walks the rendering root and writes the output tree
//! - [`prune`] removes skipped and user-deleted paths from a render

pub mod context;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod generate;
pub mod kind;
pub mod manifest;
pub mod materializer;
pub mod prompt;
pub mod prune;

pub use context::Context;
pub use engine::Renderer;
pub use error::{Error, RenderError, Result};
pub use extensions::ExtensionScope;
pub use kind::{SubTemplate, TemplateKind};
pub use manifest::Manifest;
pub use materializer::{Materializer, RenderRequest, RenderedTree, ResolvedTemplate};
pub use prompt::{NoPrompt, Prompter};
