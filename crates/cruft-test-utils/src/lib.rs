//! Shared test utilities for the cruft workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: thin wrappers over the `git` CLI
//! - [`template`]: [`TemplateRepo`] builder for cookiecutter-layout template repositories

pub mod git;
pub mod template;

pub use template::TemplateRepo;
