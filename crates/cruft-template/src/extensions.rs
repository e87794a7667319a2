//! Extension filters and the per-render extension scope

use minijinja::{Environment, ErrorKind, Value};

use crate::RenderError;

const SLUGIFY_EXTENSION: &str = "cookiecutter.extensions.SlugifyExtension";
const JSONIFY_EXTENSION: &str = "cookiecutter.extensions.JsonifyExtension";

/// A filter pack a template can ask for in `_extensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extension {
    Slugify,
    Jsonify,
}

impl Extension {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            SLUGIFY_EXTENSION => Some(Self::Slugify),
            JSONIFY_EXTENSION => Some(Self::Jsonify),
            _ => None,
        }
    }
}

/// Extension filters available to one render call.
///
/// The Jinja built-in filters are always present. Extensions named in the
/// manifest's `_extensions` list add their filters to the environments
/// created while the scope lives; nothing is registered globally, so two
/// renders of different templates never see each other's filters.
#[derive(Debug, Default)]
pub struct ExtensionScope {
    extensions: Vec<Extension>,
    loaded: Vec<String>,
}

impl ExtensionScope {
    /// A scope without extension filters.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Acquire a scope with the named extensions loaded.
    pub fn acquire<S: AsRef<str>>(extensions: &[S]) -> Result<Self, RenderError> {
        let mut scope = Self::builtin();
        for name in extensions {
            let name = name.as_ref();
            let extension = Extension::from_name(name).ok_or_else(|| RenderError::UnknownExtension {
                name: name.to_string(),
            })?;
            scope.extensions.push(extension);
            scope.loaded.push(name.to_string());
        }
        if !scope.loaded.is_empty() {
            tracing::debug!(extensions = ?scope.loaded, "Loaded template extensions");
        }
        Ok(scope)
    }

    /// Add this scope's filters to `env`.
    pub(crate) fn register(&self, env: &mut Environment<'_>) {
        for extension in &self.extensions {
            match extension {
                Extension::Slugify => env.add_filter("slugify", slugify),
                Extension::Jsonify => env.add_filter("jsonify", jsonify),
            }
        }
    }
}

impl Drop for ExtensionScope {
    fn drop(&mut self) {
        if !self.loaded.is_empty() {
            tracing::trace!(extensions = ?self.loaded, "Released template extensions");
        }
    }
}

fn text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn slugify(value: Value) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;
    for c in text(&value).chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }
    slug
}

fn jsonify(value: Value) -> Result<String, minijinja::Error> {
    serde_json::to_string(&value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}
