//! The `cookiecutter.json` parameter manifest

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{Context, Error, Result};

/// Declared parameters of one template directory, in declaration order.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Context,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "cookiecutter.json";

    /// Read the manifest of `template_dir`.
    pub fn load(template_dir: &Path) -> Result<Self> {
        let path = template_dir.join(Self::FILE_NAME);
        if !path.is_file() {
            return Err(Error::TemplateNotFound {
                path: template_dir.to_path_buf(),
                reason: format!("{} is missing", Self::FILE_NAME),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Self::parse(&path, &content)
    }

    /// Parse manifest text; `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(entries) => Ok(Self {
                path: path.to_path_buf(),
                entries,
            }),
            other => Err(Error::Manifest {
                path: path.to_path_buf(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared parameters with their raw default values.
    pub fn entries(&self) -> &Context {
        &self.entries
    }

    /// Extension names listed under `_extensions`.
    pub fn extensions(&self) -> Vec<String> {
        string_list(self.entries.get("_extensions"))
    }

    /// Globs listed under `_copy_without_render`.
    pub fn copy_without_render(&self) -> Vec<String> {
        string_list(self.entries.get("_copy_without_render"))
    }
}

/// Collect the string elements of a JSON list; anything else yields nothing.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
