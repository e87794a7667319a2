//! Simple templates versus dispatchers over nested sub-templates

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::manifest::json_kind;
use crate::{Error, Manifest, Prompter, Result};

static LABELLED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\(([^()]+)\)\s*$").unwrap());

/// One entry of a dispatcher manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTemplate {
    pub name: String,
    /// Path relative to the dispatcher's directory
    pub path: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SubTemplate {
    /// Text shown when asking the user to pick.
    pub fn label(&self) -> String {
        let title = self.title.as_deref().unwrap_or(&self.name);
        match &self.description {
            Some(description) => format!("{} ({})", title, description),
            None => title.to_string(),
        }
    }

    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim_start_matches("./");
        self.name == selector
            || self.path.trim_start_matches("./") == selector
            || self.title.as_deref() == Some(selector)
    }
}

#[derive(Debug, Deserialize)]
struct TemplatesEntry {
    path: String,
    title: Option<String>,
    description: Option<String>,
}

/// How a template directory renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// The directory holds a rendering root of its own
    Simple,
    /// The directory only selects one of several nested templates
    Dispatcher {
        choices: Vec<SubTemplate>,
        chosen: usize,
    },
}

impl TemplateKind {
    /// Decide the kind of `manifest` and, for dispatchers, pick a sub-template.
    ///
    /// `selector` is a previously recorded or overridden `template` value; it
    /// may name a sub-template by name, title or path. Without a usable
    /// selector the first choice is taken when `no_prompt` is set, and the
    /// user is asked otherwise.
    pub fn resolve(
        manifest: &Manifest,
        selector: Option<&Value>,
        no_prompt: bool,
        prompter: &dyn Prompter,
    ) -> Result<Self> {
        let Some(choices) = sub_templates(manifest)? else {
            return Ok(Self::Simple);
        };
        if choices.is_empty() {
            return Err(Error::Manifest {
                path: manifest.path().to_path_buf(),
                message: "nested template list is empty".into(),
            });
        }

        let preselected = selector
            .and_then(Value::as_str)
            .and_then(|s| choices.iter().position(|choice| choice.matches(s)));

        let chosen = match preselected {
            Some(index) => index,
            None if no_prompt => 0,
            None => {
                let labels: Vec<String> = choices.iter().map(SubTemplate::label).collect();
                let index = prompter.read_choice("template", &labels)?;
                index.min(choices.len() - 1)
            }
        };
        Ok(Self::Dispatcher { choices, chosen })
    }

    /// The chosen sub-template of a dispatcher.
    pub fn chosen(&self) -> Option<&SubTemplate> {
        match self {
            Self::Simple => None,
            Self::Dispatcher { choices, chosen } => choices.get(*chosen),
        }
    }
}

/// Parse the `templates` object or the `template` list, if present.
fn sub_templates(manifest: &Manifest) -> Result<Option<Vec<SubTemplate>>> {
    let invalid = |message: String| Error::Manifest {
        path: manifest.path().to_path_buf(),
        message,
    };

    if let Some(value) = manifest.entries().get("templates") {
        let Value::Object(entries) = value else {
            return Err(invalid(format!(
                "'templates' must be an object, found {}",
                json_kind(value)
            )));
        };
        let mut choices = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            let entry: TemplatesEntry = serde_json::from_value(entry.clone())
                .map_err(|e| invalid(format!("templates.{}: {}", name, e)))?;
            choices.push(SubTemplate {
                name: name.clone(),
                path: entry.path,
                title: entry.title,
                description: entry.description,
            });
        }
        return Ok(Some(choices));
    }

    if let Some(Value::Array(items)) = manifest.entries().get("template") {
        let mut choices = Vec::with_capacity(items.len());
        for item in items {
            let text = item
                .as_str()
                .ok_or_else(|| invalid("'template' entries must be strings".into()))?;
            let captures = LABELLED_PATH
                .captures(text)
                .ok_or_else(|| invalid(format!("'{}' is not of the form 'Label (./path)'", text)))?;
            choices.push(SubTemplate {
                name: captures[1].to_string(),
                path: captures[2].trim().to_string(),
                title: None,
                description: None,
            });
        }
        return Ok(Some(choices));
    }

    Ok(None)
}
