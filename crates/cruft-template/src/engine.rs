//! Placeholder substitution
//!
//! Names and file contents are rendered with [`minijinja`], a Jinja2
//! implementation, so templates may use `{{ cookiecutter.key }}` expressions,
//! filter chains, `{% if %}` / `{% for %}` blocks, `{% raw %}` and comments.
//!
//! Behaviour follows cookiecutter's Jinja environment: undefined variables
//! are errors unless a `default` filter or `is defined` test catches them,
//! a trailing newline is kept, and scalars print the way Python prints them.

use std::sync::LazyLock;

use minijinja::value::ValueKind;
use minijinja::{Environment, ErrorKind, Output, State, UndefinedBehavior};
use regex::Regex;
use serde_json::Value;

use crate::{Context, ExtensionScope, RenderError};

static OPENING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{|\{%|\{#").unwrap());

/// Renders strings against one context.
pub struct Renderer {
    env: Environment<'static>,
    variables: minijinja::Value,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(context: &Context, scope: &ExtensionScope) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_formatter(python_formatter);
        scope.register(&mut env);

        let variables = minijinja::context! {
            cookiecutter => minijinja::Value::from_serialize(context),
        };
        Self { env, variables }
    }

    /// True if `text` contains anything the renderer would act on.
    pub fn has_markup(text: &str) -> bool {
        OPENING.is_match(text)
    }

    /// Render `template`; text without markup is returned as is.
    pub fn render(&self, template: &str) -> Result<String, RenderError> {
        if !Self::has_markup(template) {
            return Ok(template.to_string());
        }
        self.env
            .render_str(template, &self.variables)
            .map_err(RenderError::from)
    }

    /// Render every string inside `value`, recursing into lists and objects.
    pub fn render_value(&self, value: &Value) -> Result<Value, RenderError> {
        match value {
            Value::String(s) => Ok(Value::String(self.render(s)?)),
            Value::Array(items) => items
                .iter()
                .map(|item| self.render_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut rendered = serde_json::Map::new();
                for (key, item) in map {
                    rendered.insert(self.render(key)?, self.render_value(item)?);
                }
                Ok(Value::Object(rendered))
            }
            other => Ok(other.clone()),
        }
    }
}

/// Print booleans and `none` as `True`, `False` and `None`.
fn python_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &minijinja::Value,
) -> Result<(), minijinja::Error> {
    let word = match value.kind() {
        ValueKind::Bool if value.is_true() => "True",
        ValueKind::Bool => "False",
        ValueKind::None => "None",
        _ => return minijinja::escape_formatter(out, state, value),
    };
    std::fmt::Write::write_str(out, word)
        .map_err(|_| minijinja::Error::from(ErrorKind::WriteFailure))
}

/// String form of a value as Jinja would print it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
