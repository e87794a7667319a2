//! Parameter context resolution
//!
//! Values come from four layers, highest precedence first: explicit
//! overrides, the context recorded for a previous render, the user's
//! configured defaults and the manifest itself. Keys are visited in manifest
//! order and string defaults are rendered against the values resolved so far,
//! so `"slug": "{{ cookiecutter.name | lower }}"` follows whatever `name`
//! became.

use serde_json::Value;

use crate::{ExtensionScope, Manifest, Prompter, Renderer, Result};

/// An ordered parameter map, as stored under `context.cookiecutter`.
pub type Context = serde_json::Map<String, Value>;

/// Key under which the template locator is recorded.
pub const TEMPLATE_KEY: &str = "_template";
/// Key under which the rendered revision is recorded.
pub const COMMIT_KEY: &str = "_commit";

/// Value sources for one resolution.
#[derive(Debug, Clone, Copy)]
pub struct ContextSources<'a> {
    pub overrides: &'a Context,
    pub prior: Option<&'a Context>,
    pub defaults: &'a Context,
}

/// Knobs for one resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextOptions {
    /// Never ask; use the resolved defaults
    pub no_prompt: bool,
    /// Take private values from the manifest rather than the prior context
    pub refresh_private: bool,
}

/// True for `_`-prefixed keys, which are never prompted for.
pub fn is_private(key: &str) -> bool {
    key.starts_with('_')
}

/// True for `__`-prefixed keys, which are private but still rendered.
pub fn is_rendered_private(key: &str) -> bool {
    key.starts_with("__")
}

/// Resolve the full context for `manifest`.
pub fn resolve_context(
    manifest: &Manifest,
    sources: ContextSources<'_>,
    options: ContextOptions,
    prompter: &dyn Prompter,
    scope: &ExtensionScope,
) -> Result<Context> {
    let mut context = Context::new();

    for (key, raw) in manifest.entries() {
        let supplied = supplied_value(key, sources, options);

        if is_private(key) && !is_rendered_private(key) {
            context.insert(key.clone(), supplied.unwrap_or(raw).clone());
            continue;
        }

        let renderer = Renderer::new(&context, scope);
        if is_rendered_private(key) {
            let value = renderer.render_value(supplied.unwrap_or(raw))?;
            context.insert(key.clone(), value);
            continue;
        }

        let value = match raw {
            Value::Array(options_raw) => {
                let mut choices = options_raw
                    .iter()
                    .map(|option| renderer.render_value(option))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if let Some(current) = supplied {
                    // The supplied value leads the list, as the default
                    choices.retain(|choice| choice != current);
                    choices.insert(0, current.clone());
                }
                choose(key, choices, options.no_prompt, prompter)?
            }
            Value::Bool(default) => {
                let default = supplied.and_then(Value::as_bool).unwrap_or(*default);
                if options.no_prompt {
                    Value::Bool(default)
                } else {
                    Value::Bool(prompter.read_bool(key, default)?)
                }
            }
            Value::Object(_) => match supplied {
                Some(value) => value.clone(),
                None => renderer.render_value(raw)?,
            },
            Value::String(_) => {
                let default = match supplied {
                    Some(value) => value.clone(),
                    None => renderer.render_value(raw)?,
                };
                match (&default, options.no_prompt) {
                    (Value::String(text), false) => Value::String(prompter.read_text(key, text)?),
                    _ => default,
                }
            }
            other => supplied.unwrap_or(other).clone(),
        };
        context.insert(key.clone(), value);
    }

    // Private values recorded earlier survive templates that stopped declaring them
    if !options.refresh_private
        && let Some(prior) = sources.prior
    {
        for (key, value) in prior {
            if is_private(key) && !context.contains_key(key) {
                context.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(context)
}

/// Record the template locator and revision in `context`.
pub fn inject_internal(context: &mut Context, locator: &str, revision: Option<&str>) {
    context.insert(TEMPLATE_KEY.into(), Value::String(locator.to_string()));
    if let Some(revision) = revision {
        context.insert(COMMIT_KEY.into(), Value::String(revision.to_string()));
    }
}

fn supplied_value<'a>(
    key: &str,
    sources: ContextSources<'a>,
    options: ContextOptions,
) -> Option<&'a Value> {
    if let Some(value) = sources.overrides.get(key) {
        return Some(value);
    }
    let prior_allowed = !(options.refresh_private && is_private(key));
    if prior_allowed && let Some(value) = sources.prior.and_then(|prior| prior.get(key)) {
        return Some(value);
    }
    sources.defaults.get(key)
}

fn choose(
    key: &str,
    choices: Vec<Value>,
    no_prompt: bool,
    prompter: &dyn Prompter,
) -> Result<Value> {
    if choices.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    if no_prompt {
        return Ok(choices[0].clone());
    }
    let labels: Vec<String> = choices.iter().map(crate::engine::display_value).collect();
    let index = prompter.read_choice(key, &labels)?;
    Ok(choices[index.min(choices.len() - 1)].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoPrompt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::Path;

    fn map(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn manifest(value: Value) -> Manifest {
        Manifest::parse(Path::new("cookiecutter.json"), &value.to_string()).unwrap()
    }

    fn resolve(manifest: &Manifest, sources: ContextSources<'_>, options: ContextOptions) -> Context {
        resolve_context(manifest, sources, options, &NoPrompt, &ExtensionScope::builtin()).unwrap()
    }

    fn quiet() -> ContextOptions {
        ContextOptions {
            no_prompt: true,
            refresh_private: false,
        }
    }

    #[test]
    fn defaults_render_against_earlier_values() {
        let m = manifest(json!({
            "name": "My Lib",
            "slug": "{{ cookiecutter.name | lower | replace(' ', '_') }}",
            "license": ["MIT", "Apache-2.0"],
            "docker": false,
        }));
        let empty = Context::new();
        let context = resolve(
            &m,
            ContextSources {
                overrides: &empty,
                prior: None,
                defaults: &empty,
            },
            quiet(),
        );
        assert_eq!(
            Value::Object(context),
            json!({"name": "My Lib", "slug": "my_lib", "license": "MIT", "docker": false})
        );
    }

    #[test]
    fn precedence_overrides_prior_defaults_manifest() {
        let m = manifest(json!({"a": "m", "b": "m", "c": "m", "d": "m"}));
        let overrides = map(json!({"a": "override"}));
        let prior = map(json!({"a": "prior", "b": "prior"}));
        let defaults = map(json!({"a": "user", "b": "user", "c": "user"}));
        let context = resolve(
            &m,
            ContextSources {
                overrides: &overrides,
                prior: Some(&prior),
                defaults: &defaults,
            },
            quiet(),
        );
        assert_eq!(
            Value::Object(context),
            json!({"a": "override", "b": "prior", "c": "user", "d": "m"})
        );
    }

    #[test]
    fn private_values_are_raw_unless_double_underscore() {
        let m = manifest(json!({
            "name": "x",
            "_raw": "{{ cookiecutter.name }}",
            "__rendered": "{{ cookiecutter.name }}-y",
        }));
        let empty = Context::new();
        let context = resolve(
            &m,
            ContextSources {
                overrides: &empty,
                prior: None,
                defaults: &empty,
            },
            quiet(),
        );
        assert_eq!(context["_raw"], json!("{{ cookiecutter.name }}"));
        assert_eq!(context["__rendered"], json!("x-y"));
    }

    #[test]
    fn prior_private_keys_survive_unless_refreshed() {
        let m = manifest(json!({"name": "x", "_secret": "new"}));
        let prior = map(json!({
            "name": "kept",
            "_secret": "old",
            "_template": "https://example.com/t.git",
            "dropped_public": "gone",
        }));
        let empty = Context::new();
        let sources = ContextSources {
            overrides: &empty,
            prior: Some(&prior),
            defaults: &empty,
        };

        let kept = resolve(&m, sources, quiet());
        assert_eq!(
            Value::Object(kept),
            json!({"name": "kept", "_secret": "old", "_template": "https://example.com/t.git"})
        );

        let refreshed = resolve(
            &m,
            sources,
            ContextOptions {
                no_prompt: true,
                refresh_private: true,
            },
        );
        assert_eq!(Value::Object(refreshed), json!({"name": "kept", "_secret": "new"}));
    }

    #[test]
    fn prior_choice_stays_selected() {
        let m = manifest(json!({"license": ["MIT", "BSD", "GPL"]}));
        let prior = map(json!({"license": "GPL"}));
        let empty = Context::new();
        let context = resolve(
            &m,
            ContextSources {
                overrides: &empty,
                prior: Some(&prior),
                defaults: &empty,
            },
            quiet(),
        );
        assert_eq!(context["license"], json!("GPL"));
    }

    struct Scripted {
        answers: RefCell<Vec<String>>,
        asked: RefCell<Vec<String>>,
    }

    impl Prompter for Scripted {
        fn read_text(&self, key: &str, _default: &str) -> Result<String> {
            self.asked.borrow_mut().push(key.to_string());
            Ok(self.answers.borrow_mut().remove(0))
        }

        fn read_bool(&self, key: &str, default: bool) -> Result<bool> {
            self.asked.borrow_mut().push(key.to_string());
            Ok(!default)
        }

        fn read_choice(&self, key: &str, _options: &[String]) -> Result<usize> {
            self.asked.borrow_mut().push(key.to_string());
            Ok(1)
        }
    }

    #[test]
    fn prompts_public_keys_in_order() {
        let m = manifest(json!({
            "name": "x",
            "_hidden": "h",
            "license": ["MIT", "BSD"],
            "docker": true,
            "slug": "{{ cookiecutter.name }}",
        }));
        let prompter = Scripted {
            answers: RefCell::new(vec!["Typed".into(), "typed-slug".into()]),
            asked: RefCell::new(Vec::new()),
        };
        let empty = Context::new();
        let context = resolve_context(
            &m,
            ContextSources {
                overrides: &empty,
                prior: None,
                defaults: &empty,
            },
            ContextOptions::default(),
            &prompter,
            &ExtensionScope::builtin(),
        )
        .unwrap();

        assert_eq!(*prompter.asked.borrow(), vec!["name", "license", "docker", "slug"]);
        assert_eq!(
            Value::Object(context),
            json!({"name": "Typed", "_hidden": "h", "license": "BSD", "docker": false, "slug": "typed-slug"})
        );
    }

    #[test]
    fn inject_internal_overwrites_in_place() {
        let mut context = map(json!({"_template": "old", "name": "x"}));
        inject_internal(&mut context, "new", Some("abc"));
        let keys: Vec<_> = context.keys().cloned().collect();
        assert_eq!(keys, vec!["_template", "name", "_commit"]);
        assert_eq!(context["_template"], json!("new"));
    }
}
