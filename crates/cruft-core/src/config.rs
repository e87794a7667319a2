//! User configuration and extra context
//!
//! The user config is the cookiecutter YAML file; only its
//! `default_context` mapping matters here. It is looked up in this order:
//!
//! 1. an explicit `--config-file`
//! 2. `$COOKIECUTTER_CONFIG`
//! 3. `~/.cookiecutterrc`, when it exists
//!
//! `--default-config` ignores all of them.

use std::path::{Path, PathBuf};

use cruft_fs::{ConfigStore, io};
use cruft_template::Context;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Environment variable naming the user config file
pub const CONFIG_ENV: &str = "COOKIECUTTER_CONFIG";

/// File name of the user config inside the home directory
pub const USER_CONFIG_FILE: &str = ".cookiecutterrc";

/// The parts of the cookiecutter user config cruft reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserConfig {
    /// Values that sit between extra context and manifest defaults
    #[serde(default)]
    pub default_context: Context,
}

impl UserConfig {
    /// Load the user config following the lookup order.
    pub fn load(explicit: Option<&Path>, default_config: bool) -> Result<Self> {
        if default_config {
            return Ok(Self::default());
        }
        let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match locate(explicit, env, dirs::home_dir()) {
            Some(Location::Required(path)) => Self::load_from(&path),
            Some(Location::Optional(path)) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a config file that must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(path = %path.display(), "Loading user config");
        // Empty YAML documents deserialize to unit, not a mapping
        if io::read_text(path)?.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(ConfigStore::new().load(path)?)
    }
}

#[derive(Debug, PartialEq)]
enum Location {
    Required(PathBuf),
    Optional(PathBuf),
}

fn locate(explicit: Option<&Path>, env: Option<PathBuf>, home: Option<PathBuf>) -> Option<Location> {
    if let Some(path) = explicit {
        return Some(Location::Required(path.to_path_buf()));
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Some(Location::Required(path));
    }
    home.map(|home| Location::Optional(home.join(USER_CONFIG_FILE)))
}

/// Combine `--extra-context-file` and `--extra-context`.
///
/// Both must hold a JSON object; inline values win over file values.
pub fn parse_extra_context(inline: Option<&str>, file: Option<&Path>) -> Result<Context> {
    let mut context = Context::new();
    if let Some(path) = file {
        let content = io::read_text(path)?;
        context.extend(parse_object(&content, &path.display().to_string())?);
    }
    if let Some(text) = inline {
        context.extend(parse_object(text, "--extra-context")?);
    }
    Ok(context)
}

fn parse_object(text: &str, origin: &str) -> Result<Context> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::ExtraContext {
        message: format!("{}: {}", origin, e),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::ExtraContext {
            message: format!("{}: expected a JSON object, found {}", origin, other),
        }),
    }
}
