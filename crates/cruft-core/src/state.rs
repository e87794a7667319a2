//! The `.cruft.json` state record
//!
//! The record is the only thing cruft persists. It is written with four-space
//! indentation, unescaped non-ASCII text, no trailing newline and a fixed key
//! order, and it is only rewritten when its bytes change, so a project under
//! version control never sees formatting churn.

use std::path::{Path, PathBuf};

use cruft_fs::{ProjectFile, io};
use cruft_template::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// The `context` object: parameters live under `cookiecutter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedContext {
    #[serde(default)]
    pub cookiecutter: Context,
    /// Other top-level context keys, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything needed to re-render the tree a project was last synced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Template URL or absolute local path
    pub template: String,
    /// Revision the project is synchronized to
    pub commit: String,
    /// Reference that was resolved to obtain `commit`
    #[serde(default)]
    pub checkout: Option<String>,
    #[serde(default)]
    pub context: RecordedContext,
    /// Nested template inside the repository
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,
    /// Keys this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateRecord {
    pub fn new(template: impl Into<String>, commit: impl Into<String>, context: Context) -> Self {
        Self {
            template: template.into(),
            commit: commit.into(),
            checkout: None,
            context: RecordedContext {
                cookiecutter: context,
                extra: Map::new(),
            },
            directory: None,
            skip: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Location of the record for `project_dir`.
    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(ProjectFile::StateRecord)
    }

    /// True if `project_dir` holds a record.
    pub fn exists(project_dir: &Path) -> bool {
        Self::path(project_dir).is_file()
    }

    /// Fail with [`Error::AlreadyLinked`] if `project_dir` holds a record.
    pub fn ensure_absent(project_dir: &Path) -> Result<()> {
        let path = Self::path(project_dir);
        if path.is_file() {
            return Err(Error::AlreadyLinked { path });
        }
        Ok(())
    }

    /// Read the record of `project_dir`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = Self::path(project_dir);
        if !path.is_file() {
            return Err(Error::StateRecordMissing {
                project_dir: project_dir.to_path_buf(),
            });
        }
        let content = io::read_text(&path)?;
        Self::parse(&path, &content)
    }

    /// Parse record text; `path` is only used for messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::StateRecord {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical text of the record.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| Error::StateRecord {
            path: PathBuf::from(ProjectFile::StateRecord.as_str()),
            message: e.to_string(),
        })
    }

    /// Write the record into `project_dir`.
    ///
    /// Returns `false` when the file already held exactly these bytes.
    pub fn save(&self, project_dir: &Path) -> Result<bool> {
        let path = Self::path(project_dir);
        let written = io::write_text_if_changed(&path, &self.to_json()?)?;
        if written {
            tracing::info!(path = %path.display(), commit = %self.commit, "Wrote state record");
        }
        Ok(written)
    }

    /// Parameters used for the last render.
    pub fn parameters(&self) -> &Context {
        &self.context.cookiecutter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn serializes_in_fixed_order_with_four_spaces() {
        let mut record = StateRecord::new(
            "https://example.com/t.git",
            "abc123",
            context(json!({"project_slug": "démo", "_template": "https://example.com/t.git"})),
        );
        record.skip = vec!["docs".into()];

        let expected = r#"{
    "template": "https://example.com/t.git",
    "commit": "abc123",
    "checkout": null,
    "context": {
        "cookiecutter": {
            "project_slug": "démo",
            "_template": "https://example.com/t.git"
        }
    },
    "directory": null,
    "skip": [
        "docs"
    ]
}"#;
        assert_eq!(record.to_json().unwrap(), expected);
    }

    #[test]
    fn empty_skip_is_omitted() {
        let record = StateRecord::new("t", "c", Context::new());
        let text = record.to_json().unwrap();
        assert!(!text.contains("skip"), "{}", text);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let text = r#"{
    "template": "t",
    "commit": "c",
    "context": {
        "cookiecutter": {
            "b": 1,
            "a": 2
        },
        "extra": true
    },
    "directory": null,
    "future_key": [
        1
    ]
}"#;
        let record = StateRecord::parse(Path::new(".cruft.json"), text).unwrap();
        assert_eq!(record.checkout, None);
        assert_eq!(record.extra.get("future_key"), Some(&json!([1])));
        assert_eq!(record.context.extra.get("extra"), Some(&json!(true)));
        let keys: Vec<&String> = record.parameters().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);

        let rewritten = record.to_json().unwrap();
        assert!(rewritten.ends_with("\"future_key\": [\n        1\n    ]\n}"), "{}", rewritten);
    }

    #[test]
    fn save_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let record = StateRecord::new("t", "c", context(json!({"name": "x"})));

        assert!(record.save(dir.path()).unwrap());
        let first = std::fs::read(StateRecord::path(dir.path())).unwrap();
        assert!(!record.save(dir.path()).unwrap());
        let reloaded = StateRecord::load(dir.path()).unwrap();
        assert!(!reloaded.save(dir.path()).unwrap());
        assert_eq!(std::fs::read(StateRecord::path(dir.path())).unwrap(), first);
    }

    #[test]
    fn missing_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = StateRecord::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::StateRecordMissing { .. }));
    }

    #[test]
    fn malformed_record_is_reported() {
        let err = StateRecord::parse(Path::new(".cruft.json"), "{\"template\": 1}").unwrap_err();
        assert!(matches!(err, Error::StateRecord { .. }));
    }

    #[test]
    fn ensure_absent_refuses_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        StateRecord::new("t", "c", Context::new()).save(dir.path()).unwrap();
        assert!(matches!(
            StateRecord::ensure_absent(dir.path()),
            Err(Error::AlreadyLinked { .. })
        ));
    }
}
