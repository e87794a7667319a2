//! Skip patterns from the state record and auxiliary project configuration
//!
//! Besides the record's own `skip` list, a project can declare patterns in
//! `pyproject.toml` under `[tool.cruft]` or in `Cargo.toml` under
//! `[package.metadata.cruft]`:
//!
//! ```toml
//! [package.metadata.cruft]
//! skip = ["src/generated", "*.lock"]
//! ```

use std::path::Path;

use cruft_fs::{ConfigStore, PatternSet, ProjectFile};
use serde::Deserialize;

use crate::{Result, StateRecord};

#[derive(Debug, Default, Deserialize)]
struct CruftSection {
    #[serde(default)]
    skip: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: PyProjectTools,
}

#[derive(Debug, Default, Deserialize)]
struct PyProjectTools {
    #[serde(default)]
    cruft: CruftSection,
}

#[derive(Debug, Default, Deserialize)]
struct CargoManifest {
    #[serde(default)]
    package: CargoPackage,
}

#[derive(Debug, Default, Deserialize)]
struct CargoPackage {
    #[serde(default)]
    metadata: CargoMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct CargoMetadata {
    #[serde(default)]
    cruft: CruftSection,
}

/// Skip patterns declared in the project's own configuration files.
pub fn auxiliary_skip(project_dir: &Path) -> Result<Vec<String>> {
    let store = ConfigStore::new();
    let mut patterns = Vec::new();

    let pyproject = project_dir.join(ProjectFile::PyProject);
    if let Some(config) = store.load_optional::<PyProject>(&pyproject)? {
        patterns.extend(config.tool.cruft.skip);
    }
    let cargo = project_dir.join(ProjectFile::CargoManifest);
    if let Some(config) = store.load_optional::<CargoManifest>(&cargo)? {
        patterns.extend(config.package.metadata.cruft.skip);
    }
    Ok(patterns)
}

/// All skip patterns in effect for `project_dir`, record first.
pub fn skip_patterns(record: &StateRecord, project_dir: &Path) -> Result<PatternSet> {
    let mut patterns = record.skip.clone();
    for pattern in auxiliary_skip(project_dir)? {
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    if !patterns.is_empty() {
        tracing::debug!(patterns = ?patterns, "Skip patterns in effect");
    }
    Ok(PatternSet::new(&patterns)?)
}
