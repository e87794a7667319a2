//! Filesystem helpers for cruft
//!
//! Provides forward-slash normalized paths, atomic writes for the state
//! record, format-agnostic config loading, path glob sets and
//! self-cleaning scratch directories for template renders.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod pattern;
pub mod scratch;

pub use config::ConfigStore;
pub use constants::ProjectFile;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
pub use pattern::PatternSet;
pub use scratch::ScratchDir;
