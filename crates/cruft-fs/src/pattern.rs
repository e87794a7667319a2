//! Path glob sets for skip lists and copy-without-render rules

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::{Error, NormalizedPath, Result};

/// A set of path globs matched against project-relative paths.
///
/// A path matches when it, or any of its ancestors, matches one of the
/// globs, so a pattern naming a directory covers everything below it.
/// `*` also matches `/`, which lets `*.md` reach nested files.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PatternSet {
    /// A set that matches nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Compile `patterns`. Leading `./` and trailing `/` are ignored.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let normalized = NormalizedPath::new(pattern.as_ref());
            if normalized.is_root() {
                continue;
            }
            let glob = Glob::new(normalized.as_str()).map_err(|e| Error::InvalidPattern {
                pattern: pattern.as_ref().to_string(),
                message: e.to_string(),
            })?;
            builder.add(glob);
            kept.push(normalized.as_str().to_string());
        }
        let set = builder.build().map_err(|e| Error::InvalidPattern {
            pattern: kept.join(", "),
            message: e.to_string(),
        })?;
        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// The normalized source patterns, in input order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if `path` or one of its ancestors matches.
    pub fn is_match(&self, path: &NormalizedPath) -> bool {
        if self.is_empty() || path.is_root() {
            return false;
        }
        let mut prefix = String::new();
        for segment in path.segments() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if self.set.is_match(&prefix) {
                return true;
            }
        }
        false
    }
}
