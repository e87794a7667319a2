//! Forward-slash paths used for tree comparison and diff headers

use std::path::{Component, Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Relative paths are stored without a leading `./` and without trailing
/// slashes, so two spellings of the same project-relative path compare equal
/// and sort the same way on every platform. Ordering is plain string order,
/// which is what keeps classification and diff output reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        }
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        if normalized == "." {
            normalized.clear();
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the empty relative path (the root itself).
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = NormalizedPath::new(segment);
        if self.inner.is_empty() {
            return segment;
        }
        if segment.inner.is_empty() {
            return self.clone();
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment.inner)
        } else {
            format!("{}/{}", self.inner, segment.inner)
        };
        Self { inner: joined }
    }

    /// Express `path` relative to `base`.
    ///
    /// Returns `None` when `path` is not located under `base`.
    pub fn relative(path: &Path, base: &Path) -> Option<Self> {
        let stripped = path.strip_prefix(base).ok()?;
        let parts: Vec<String> = stripped
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(Self {
            inner: parts.join("/"),
        })
    }

    /// Resolve this relative path against a native base directory.
    pub fn under(&self, base: &Path) -> PathBuf {
        if self.inner.is_empty() {
            return base.to_path_buf();
        }
        self.inner
            .split('/')
            .fold(base.to_path_buf(), |acc, part| acc.join(part))
    }

    /// Iterate over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// True if `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &NormalizedPath) -> bool {
        if self.inner.is_empty() {
            return true;
        }
        other.inner == self.inner
            || (other.inner.starts_with(&self.inner)
                && other.inner.as_bytes().get(self.inner.len()) == Some(&b'/'))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ if !trimmed.is_empty() => Some(Self {
                inner: String::new(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_dot_prefix_and_trailing_slash() {
        assert_eq!(NormalizedPath::new("./src/lib.rs/").as_str(), "src/lib.rs");
        assert!(NormalizedPath::new(".").is_root());
    }

    #[test]
    fn contains_respects_segment_boundaries() {
        let dir = NormalizedPath::new("src");
        assert!(dir.contains(&NormalizedPath::new("src/main.rs")));
        assert!(dir.contains(&NormalizedPath::new("src")));
        assert!(!dir.contains(&NormalizedPath::new("srcs/main.rs")));
    }

    #[test]
    fn parent_of_top_level_entry_is_root() {
        let parent = NormalizedPath::new("README.md").parent().unwrap();
        assert!(parent.is_root());
    }
}
