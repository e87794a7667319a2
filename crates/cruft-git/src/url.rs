//! Template locator normalization

use std::path::{Path, PathBuf};

/// Turn local template locators into absolute paths.
///
/// `file://` URLs and plain paths that exist on disk are resolved so that a
/// state record stays valid when the project is moved. Anything else
/// (remote URLs, `git@host:` forms, paths that do not exist) is returned
/// unchanged.
pub fn resolve_template_url(url: &str) -> String {
    let candidate = match url.strip_prefix("file://") {
        Some(rest) => PathBuf::from(rest),
        None if has_scheme(url) => return url.to_string(),
        None => PathBuf::from(url),
    };

    if !candidate.exists() {
        return url.to_string();
    }
    match dunce::canonicalize(&candidate) {
        Ok(path) => path.display().to_string(),
        Err(e) => {
            tracing::debug!(locator = url, error = %e, "Could not canonicalize template path");
            url.to_string()
        }
    }
}

/// True for `scheme://...` locators. Windows drive letters are not schemes.
fn has_scheme(url: &str) -> bool {
    match url.find("://") {
        Some(idx) => {
            idx > 1
                && url[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
        }
        None => false,
    }
}

/// True if the locator points at the local filesystem.
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || (!has_scheme(url) && Path::new(url).exists())
}
