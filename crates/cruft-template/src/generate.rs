//! Writing a rendered project tree

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use cruft_fs::{NormalizedPath, PatternSet};
use walkdir::WalkDir;

use crate::manifest::string_list;
use crate::{Context, Error, ExtensionScope, Renderer, Result};

/// Locate the rendering root of `template_dir`.
///
/// The root is the directory entry whose name holds a `{{ cookiecutter.* }}`
/// placeholder. When several qualify the first by name wins.
pub fn find_root(template_dir: &Path) -> Result<PathBuf> {
    let not_found = |reason: &str| Error::TemplateNotFound {
        path: template_dir.to_path_buf(),
        reason: reason.to_string(),
    };

    let entries = fs::read_dir(template_dir).map_err(|_| not_found("directory is not readable"))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy())
                .is_some_and(|name| {
                    name.contains("{{") && name.contains("}}") && name.contains("cookiecutter.")
                })
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| not_found("no '{{cookiecutter.*}}' directory"))
}

/// Where and how to write the output.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    /// The project directory is created inside this directory
    pub output_parent: &'a Path,
    /// Write into an existing project directory instead of failing
    pub overwrite_if_exists: bool,
}

/// Render the tree below the root of `template_dir` and return the project directory.
pub fn generate_files(
    template_dir: &Path,
    context: &Context,
    scope: &ExtensionScope,
    options: GenerateOptions<'_>,
) -> Result<PathBuf> {
    let root = find_root(template_dir)?;
    let renderer = Renderer::new(context, scope);

    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let project_name = renderer.render(&root_name)?;
    if project_name.trim().is_empty() {
        return Err(Error::TemplateNotFound {
            path: template_dir.to_path_buf(),
            reason: format!("'{}' renders to an empty name", root_name),
        });
    }

    let project_dir = options.output_parent.join(&project_name);
    if project_dir.exists() && !options.overwrite_if_exists {
        return Err(Error::OutputExists { path: project_dir });
    }
    fs::create_dir_all(&project_dir).map_err(|e| Error::io(&project_dir, e))?;

    let copy_only = PatternSet::new(string_list(context.get("_copy_without_render")))?;
    let writer = TreeWriter {
        renderer: &renderer,
        copy_only: &copy_only,
    };
    writer.write_tree(&root, &project_dir)?;

    tracing::debug!(project = %project_dir.display(), "Rendered template");
    Ok(project_dir)
}

struct TreeWriter<'a> {
    renderer: &'a Renderer,
    copy_only: &'a PatternSet,
}

impl TreeWriter<'_> {
    /// Mirror `root` into `project_dir`, rendering every name on the way.
    ///
    /// Directory permissions are applied last so a read-only directory in
    /// the template can still be filled.
    fn write_tree(&self, root: &Path, project_dir: &Path) -> Result<()> {
        let mut targets: HashMap<PathBuf, PathBuf> = HashMap::new();
        targets.insert(root.to_path_buf(), project_dir.to_path_buf());
        let mut directories = Vec::new();

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry?;
            let source_path = entry.path();
            let Some(parent) = source_path.parent().and_then(|p| targets.get(p)) else {
                continue;
            };
            let template_relative =
                NormalizedPath::relative(source_path, root).unwrap_or_else(|| NormalizedPath::new(""));
            let is_dir = entry.file_type().is_dir();

            let raw_name = entry.file_name().to_string_lossy();
            let name = self.renderer.render(&raw_name)?;
            if name.trim().is_empty() {
                tracing::debug!(path = %template_relative, "Name renders empty, skipping");
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
            let target_path = parent.join(&name);
            let permissions = entry.metadata()?.permissions();

            if is_dir {
                fs::create_dir_all(&target_path).map_err(|e| Error::io(&target_path, e))?;
                targets.insert(source_path.to_path_buf(), target_path.clone());
                directories.push((target_path, permissions));
            } else {
                self.write_file(source_path, &target_path, &template_relative)?;
                fs::set_permissions(&target_path, permissions)
                    .map_err(|e| Error::io(&target_path, e))?;
            }
        }

        for (path, permissions) in directories.into_iter().rev() {
            fs::set_permissions(&path, permissions).map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }

    fn write_file(&self, source: &Path, target: &Path, relative: &NormalizedPath) -> Result<()> {
        let bytes = fs::read(source).map_err(|e| Error::io(source, e))?;
        let rendered = if self.copy_only.is_match(relative) {
            None
        } else {
            match std::str::from_utf8(&bytes) {
                Ok(text) if !text.contains('\0') && Renderer::has_markup(text) => {
                    Some(self.renderer.render(text)?)
                }
                _ => None,
            }
        };
        let content = rendered.as_deref().map(str::as_bytes).unwrap_or(&bytes);
        fs::write(target, content).map_err(|e| Error::io(target, e))
    }
}
