//! Diff computation and application through the `git` executable

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use cruft_fs::NormalizedPath;
use cruft_git::{prefix_in_worktree, working_tree_status};

use crate::{Error, Result};

/// Prefixes written in place of the compared directories.
///
/// Each label must be a single path segment so that the diff applies with
/// git's default `-p1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLabels<'a> {
    pub source: &'a str,
    pub destination: &'a str,
}

impl Default for DiffLabels<'_> {
    fn default() -> Self {
        Self {
            source: "a",
            destination: "b",
        }
    }
}

/// Structural diff from `dir_a` to `dir_b`.
///
/// The directories are compared as unrelated roots. Every header path is
/// rewritten to `<label>/<relative path>`, so the text never mentions the
/// directories themselves and can be applied elsewhere. Binary changes are
/// emitted as `GIT binary patch` blocks.
pub fn compute_diff(dir_a: &Path, dir_b: &Path, labels: DiffLabels<'_>) -> Result<String> {
    let root_a = display_root(dir_a)?;
    let root_b = display_root(dir_b)?;

    let args = [
        "-c",
        "core.quotepath=false",
        "-c",
        "diff.noprefix=false",
        "diff",
        "--no-index",
        "--no-renames",
        "--binary",
        "--no-ext-diff",
        "--no-color",
        "--src-prefix=a/",
        "--dst-prefix=b/",
        "--",
        root_a.as_str(),
        root_b.as_str(),
    ];
    let output = Command::new("git")
        .args(args)
        .current_dir(dir_a)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            command: "diff".into(),
            source,
        })?;

    // 0: identical, 1: differences found
    match output.status.code() {
        Some(0) | Some(1) => {}
        _ => return Err(tool_error("diff", &output)),
    }

    let raw = String::from_utf8(output.stdout).map_err(|e| Error::Encoding {
        message: e.to_string(),
    })?;
    Ok(relabel(&raw, &root_a, &root_b, labels))
}

/// Path as git prints it after the `a/` prefix, without a leading slash or
/// drive letter.
fn display_root(dir: &Path) -> Result<String> {
    let canonical = dunce::canonicalize(dir).map_err(|e| Error::io(dir, e))?;
    let text = canonical.to_string_lossy().replace('\\', "/");
    let without_drive = match text.as_bytes() {
        [drive, b':', ..] if drive.is_ascii_alphabetic() => text[2..].to_string(),
        _ => text,
    };
    Ok(without_drive)
}

/// Replace both roots in header lines.
///
/// Git prints a deleted file as `a<root_a>/f b<root_a>/f` and an added one
/// as `a<root_b>/f b<root_b>/f`, so each prefix is matched with each root.
fn relabel(diff: &str, root_a: &str, root_b: &str, labels: DiffLabels<'_>) -> String {
    let with_slash = |root: &str| {
        let trimmed = root.trim_start_matches('/');
        format!("/{}/", trimmed)
    };
    let (root_a, root_b) = (with_slash(root_a), with_slash(root_b));
    let mut replacements = [
        (format!("a{}", root_a), format!("{}/", labels.source)),
        (format!("a{}", root_b), format!("{}/", labels.source)),
        (format!("b{}", root_a), format!("{}/", labels.destination)),
        (format!("b{}", root_b), format!("{}/", labels.destination)),
    ];
    // Longest first, in case one root is nested in the other
    replacements.sort_by(|x, y| y.0.len().cmp(&x.0.len()));

    let mut out = String::with_capacity(diff.len());
    for line in diff.split_inclusive('\n') {
        if line.starts_with("diff --git ") || line.starts_with("--- ") || line.starts_with("+++ ") {
            let mut rewritten = line.to_string();
            for (from, to) in &replacements {
                rewritten = rewritten.replace(from.as_str(), to);
            }
            out.push_str(&rewritten);
        } else {
            out.push_str(line);
        }
    }
    out
}

fn tool_error(command: &str, output: &Output) -> Error {
    Error::Tool {
        command: command.to_string(),
        status: output
            .status
            .code()
            .map(|code| format!("exit code {}", code))
            .unwrap_or_else(|| "terminated by signal".to_string()),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// How a diff was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStrategy {
    /// Nothing to apply
    Noop,
    /// `git apply -3`
    ThreeWay,
    /// `git apply --reject`
    Reject,
}

/// Result of applying a diff to a live project.
///
/// Partial application is not an error: conflicted and rejected files are
/// listed here and left on disk for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub strategy: ApplyStrategy,
    /// The last git invocation exited successfully
    pub succeeded: bool,
    /// Files merged with conflict markers
    pub conflicted: Vec<String>,
    /// Files with `.rej` artifacts
    pub rejected: Vec<String>,
    /// `error:` lines reported by git
    pub errors: Vec<String>,
    /// Full stderr of the last git invocation
    pub stderr: String,
}

impl ApplyOutcome {
    pub fn noop() -> Self {
        Self {
            strategy: ApplyStrategy::Noop,
            succeeded: true,
            conflicted: Vec::new(),
            rejected: Vec::new(),
            errors: Vec::new(),
            stderr: String::new(),
        }
    }

    /// Everything applied without conflicts or rejects.
    pub fn is_clean(&self) -> bool {
        self.succeeded && self.conflicted.is_empty() && self.rejected.is_empty()
    }

    fn from_output(strategy: ApplyStrategy, output: &Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let mut outcome = Self {
            strategy,
            succeeded: output.status.success(),
            conflicted: Vec::new(),
            rejected: Vec::new(),
            errors: Vec::new(),
            stderr: stderr.clone(),
        };
        for line in stderr.lines() {
            if let Some(rest) = line.strip_prefix("Applied patch to '")
                && let Some((path, _)) = rest.split_once("' with conflicts")
            {
                outcome.conflicted.push(path.to_string());
            } else if let Some(rest) = line.strip_prefix("Applying patch ")
                && let Some((path, _)) = rest.rsplit_once(" with ")
                && rest.contains(" reject")
            {
                outcome.rejected.push(path.to_string());
            } else if line.starts_with("error: ") {
                outcome.errors.push(line.to_string());
            }
        }
        outcome.conflicted.sort();
        outcome.conflicted.dedup();
        outcome.rejected.sort();
        outcome.rejected.dedup();
        outcome
    }
}

/// Apply `diff` to `target`.
///
/// Inside a git work tree a three-way merge is tried first. If it fails and
/// the work tree is still clean (untracked files tolerated when
/// `allow_untracked` is set), the diff is applied once more with
/// `--reject`. Outside a work tree `--reject` is used directly. A blank diff
/// never spawns git.
pub fn apply_diff(diff: &str, target: &Path, allow_untracked: bool) -> Result<ApplyOutcome> {
    if diff.trim().is_empty() {
        return Ok(ApplyOutcome::noop());
    }

    let Some(prefix) = prefix_in_worktree(target)? else {
        tracing::debug!(target = %target.display(), "Not a git work tree, applying with --reject");
        let output = run_apply(target, &["--reject"], None, diff)?;
        return Ok(ApplyOutcome::from_output(ApplyStrategy::Reject, &output));
    };

    let three_way = run_apply(target, &["-3"], Some(&prefix), diff)?;
    let outcome = ApplyOutcome::from_output(ApplyStrategy::ThreeWay, &three_way);
    if outcome.succeeded {
        return Ok(outcome);
    }

    if working_tree_status(target, allow_untracked)?.is_dirty() {
        tracing::warn!("Three-way merge left changes behind, not retrying with --reject");
        return Ok(outcome);
    }

    tracing::warn!(stderr = %outcome.stderr.trim(), "Three-way merge failed, retrying with --reject");
    let reject = run_apply(target, &["--reject"], Some(&prefix), diff)?;
    Ok(ApplyOutcome::from_output(ApplyStrategy::Reject, &reject))
}

fn run_apply(
    target: &Path,
    mode: &[&str],
    prefix: Option<&NormalizedPath>,
    diff: &str,
) -> Result<Output> {
    let mut command = Command::new("git");
    command.arg("apply").args(mode);
    if let Some(prefix) = prefix.filter(|p| !p.is_root()) {
        command.arg(format!("--directory={}", prefix));
    }
    let spawn_error = |source| Error::Spawn {
        command: format!("apply {}", mode.join(" ")),
        source,
    };

    let mut child = command
        .current_dir(target)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(diff.as_bytes()).map_err(spawn_error)?;
    }
    let output = child.wait_with_output().map_err(spawn_error)?;
    tracing::debug!(mode = ?mode, status = ?output.status.code(), "git apply finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relabel_rewrites_all_header_forms() {
        let raw = "\
diff --git a/tmp/s/old/README.md b/tmp/s/new/README.md
index 1..2 100644
--- a/tmp/s/old/README.md
+++ b/tmp/s/new/README.md
@@ -1 +1 @@
-old
+new
diff --git a/tmp/s/old/gone.txt b/tmp/s/old/gone.txt
deleted file mode 100644
--- a/tmp/s/old/gone.txt
+++ /dev/null
diff --git a/tmp/s/new/added.txt b/tmp/s/new/added.txt
new file mode 100644
--- /dev/null
+++ b/tmp/s/new/added.txt
";
        let out = relabel(raw, "/tmp/s/old", "/tmp/s/new", DiffLabels::default());
        assert!(!out.contains("/tmp/s"), "{}", out);
        assert!(out.contains("diff --git a/README.md b/README.md\n"));
        assert!(out.contains("diff --git a/gone.txt b/gone.txt\n"));
        assert!(out.contains("diff --git a/added.txt b/added.txt\n"));
        assert!(out.contains("+++ b/added.txt\n"));
    }

    #[test]
    fn relabel_uses_custom_labels() {
        let raw = "diff --git a/r/x/f b/r/y/f\n--- a/r/x/f\n+++ b/r/y/f\n";
        let labels = DiffLabels {
            source: "template",
            destination: "project",
        };
        assert_eq!(
            relabel(raw, "/r/x", "/r/y", labels),
            "diff --git template/f project/f\n--- template/f\n+++ project/f\n"
        );
    }

    #[test]
    fn parses_conflicts_and_rejects() {
        let stderr = "\
error: patch failed: greeting.txt:1
Falling back to three-way merge...
Applied patch to 'greeting.txt' with conflicts.
U greeting.txt
Applying patch docs/guide.md with 1 reject...
Rejected hunk #1.
";
        let output = Output {
            status: failed_status(),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        };
        let outcome = ApplyOutcome::from_output(ApplyStrategy::ThreeWay, &output);
        assert_eq!(outcome.conflicted, vec!["greeting.txt"]);
        assert_eq!(outcome.rejected, vec!["docs/guide.md"]);
        assert_eq!(outcome.errors, vec!["error: patch failed: greeting.txt:1"]);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn repeated_reports_are_listed_once() {
        let stderr = "\
Applied patch to 'b.txt' with conflicts.
Applied patch to 'a.txt' with conflicts.
Applied patch to 'b.txt' with conflicts.
Applying patch z.md with 1 reject...
Applying patch y.md with 2 rejects...
Applying patch z.md with 1 reject...
";
        let output = Output {
            status: failed_status(),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        };
        let outcome = ApplyOutcome::from_output(ApplyStrategy::ThreeWay, &output);
        assert_eq!(outcome.conflicted, vec!["a.txt", "b.txt"]);
        assert_eq!(outcome.rejected, vec!["y.md", "z.md"]);
    }

    #[cfg(unix)]
    fn failed_status() -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(1 << 8)
    }

    #[cfg(windows)]
    fn failed_status() -> std::process::ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(1)
    }
}
