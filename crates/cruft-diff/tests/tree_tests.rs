use std::fs;
use std::path::Path;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use cruft_diff::{Classifier, classify, copy_projection};
use cruft_fs::NormalizedPath;
use cruft_test_utils::git::commit_project;
use pretty_assertions::assert_eq;
use predicates::prelude::*;

fn names(paths: &[NormalizedPath]) -> Vec<&str> {
    paths.iter().map(NormalizedPath::as_str).collect()
}

fn write(root: &Path, files: &[(&str, &str)]) {
    for (file, content) in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[test]
fn project_ignore_rules_exclude_matching_paths() {
    let project = tempfile::tempdir().unwrap();
    write(
        project.path(),
        &[
            (".gitignore", "*.log\nbuild/\n"),
            ("src/main.rs", "fn main() {}\n"),
            ("debug.log", "noise"),
            ("build/out.txt", "artifact"),
        ],
    );
    commit_project(project.path());

    let result = classify(project.path(), &[], Some(project.path())).unwrap();

    assert_eq!(names(&result.keep), vec![".gitignore", "src", "src/main.rs"]);
    assert_eq!(
        names(&result.ignore),
        vec![".git", "build", "build/out.txt", "debug.log"]
    );
}

#[test]
fn render_tree_is_judged_by_project_rules() {
    let project = tempfile::tempdir().unwrap();
    write(project.path(), &[(".gitignore", "*.log\n")]);
    commit_project(project.path());

    let render = tempfile::tempdir().unwrap();
    write(render.path(), &[("README.md", "# demo\n"), ("trace.log", "x")]);

    let classifier = Classifier::new(&[], Some(project.path())).unwrap();
    let result = classifier.classify(render.path(), render.path()).unwrap();

    assert_eq!(names(&result.keep), vec!["README.md"]);
    assert_eq!(names(&result.ignore), vec!["trace.log"]);
}

#[test]
fn classifying_a_subtree_keeps_root_relative_paths() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), &[("docs/guide.md", "g"), ("docs/api/index.md", "i"), ("top.txt", "t")]);

    let classifier = Classifier::new(&[NormalizedPath::new("docs/api")], None).unwrap();
    let result = classifier
        .classify(root.path(), &root.path().join("docs"))
        .unwrap();

    assert_eq!(names(&result.keep), vec!["docs/api", "docs/api/index.md"]);
    assert_eq!(names(&result.ignore), vec!["docs/guide.md"]);
}

#[test]
fn subtree_is_judged_by_root_ignore_rules() {
    let project = tempfile::tempdir().unwrap();
    write(
        project.path(),
        &[
            (".gitignore", "*.log\ndocs/drafts/\n"),
            ("docs/guide.md", "g"),
            ("docs/build.log", "noise"),
            ("docs/drafts/wip.md", "w"),
            ("top.log", "t"),
        ],
    );
    commit_project(project.path());

    let classifier = Classifier::new(&[], Some(project.path())).unwrap();
    let result = classifier
        .classify(project.path(), &project.path().join("docs"))
        .unwrap();

    assert_eq!(names(&result.keep), vec!["docs/guide.md"]);
    assert_eq!(
        names(&result.ignore),
        vec!["docs/build.log", "docs/drafts", "docs/drafts/wip.md"]
    );
}

#[test]
fn copy_projection_copies_listed_paths_only() {
    let from = TempDir::new().unwrap();
    from.child("keep/me.txt").write_str("me").unwrap();
    from.child("skip.txt").write_str("skip").unwrap();
    from.child("empty").create_dir_all().unwrap();
    let to = TempDir::new().unwrap();

    let paths = vec![
        NormalizedPath::new("empty"),
        NormalizedPath::new("keep/me.txt"),
        NormalizedPath::new("missing.txt"),
    ];
    let copied = copy_projection(from.path(), to.path(), &paths).unwrap();

    assert_eq!(copied, 1);
    to.child("keep/me.txt").assert("me");
    to.child("empty").assert(predicate::path::is_dir());
    to.child("skip.txt").assert(predicate::path::missing());
    to.child("missing.txt").assert(predicate::path::missing());
}
