//! A diff computed against one project applies cleanly to another.

use std::fs;
use std::path::Path;

use cruft_core::{CreateOptions, DiffOptions, Reconciler};
use cruft_diff::apply_diff;
use cruft_test_utils::TemplateRepo;
use cruft_test_utils::git::commit_project;
use pretty_assertions::assert_eq;

fn create_in(template: &TemplateRepo, output: &Path) -> std::path::PathBuf {
    Reconciler::new()
        .create(
            &template.locator(),
            &CreateOptions {
                output_dir: output.to_path_buf(),
                default_config: true,
                ..Default::default()
            },
        )
        .unwrap()
}

fn diff(project: &Path) -> String {
    Reconciler::new()
        .diff(&DiffOptions {
            project_dir: project.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
        .diff
}

#[test]
fn project_diff_replays_onto_a_fresh_project() {
    let template = TemplateRepo::new();
    let first_out = tempfile::tempdir().unwrap();
    let first = create_in(&template, first_out.path());
    fs::write(first.join("README.md"), "# demo\n\nCustomized\n").unwrap();
    fs::write(first.join("docs/guide.md"), "Guide for demo\n\nMore detail\n").unwrap();
    let customizations = diff(&first);
    assert!(!customizations.is_empty());

    let second_out = tempfile::tempdir().unwrap();
    let second = create_in(&template, second_out.path());
    commit_project(&second);
    let applied = apply_diff(&customizations, &second, false).unwrap();
    assert!(applied.is_clean(), "{:?}", applied);

    assert_eq!(diff(&second), customizations);
    assert_eq!(
        fs::read_to_string(second.join("docs/guide.md")).unwrap(),
        "Guide for demo\n\nMore detail\n"
    );
}

#[test]
fn empty_diff_is_a_noop() {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let project = create_in(&template, output.path());
    let before = fs::read_to_string(project.join("README.md")).unwrap();

    let applied = apply_diff(&diff(&project), &project, false).unwrap();
    assert_eq!(applied, cruft_diff::ApplyOutcome::noop());
    assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), before);
}
