//! Whole-lifecycle scenarios: create, evolve the template, check, update.

use std::fs;
use std::path::{Path, PathBuf};

use cruft_core::{
    CheckOptions, CreateOptions, DiffOptions, LinkOptions, Reconciler, StateRecord, UpdateOptions,
    UpdateOutcome,
};
use cruft_test_utils::TemplateRepo;
use cruft_test_utils::git::{commit_all, commit_project};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn create(template: &TemplateRepo, output: &Path, checkout: Option<&str>) -> PathBuf {
    Reconciler::new()
        .create(
            &template.locator(),
            &CreateOptions {
                output_dir: output.to_path_buf(),
                checkout: checkout.map(str::to_string),
                default_config: true,
                ..Default::default()
            },
        )
        .unwrap()
}

fn check(project: &Path, strict: bool) -> bool {
    Reconciler::new()
        .check(&CheckOptions {
            project_dir: project.to_path_buf(),
            checkout: None,
            strict,
        })
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

fn update(project: &Path) -> UpdateOutcome {
    Reconciler::new()
        .update(&UpdateOptions {
            project_dir: project.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn template_evolution_round_trip() {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let project = create(&template, output.path(), None);
    commit_project(&project);
    assert!(check(&project, true));
    assert_eq!(diff(&project), "");

    template.write_file("greeting.txt", "{{ cookiecutter.greeting }}, world\n");
    template.write_file("CHANGELOG.md", "# {{ cookiecutter.project_slug }} changes\n");
    template.remove_file("docs/guide.md");
    let tip = template.commit("Evolve template");
    assert!(!check(&project, true));

    let outcome = update(&project);
    assert!(matches!(&outcome, UpdateOutcome::Applied(applied) if applied.is_clean()), "{:?}", outcome);

    assert_eq!(read(&project.join("greeting.txt")), "hello, world\n");
    assert_eq!(read(&project.join("CHANGELOG.md")), "# demo changes\n");
    assert!(!project.join("docs/guide.md").exists());
    assert_eq!(StateRecord::load(&project).unwrap().commit, tip);

    assert!(check(&project, true));
    assert_eq!(diff(&project), "");
    commit_all(&project, "Take template update");
    assert_eq!(update(&project), UpdateOutcome::AlreadyUpToDate);
}

#[test]
fn local_customizations_survive_updates() {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let project = create(&template, output.path(), None);
    fs::write(project.join("README.md"), "# demo\n\nLocal notes\n").unwrap();
    commit_project(&project);

    template.write_file("greeting.txt", "hi\n");
    template.commit("Change greeting");
    update(&project);

    assert_eq!(read(&project.join("README.md")), "# demo\n\nLocal notes\n");
    assert_eq!(read(&project.join("greeting.txt")), "hi\n");
    // The local edit is the only remaining difference
    let remaining = diff(&project);
    assert!(remaining.contains("+Local notes"), "{remaining}");
    assert!(!remaining.contains("greeting.txt"), "{remaining}");
}

#[test]
fn conflicting_edits_leave_markers_and_advance_record() {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let project = create(&template, output.path(), None);
    fs::write(project.join("greeting.txt"), "local\n").unwrap();
    commit_project(&project);

    template.write_file("greeting.txt", "upstream\n");
    let tip = template.commit("Change greeting");

    match update(&project) {
        UpdateOutcome::Applied(applied) => {
            assert!(!applied.is_clean());
            assert_eq!(applied.conflicted, vec!["greeting.txt"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    let greeting = read(&project.join("greeting.txt"));
    assert!(greeting.contains("<<<<<<<"), "{greeting}");
    assert!(greeting.contains("local"), "{greeting}");
    assert!(greeting.contains("upstream"), "{greeting}");
    assert_eq!(StateRecord::load(&project).unwrap().commit, tip);
}

#[test]
fn pinned_tag_ignores_newer_commits() {
    let template = TemplateRepo::new();
    template.tag("v1");
    let output = tempfile::tempdir().unwrap();
    let project = create(&template, output.path(), Some("v1"));
    commit_project(&project);

    template.write_file("greeting.txt", "hi\n");
    template.commit("Change greeting");

    assert!(check(&project, true));
    assert_eq!(update(&project), UpdateOutcome::AlreadyUpToDate);
    assert_eq!(read(&project.join("greeting.txt")), "hello\n");

    let record = StateRecord::load(&project).unwrap();
    assert_eq!(record.checkout.as_deref(), Some("v1"));
}

#[rstest]
#[case(true, false)]
#[case(false, true)]
fn ancestor_revision_freshness_depends_on_strictness(#[case] strict: bool, #[case] fresh: bool) {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let project = create(&template, output.path(), None);

    template.write_file("greeting.txt", "hi\n");
    template.commit("Change greeting");

    assert_eq!(check(&project, strict), fresh);
}

#[test]
fn linked_project_behaves_like_created_one() {
    let template = TemplateRepo::new();
    let output = tempfile::tempdir().unwrap();
    let created = create(&template, output.path(), None);

    let copy = tempfile::tempdir().unwrap();
    for name in ["greeting.txt", "README.md"] {
        fs::copy(created.join(name), copy.path().join(name)).unwrap();
    }
    fs::create_dir_all(copy.path().join("docs")).unwrap();
    fs::copy(created.join("docs/guide.md"), copy.path().join("docs/guide.md")).unwrap();

    let linked = Reconciler::new()
        .link(
            &template.locator(),
            &LinkOptions {
                project_dir: copy.path().to_path_buf(),
                default_config: true,
                ..Default::default()
            },
        )
        .unwrap();

    let record = StateRecord::load(&created).unwrap();
    assert_eq!(linked.commit, record.commit);
    assert_eq!(linked.context, record.context);
    assert_eq!(
        read(&StateRecord::path(copy.path())),
        read(&StateRecord::path(&created))
    );
    assert!(check(copy.path(), true));
    assert_eq!(diff(copy.path()), "");
}
