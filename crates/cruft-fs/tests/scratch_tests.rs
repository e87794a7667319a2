use assert_fs::TempDir;
use assert_fs::prelude::*;
use cruft_fs::scratch::remove_with_retry;
use cruft_fs::{RobustnessConfig, ScratchDir};
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn scratch_dir_lives_under_parent() {
    let parent = TempDir::new().unwrap();
    let scratch = ScratchDir::new_in(parent.path()).unwrap();

    let name = scratch.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("cruft-"));
    parent.child(&name).assert(predicate::path::is_dir());
}

#[test]
fn subdirectories_are_created_on_demand() {
    let parent = TempDir::new().unwrap();
    let scratch = ScratchDir::new_in(parent.path()).unwrap();

    let render = scratch.subdir("render/old").unwrap();

    assert!(render.is_dir());
    assert!(render.starts_with(scratch.path()));
}

#[test]
fn dropping_removes_nested_content() {
    let parent = TempDir::new().unwrap();
    let scratch = ScratchDir::new_in(parent.path()).unwrap();
    let name = scratch.path().file_name().unwrap().to_string_lossy().into_owned();
    std::fs::create_dir_all(scratch.path().join("a/b")).unwrap();
    std::fs::write(scratch.path().join("a/b/c.txt"), "x").unwrap();

    drop(scratch);

    parent.child(&name).assert(predicate::path::missing());
}

#[test]
fn remove_with_retry_tolerates_missing_paths() {
    let parent = TempDir::new().unwrap();
    let policy = RobustnessConfig {
        attempts: 2,
        delay: Duration::from_millis(1),
    };

    remove_with_retry(&parent.path().join("never-created"), policy).unwrap();
}

#[test]
fn two_scratch_dirs_never_collide() {
    let parent = TempDir::new().unwrap();
    let first = ScratchDir::new_in(parent.path()).unwrap();
    let second = ScratchDir::new_in(parent.path()).unwrap();
    assert_ne!(first.path(), second.path());
}
