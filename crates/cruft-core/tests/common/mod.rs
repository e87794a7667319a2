//! Helpers shared by the reconciliation tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use cruft_core::{CreateOptions, Decider, Decision, Reconciler, Result as CoreResult};
use cruft_template::{Prompter, Result as TemplateResult};
use cruft_test_utils::TemplateRepo;
use walkdir::WalkDir;

/// Create a project from `template` under `output`, ignoring user config.
pub fn create(template: &TemplateRepo, output: &Path) -> PathBuf {
    create_with(template, output, CreateOptions::default())
}

pub fn create_with(template: &TemplateRepo, output: &Path, options: CreateOptions) -> PathBuf {
    let options = CreateOptions {
        output_dir: output.to_path_buf(),
        default_config: true,
        ..options
    };
    Reconciler::new()
        .create(&template.locator(), &options)
        .unwrap()
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// Mirror every file below `src` into `dst`.
pub fn copy_tree(src: &Path, dst: &Path) {
    for entry in WalkDir::new(src) {
        let entry = entry.unwrap();
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Accepts every default except for the keys it was given answers for.
pub struct ScriptedPrompter {
    pub answers: Vec<(&'static str, String)>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<(&'static str, String)>) -> Self {
        Self {
            answers,
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_text(&self, key: &str, default: &str) -> TemplateResult<String> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(self
            .answers
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| default.to_string()))
    }

    fn read_bool(&self, key: &str, default: bool) -> TemplateResult<bool> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(default)
    }

    fn read_choice(&self, key: &str, _options: &[String]) -> TemplateResult<usize> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(0)
    }
}

/// Gives a fixed answer.
pub struct Answer(pub Decision);

impl Decider for Answer {
    fn decide(&self) -> CoreResult<Decision> {
        Ok(self.0)
    }

    fn view(&self, _diff: &str) -> CoreResult<()> {
        Ok(())
    }
}
