//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// cruft - Keep projects generated from cookiecutter templates up to date
#[derive(Parser, Debug)]
#[command(name = "cruft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// `--extra-context` and `--extra-context-file`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraContextArgs {
    /// JSON object of parameter values that override the template defaults
    #[arg(long, value_name = "JSON")]
    pub extra_context: Option<String>,

    /// File holding a JSON object of parameter values
    #[arg(long, value_name = "PATH")]
    pub extra_context_file: Option<PathBuf>,
}

/// `--config-file` and `--default-config`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfigArgs {
    /// Cookiecutter user config file
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Ignore every user config file
    #[arg(short = 'd', long)]
    pub default_config: bool,
}

/// `--strict` / `--not-strict`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StrictnessArgs {
    /// Only an exact or content-equal revision counts as up to date (default)
    #[arg(long, overrides_with = "not_strict")]
    pub strict: bool,

    /// Also accept a recorded revision that is an ancestor of the latest one
    #[arg(long, overrides_with = "strict")]
    pub not_strict: bool,
}

impl StrictnessArgs {
    pub fn is_strict(&self) -> bool {
        !self.not_strict
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Expand a git-hosted template into a new project
    ///
    /// Examples:
    ///   cruft create https://github.com/org/template
    ///   cruft create ../template --no-input --extra-context '{"project_slug": "api"}'
    Create {
        /// Template URL or local path
        template: String,

        /// Directory the project is created in
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        config: UserConfigArgs,

        #[command(flatten)]
        extra: ExtraContextArgs,

        /// Accept every default without prompting
        #[arg(short = 'y', long)]
        no_input: bool,

        /// Template directory inside the repository
        #[arg(long)]
        directory: Option<String>,

        /// Branch, tag or commit to render
        #[arg(short, long)]
        checkout: Option<String>,

        /// Render into an existing project directory
        #[arg(short = 'f', long)]
        overwrite_if_exists: bool,

        /// Paths the project never takes updates for
        #[arg(long, value_name = "PATTERN")]
        skip: Vec<String>,
    },

    /// Link an existing project to the template it was generated from
    Link {
        /// Template URL or local path
        template: String,

        /// Project to link
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Branch, tag or commit to link against
        #[arg(short, long)]
        checkout: Option<String>,

        /// Accept every default without prompting
        #[arg(short = 'y', long)]
        no_input: bool,

        #[command(flatten)]
        config: UserConfigArgs,

        #[command(flatten)]
        extra: ExtraContextArgs,

        /// Template directory inside the repository
        #[arg(long)]
        directory: Option<String>,
    },

    /// Check whether the project is up to date with its template
    ///
    /// Exits with status 1 when the template has moved on.
    Check {
        /// Project to check
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Branch, tag or commit to compare against
        #[arg(short, long)]
        checkout: Option<String>,

        #[command(flatten)]
        strictness: StrictnessArgs,
    },

    /// Merge the latest template changes into the project
    Update {
        /// Project to update
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Prompt for parameter values again
        #[arg(short = 'i', long)]
        cookiecutter_input: bool,

        /// Take private variables from the template instead of .cruft.json
        #[arg(short = 'r', long)]
        refresh_private_variables: bool,

        /// Apply the update without asking
        #[arg(short = 'y', long)]
        skip_apply_ask: bool,

        /// Mark the project as up to date without changing any file
        #[arg(short = 's', long)]
        skip_update: bool,

        /// Branch, tag or commit to update to
        #[arg(short, long)]
        checkout: Option<String>,

        #[command(flatten)]
        strictness: StrictnessArgs,

        /// Tolerate untracked files in the project
        #[arg(long)]
        allow_untracked_files: bool,

        #[command(flatten)]
        extra: ExtraContextArgs,
    },

    /// Show the difference between the project and its template
    Diff {
        /// Project to diff
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with status 1 when there is a difference
        #[arg(short, long)]
        exit_code: bool,

        /// Branch, tag or commit to compare against
        #[arg(short, long)]
        checkout: Option<String>,

        /// Only compare these paths
        #[arg(long, value_name = "PATH")]
        include_path: Vec<String>,

        /// Diff project to template instead of template to project
        #[arg(long)]
        reverse: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
