//! cruft CLI
//!
//! Creates projects from cookiecutter templates and keeps them up to date.

mod cli;
mod commands;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, ExtraContextArgs};
use cruft_core::{CheckOptions, CreateOptions, DiffOptions, LinkOptions, UpdateOptions};
use error::{CliError, Result};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    execute_command(cli.command)
}

fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn extra_context(args: &ExtraContextArgs) -> Result<cruft_template::Context> {
    Ok(cruft_core::parse_extra_context(
        args.extra_context.as_deref(),
        args.extra_context_file.as_deref(),
    )?)
}

fn execute_command(cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::Create {
            template,
            output_dir,
            config,
            extra,
            no_input,
            directory,
            checkout,
            overwrite_if_exists,
            skip,
        } => commands::run_create(
            &template,
            CreateOptions {
                output_dir,
                checkout,
                directory,
                extra_context: extra_context(&extra)?,
                config_file: config.config_file,
                default_config: config.default_config,
                no_input,
                overwrite_if_exists,
                skip,
            },
        ),
        Commands::Link {
            template,
            project_dir,
            checkout,
            no_input,
            config,
            extra,
            directory,
        } => commands::run_link(
            &template,
            LinkOptions {
                project_dir,
                checkout,
                directory,
                extra_context: extra_context(&extra)?,
                config_file: config.config_file,
                default_config: config.default_config,
                no_input,
            },
        ),
        Commands::Check {
            project_dir,
            checkout,
            strictness,
        } => commands::run_check(CheckOptions {
            project_dir,
            checkout,
            strict: strictness.is_strict(),
        }),
        Commands::Update {
            project_dir,
            cookiecutter_input,
            refresh_private_variables,
            skip_apply_ask,
            skip_update,
            checkout,
            strictness,
            allow_untracked_files,
            extra,
        } => commands::run_update(UpdateOptions {
            project_dir,
            cookiecutter_input,
            refresh_private: refresh_private_variables,
            skip_apply_ask,
            skip_update,
            checkout,
            strict: strictness.is_strict(),
            allow_untracked_files,
            extra_context: extra_context(&extra)?,
        }),
        Commands::Diff {
            project_dir,
            exit_code,
            checkout,
            include_path,
            reverse,
        } => commands::run_diff(
            DiffOptions {
                project_dir,
                checkout,
                include_paths: include_path,
                reverse,
            },
            exit_code,
        ),
        Commands::Completions { shell } => commands::run_completions(shell),
    }
}
