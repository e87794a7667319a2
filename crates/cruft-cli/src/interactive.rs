//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based parameter prompts and the update
//! confirmation.

use colored::Colorize;
use dialoguer::{Confirm, Input, Select};

use cruft_core::{Decider, Decision};
use cruft_template::Prompter;

/// Asks for template parameters on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

fn prompt_error(e: dialoguer::Error) -> cruft_template::Error {
    cruft_template::Error::Prompt {
        message: e.to_string(),
    }
}

impl Prompter for TerminalPrompter {
    fn read_text(&self, key: &str, default: &str) -> cruft_template::Result<String> {
        Input::<String>::new()
            .with_prompt(key)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }

    fn read_bool(&self, key: &str, default: bool) -> cruft_template::Result<bool> {
        Confirm::new()
            .with_prompt(key)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn read_choice(&self, key: &str, options: &[String]) -> cruft_template::Result<usize> {
        Select::new()
            .with_prompt(key)
            .items(options)
            .default(0)
            .interact()
            .map_err(prompt_error)
    }
}

const DECISION_HELP: &str = "Respond with \"s\" to intentionally skip the update while marking \
your project as up-to-date or respond with \"v\" to view the changes that will be applied.";

/// Parse an answer to "Apply diff and update?".
pub fn parse_decision(answer: &str) -> Option<Decision> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Decision::Apply),
        "n" | "no" => Some(Decision::Cancel),
        "s" | "skip" => Some(Decision::Skip),
        "v" | "view" => Some(Decision::View),
        _ => None,
    }
}

/// Asks whether to apply a computed update.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalDecider;

impl Decider for TerminalDecider {
    fn decide(&self) -> cruft_core::Result<Decision> {
        println!("{}", DECISION_HELP);
        let answer: String = Input::new()
            .with_prompt("Apply diff and update? [y/n/s/v]")
            .default("y".to_string())
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                parse_decision(input)
                    .map(|_| ())
                    .ok_or("Please answer one of y, n, s or v")
            })
            .interact_text()
            .map_err(|e| cruft_core::Error::Decision {
                message: e.to_string(),
            })?;
        parse_decision(&answer).ok_or_else(|| cruft_core::Error::Decision {
            message: format!("unexpected answer '{}'", answer),
        })
    }

    fn view(&self, diff: &str) -> cruft_core::Result<()> {
        print!("{}", cruft_diff::colorize(diff));
        if !diff.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    fn nothing_to_view(&self) -> cruft_core::Result<()> {
        println!("{}", "There are no changes.".yellow());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_are_case_insensitive() {
        assert_eq!(parse_decision("Y"), Some(Decision::Apply));
        assert_eq!(parse_decision(" n "), Some(Decision::Cancel));
        assert_eq!(parse_decision("s"), Some(Decision::Skip));
        assert_eq!(parse_decision("V"), Some(Decision::View));
        assert_eq!(parse_decision("maybe"), None);
    }
}
