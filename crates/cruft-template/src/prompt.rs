//! Interactive parameter prompting

use crate::Result;

/// Asks the user for parameter values.
///
/// The materializer calls this only for public parameters and only when
/// prompting is enabled. Implementations return the default when the user
/// just confirms.
pub trait Prompter {
    /// Free-text value with a rendered default.
    fn read_text(&self, key: &str, default: &str) -> Result<String>;

    /// Yes/no value.
    fn read_bool(&self, key: &str, default: bool) -> Result<bool>;

    /// Index into `options`; the first option is the default.
    fn read_choice(&self, key: &str, options: &[String]) -> Result<usize>;
}

/// A [`Prompter`] that accepts every default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn read_text(&self, _key: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn read_bool(&self, _key: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn read_choice(&self, _key: &str, _options: &[String]) -> Result<usize> {
        Ok(0)
    }
}
