//! Terminal rendering of diffs

use colored::Colorize;

/// Color a unified diff for display on a terminal.
pub fn colorize(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len() + diff.len() / 4);
    for line in diff.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        let styled = if body.starts_with("diff --git")
            || body.starts_with("index ")
            || body.starts_with("--- ")
            || body.starts_with("+++ ")
            || body.starts_with("new file mode")
            || body.starts_with("deleted file mode")
        {
            body.bold().to_string()
        } else if body.starts_with("@@") {
            body.cyan().to_string()
        } else if body.starts_with('+') {
            body.green().to_string()
        } else if body.starts_with('-') {
            body.red().to_string()
        } else {
            body.to_string()
        };
        out.push_str(&styled);
        out.push_str(newline);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_keeps_text_when_colors_are_off() {
        colored::control::set_override(false);
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new\n";
        assert_eq!(colorize(diff), diff);
        colored::control::unset_override();
    }
}
