//! Line diffs for `--diff`.
//!
//! Lines are compared position by position: line `i` of the original
//! against line `i` of the converted text.

use core::fmt::Write as _;
use std::path::Path;

use owo_colors::OwoColorize;

/// One differing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in the original only.
    Removed(String),
    /// Present in the converted text only.
    Added(String),
}

/// Compare two texts line by line. Empty lines are never reported.
#[must_use]
pub fn line_diff(original: &str, converted: &str) -> Vec<DiffLine> {
    let before: Vec<&str> = original.lines().collect();
    let after: Vec<&str> = converted.lines().collect();

    let mut lines = Vec::new();
    for index in 0..before.len().max(after.len()) {
        let old = before.get(index).copied().unwrap_or_default();
        let new = after.get(index).copied().unwrap_or_default();
        if old == new {
            continue;
        }
        if !old.is_empty() {
            lines.push(DiffLine::Removed(old.to_string()));
        }
        if !new.is_empty() {
            lines.push(DiffLine::Added(new.to_string()));
        }
    }
    lines
}

/// Render a diff with a `---`/`+++` header, red removals and green
/// additions.
#[must_use]
pub fn render_diff(input: &Path, output: &Path, lines: &[DiffLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("--- {} (original)", input.display()).bold());
    let _ = writeln!(out, "{}", format!("+++ {} (converted)", output.display()).bold());
    for line in lines {
        let _ = match line {
            DiffLine::Removed(text) => writeln!(out, "{}", format!("- {text}").red()),
            DiffLine::Added(text) => writeln!(out, "{}", format!("+ {text}").green()),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_diff() {
        assert!(line_diff("a\nb\n", "a\nb\n").is_empty());
    }

    #[test]
    fn test_positional_lines() {
        let diff = line_diff("a\nb\nc", "a\nx");
        assert_eq!(
            diff,
            vec![
                DiffLine::Removed("b".to_string()),
                DiffLine::Added("x".to_string()),
                DiffLine::Removed("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_has_header_and_markers() {
        let text = render_diff(
            Path::new("a.css"),
            Path::new("a.scss"),
            &[DiffLine::Added("x".to_string())],
        );
        assert!(text.contains("a.css (original)"));
        assert!(text.contains("a.scss (converted)"));
        assert!(text.contains("+ x"));
    }
}
