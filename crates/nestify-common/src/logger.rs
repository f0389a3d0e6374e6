//! Converter logging with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times
//! when many files (or many rules in one file) hit the same condition.
//! All output goes to stderr so converted SCSS on stdout stays clean.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// How much the logger prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors and warnings only.
    Quiet,
    /// Informational and success messages as well.
    #[default]
    Normal,
    /// Everything, including per-step detail.
    Verbose,
}

/// Terminal logger shared by the CLI and its worker threads.
#[derive(Debug, Default)]
pub struct Logger {
    verbosity: Verbosity,
    /// Warnings we've already printed (to deduplicate)
    warned: Mutex<HashSet<String>>,
}

impl Logger {
    /// Create a logger with the given verbosity.
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Current verbosity.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Returns true when informational output is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Returns true when per-step detail is printed.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Log an informational message.
    pub fn info(&self, message: impl Display) {
        if !self.is_quiet() {
            eprintln!("{} {message}", "ℹ".blue());
        }
    }

    /// Log a success message.
    pub fn success(&self, message: impl Display) {
        if !self.is_quiet() {
            eprintln!("{} {message}", "✓".green());
        }
    }

    /// Log a warning (prints once per unique message, even in quiet mode).
    ///
    /// # Example
    /// ```ignore
    /// logger.warn("style.css: selector fallback for `.a[`");
    /// ```
    pub fn warn(&self, message: impl Display) {
        let text = message.to_string();
        let first_time = match self.warned.lock() {
            Ok(mut set) => set.insert(text.clone()),
            Err(poisoned) => poisoned.into_inner().insert(text.clone()),
        };

        if first_time {
            eprintln!("{} {}", "⚠".yellow(), text.yellow());
        }
    }

    /// Log an error message.
    pub fn error(&self, message: impl Display) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Log a detail message (verbose mode only).
    pub fn verbose(&self, message: impl Display) {
        if self.is_verbose() {
            eprintln!("{} {}", "  →".dimmed(), message.dimmed());
        }
    }

    /// Forget all recorded warnings (call between independent runs).
    pub fn clear_warnings(&self) {
        match self.warned.lock() {
            Ok(mut set) => set.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// Number of distinct warnings printed so far.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        match self.warned.lock() {
            Ok(set) => set.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_deduplicated() {
        let logger = Logger::new(Verbosity::Quiet);
        logger.warn("same message");
        logger.warn("same message");
        logger.warn("other message");
        assert_eq!(logger.warning_count(), 2);

        logger.clear_warnings();
        assert_eq!(logger.warning_count(), 0);
    }

    #[test]
    fn test_verbosity_flags() {
        assert!(Logger::new(Verbosity::Quiet).is_quiet());
        assert!(Logger::new(Verbosity::Verbose).is_verbose());
        assert!(!Logger::default().is_quiet());
        assert_eq!(Logger::default().verbosity(), Verbosity::Normal);
    }
}
