//! Recoverable problems found during a conversion.
//!
//! The engine never prints. Warnings are collected and returned with the
//! result so the caller decides how (and whether) to show them.

use core::fmt;

use strum_macros::Display;

/// What kind of recoverable problem occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum WarningKind {
    /// A selector could not be decomposed and was split on whitespace instead.
    SelectorFallback,
    /// A rule inside a conditional block has no anchor to attach to and was
    /// kept unnested at the root.
    UnanchoredConditional,
    /// The parser skipped or repaired part of the input.
    ParseIssue,
}

/// A recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Category.
    pub kind: WarningKind,
    /// Human-readable description, including the source line when known.
    pub message: String,
}

impl Warning {
    /// Create a warning.
    #[must_use]
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
