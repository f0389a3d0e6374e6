//! Errors that stop the conversion of one stylesheet.

use thiserror::Error;

/// A structural problem that makes a stylesheet impossible to nest.
///
/// Recoverable problems are reported as [`crate::Warning`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestError {
    /// A rule (or one alternative of a selector list) has no selector text.
    #[error("line {line}: rule has an empty selector")]
    EmptySelector {
        /// 1-based line of the rule.
        line: usize,
    },

    /// Resolution produced a path with an empty step.
    #[error("line {line}: selector `{selector}` resolved to an empty nesting step")]
    EmptyStep {
        /// The selector being placed.
        selector: String,
        /// 1-based line of the rule.
        line: usize,
    },
}
