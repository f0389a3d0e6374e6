//! CSS tokenizer, parser and flat stylesheet AST for the nestify converter.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comments kept as tokens
//!   - Source spans (offset, line, column) on every token
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules with comma-separated selector lists
//!   - At-rules holding rule lists (`@media`, `@supports`, ...) or declarations
//!   - Declarations with `!important`, values kept verbatim
//!   - Recoverable problems reported as [`ParseIssue`]s
//!
//! # Not Implemented
//!
//! - Component value trees (values are opaque text)
//! - Native CSS nesting inside style rules

/// Flat stylesheet AST.
pub mod ast;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use ast::{
    AtRule, AtRuleBody, Comment, Condition, ConditionKind, CssNode, Declaration, RuleItem,
    StyleRule, Stylesheet, Visit,
};
pub use parser::{CSSParser, ParseIssue, parse_stylesheet, parse_with_issues};
pub use tokenizer::{CSSToken, CSSTokenizer, Span, Token};
