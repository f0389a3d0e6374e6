//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! Selectors, preludes and declaration values are not broken into component
//! values; they are sliced from the source text using token spans, so that a
//! converter can reproduce them exactly.

use core::fmt;

use crate::ast::{AtRule, AtRuleBody, Comment, CssNode, Declaration, RuleItem, StyleRule, Stylesheet};
use crate::tokenizer::{CSSToken, CSSTokenizer, Token};

/// A recoverable problem found while parsing. Parsing always continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// 1-based line where the problem was noticed.
    pub line: usize,
    /// 1-based column where the problem was noticed.
    pub column: usize,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
///
/// CSS parser that builds a [`Stylesheet`] from positioned tokens.
pub struct CSSParser {
    /// The source text, as code points (token spans index into this).
    source: Vec<char>,
    /// Input tokens, always terminated by EOF.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    position: usize,
    /// Problems recorded so far.
    issues: Vec<ParseIssue>,
}

impl CSSParser {
    /// Tokenize `source` and prepare to parse it.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut tokenizer = CSSTokenizer::new(source);
        tokenizer.run();
        Self {
            source: source.chars().collect(),
            tokens: tokenizer.into_tokens(),
            position: 0,
            issues: Vec::new(),
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let nodes = self.consume_list_of_rules(true);
        Stylesheet { nodes }
    }

    /// Problems recorded while parsing.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume the parser, returning the recorded problems.
    #[must_use]
    pub fn into_issues(self) -> Vec<ParseIssue> {
        self.issues
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self, top_level: bool) -> Vec<CssNode> {
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>"
                // "Do nothing."
                CSSToken::Whitespace => {
                    self.advance();
                }

                // "<EOF-token>"
                // "Return the list of rules."
                CSSToken::EOF => return rules,

                // "<CDO-token>" / "<CDC-token>"
                // "If the top-level flag is set, do nothing."
                CSSToken::CDO | CSSToken::CDC if top_level => {
                    self.advance();
                }

                CSSToken::Comment(text) => {
                    let comment = Comment {
                        text: text.clone(),
                        line: self.current().span.line,
                    };
                    self.advance();
                    rules.push(CssNode::Comment(comment));
                }

                // The end of an enclosing block; the caller consumes it.
                CSSToken::RightBrace if !top_level => return rules,

                CSSToken::RightBrace => {
                    self.issue_here("unexpected `}` with no open block");
                    self.advance();
                }

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                CSSToken::AtKeyword(_) => {
                    let at_rule = self.consume_at_rule();
                    rules.push(CssNode::AtRule(at_rule));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a qualified rule. If
                // anything is returned, append it to the list of rules."
                _ => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(CssNode::Rule(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> AtRule {
        let line = self.current().span.line;
        let name = match self.peek() {
            CSSToken::AtKeyword(name) => name.clone(),
            _ => String::new(),
        };
        self.advance();
        let prelude_start = self.position;

        loop {
            match self.peek() {
                // "<semicolon-token>"
                // "Return the at-rule."
                CSSToken::Semicolon => {
                    let prelude = self.text_between(prelude_start, self.position);
                    self.advance();
                    return AtRule {
                        name,
                        prelude,
                        body: AtRuleBody::None,
                        line,
                    };
                }

                // "<EOF-token>"
                // "This is a parse error. Return the at-rule."
                CSSToken::EOF => {
                    self.issue_here(format!("unterminated `@{name}` rule"));
                    let prelude = self.text_between(prelude_start, self.position);
                    return AtRule {
                        name,
                        prelude,
                        body: AtRuleBody::None,
                        line,
                    };
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the at-rule's block.
                // Return the at-rule."
                CSSToken::LeftBrace => {
                    let prelude = self.text_between(prelude_start, self.position);
                    self.advance();
                    let body = if AtRule::holds_rules(&name) {
                        AtRuleBody::Rules(self.consume_list_of_rules(false))
                    } else {
                        AtRuleBody::Declarations(self.consume_list_of_declarations())
                    };
                    self.expect_block_end(&format!("@{name}"));
                    return AtRule {
                        name,
                        prelude,
                        body,
                        line,
                    };
                }

                // A stray `}` ends the enclosing block, not this prelude.
                CSSToken::RightBrace => {
                    self.issue_here(format!("`@{name}` rule cut short by `}}`"));
                    let prelude = self.text_between(prelude_start, self.position);
                    return AtRule {
                        name,
                        prelude,
                        body: AtRuleBody::None,
                        line,
                    };
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the at-rule's prelude."
                _ => self.advance(),
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let prelude_start = self.position;
        let line = self.current().span.line;

        loop {
            match self.peek() {
                // "<EOF-token>"
                // "This is a parse error. Return nothing."
                CSSToken::EOF => {
                    self.issue_here("selector without a declaration block");
                    return None;
                }

                // A `;` or `}` cannot appear in a selector; drop what we have.
                CSSToken::Semicolon | CSSToken::RightBrace => {
                    let text = self.text_between(prelude_start, self.position);
                    self.issue_here(format!("discarded stray tokens `{text}`"));
                    if self.peek() == &CSSToken::Semicolon {
                        self.advance();
                    }
                    return None;
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the qualified rule's block.
                // Return the qualified rule."
                CSSToken::LeftBrace => {
                    let prelude_end = self.position;
                    let selector = self.text_between(prelude_start, prelude_end);
                    let selectors = self.split_selector_list(prelude_start, prelude_end);
                    self.advance();

                    let items = self.consume_list_of_declarations();
                    self.expect_block_end(&selector);

                    return Some(StyleRule {
                        selector,
                        selectors,
                        items,
                        line,
                    });
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the qualified rule's prelude."
                _ => self.advance(),
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self) -> Vec<RuleItem> {
        let mut items = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>" / "<semicolon-token>"
                // "Do nothing."
                CSSToken::Whitespace | CSSToken::Semicolon => self.advance(),

                // "<EOF-token>" (and the end of the enclosing block)
                // "Return the list of declarations."
                CSSToken::EOF | CSSToken::RightBrace => return items,

                CSSToken::Comment(text) => {
                    let comment = Comment {
                        text: text.clone(),
                        line: self.current().span.line,
                    };
                    self.advance();
                    items.push(RuleItem::Comment(comment));
                }

                // "<at-keyword-token>"
                // Nested at-rules have no place in a flat declaration block.
                CSSToken::AtKeyword(name) => {
                    let message = format!("ignored `@{name}` inside a declaration block");
                    self.issue_here(message);
                    let _ = self.consume_at_rule();
                }

                // "<ident-token>" / "anything else"
                _ => {
                    if let Some(declaration) = self.consume_declaration() {
                        items.push(RuleItem::Declaration(declaration));
                    }
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let start = self.position;
        let mut colon = None;
        let mut depth = 0usize;

        // STEP 1: Find the end of the declaration, remembering the first
        // top-level colon.
        loop {
            match self.peek() {
                CSSToken::EOF | CSSToken::RightBrace => break,
                CSSToken::Semicolon if depth == 0 => break,
                CSSToken::Colon if depth == 0 && colon.is_none() => colon = Some(self.position),
                CSSToken::LeftParen | CSSToken::LeftBracket | CSSToken::Function(_) => depth += 1,
                CSSToken::RightParen | CSSToken::RightBracket => depth = depth.saturating_sub(1),
                CSSToken::LeftBrace if depth == 0 => {
                    let text = self.text_between(start, self.position);
                    self.issue_here(format!("skipped nested rule `{text}`"));
                    self.skip_block();
                    return None;
                }
                _ => {}
            }
            self.advance();
        }
        let end = self.position;

        // STEP 2: "If the next input token is anything other than a
        // <colon-token>, this is a parse error. Return nothing."
        let Some(colon) = colon else {
            let text = self.text_between(start, end);
            self.issue_at(start, format!("declaration `{text}` has no `:`"));
            return None;
        };

        let property = self.text_between(start, colon);
        if property.is_empty() || property.contains(' ') {
            self.issue_at(start, format!("invalid property name `{property}`"));
            return None;
        }

        // STEP 3: "If the last two non-<whitespace-token>s in the declaration's
        // value are a <delim-token> with the value "!" followed by an
        // <ident-token> with a value that is an ASCII case-insensitive match
        // for "important", remove them from the declaration's value and set
        // the declaration's important flag to true."
        let raw = self.text_between(colon + 1, end);
        let (value, important) = strip_important(&raw);

        Some(Declaration {
            property,
            value,
            important,
        })
    }

    /// Skip a `{ ... }` block, including nested blocks.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                CSSToken::EOF => return,
                CSSToken::LeftBrace => depth += 1,
                CSSToken::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Consume the `}` closing a block, or record that it is missing.
    fn expect_block_end(&mut self, owner: &str) {
        if self.peek() == &CSSToken::RightBrace {
            self.advance();
        } else {
            self.issue_here(format!("unterminated block for `{owner}`"));
        }
    }

    /// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
    ///
    /// "A selector list is a comma-separated list of selectors."
    /// Commas inside brackets and functional pseudo-classes do not split.
    fn split_selector_list(&self, start: usize, end: usize) -> Vec<String> {
        let mut selectors = Vec::new();
        let mut depth = 0usize;
        let mut current = start;

        for index in start..end {
            match &self.tokens[index].kind {
                CSSToken::LeftParen | CSSToken::LeftBracket | CSSToken::Function(_) => depth += 1,
                CSSToken::RightParen | CSSToken::RightBracket => depth = depth.saturating_sub(1),
                CSSToken::Comma if depth == 0 => {
                    selectors.push(self.text_between(current, index));
                    current = index + 1;
                }
                _ => {}
            }
        }
        selectors.push(self.text_between(current, end));
        selectors
    }

    /// Source text covered by tokens `start..end`, with comments removed and
    /// each whitespace run collapsed to one space, trimmed.
    fn text_between(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for token in &self.tokens[start..end] {
            match token.kind {
                CSSToken::Comment(_) | CSSToken::EOF => {}
                CSSToken::Whitespace => {
                    if !text.is_empty() && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
                _ => text.extend(&self.source[token.span.start..token.span.end]),
            }
        }
        text.trim_end().to_string()
    }

    fn issue_here(&mut self, message: impl Into<String>) {
        self.issue_at(self.position, message);
    }

    fn issue_at(&mut self, index: usize, message: impl Into<String>) {
        let span = self.tokens[index.min(self.tokens.len() - 1)].span;
        self.issues.push(ParseIssue {
            message: message.into(),
            line: span.line,
            column: span.column,
        });
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &CSSToken {
        &self.current().kind
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }
}

/// Split a trailing `!important` (any case, optional space after `!`) off a
/// declaration value.
fn strip_important(raw: &str) -> (String, bool) {
    let trimmed = raw.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(before) = lower.strip_suffix("important") {
        let before = before.trim_end();
        if let Some(value) = before.strip_suffix('!') {
            // ASCII lowercasing preserves byte offsets.
            return (trimmed[..value.len()].trim().to_string(), true);
        }
    }
    (trimmed.trim().to_string(), false)
}

/// Parse `source`, returning the stylesheet and any recoverable problems.
#[must_use]
pub fn parse_with_issues(source: &str) -> (Stylesheet, Vec<ParseIssue>) {
    let mut parser = CSSParser::new(source);
    let stylesheet = parser.parse_stylesheet();
    (stylesheet, parser.into_issues())
}

/// Parse `source`, discarding recoverable problems.
#[must_use]
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    parse_with_issues(source).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_important() {
        assert_eq!(strip_important("red !important"), ("red".to_string(), true));
        assert_eq!(strip_important("red ! IMPORTANT "), ("red".to_string(), true));
        assert_eq!(strip_important("red"), ("red".to_string(), false));
        assert_eq!(strip_important("unimportant"), ("unimportant".to_string(), false));
    }
}
