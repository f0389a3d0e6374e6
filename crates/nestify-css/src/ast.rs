//! Flat stylesheet AST produced by the parser.
//!
//! The shape mirrors [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing):
//! a stylesheet is a list of rules, where a rule is either a style rule
//! (qualified rule) or an at-rule. Comments are kept as nodes so that a
//! converter can carry them through.

use core::fmt;

use strum_macros::{Display, EnumString};

/// A `/* ... */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text between the delimiters, untrimmed.
    pub text: String,
    /// 1-based source line of the opening `/*`.
    pub line: usize,
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A declaration (e.g., `color: red !important`). The value is kept as
/// source text, with `!important` split off into a flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// The property name as written.
    pub property: String,
    /// The value, trimmed, with comments removed.
    pub value: String,
    /// Whether the declaration had `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

/// One entry in a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleItem {
    /// A declaration.
    Declaration(Declaration),
    /// A comment between declarations.
    Comment(Comment),
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: a selector list and its declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The full selector text, whitespace-normalized.
    pub selector: String,
    /// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
    ///
    /// The comma-separated alternatives of `selector`, in order. Empty
    /// alternatives are kept so callers can reject them.
    pub selectors: Vec<String>,
    /// Declarations and comments, in source order.
    pub items: Vec<RuleItem>,
    /// 1-based source line of the selector.
    pub line: usize,
}

impl StyleRule {
    /// Iterate over the rule's declarations, skipping comments.
    #[must_use = "iterators are lazy"]
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::Declaration(decl) => Some(decl),
            RuleItem::Comment(_) => None,
        })
    }
}

/// The block of an at-rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRuleBody {
    /// Statement at-rule ending in `;` (e.g. `@import`).
    None,
    /// Block holding a list of rules (e.g. `@media`, `@keyframes`).
    Rules(Vec<CssNode>),
    /// Block holding declarations (e.g. `@font-face`, `@page`).
    Declarations(Vec<RuleItem>),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`), as written.
    pub name: String,
    /// The prelude text, whitespace-normalized.
    pub prelude: String,
    /// The block, if any.
    pub body: AtRuleBody,
    /// 1-based source line of the at-keyword.
    pub line: usize,
}

impl AtRule {
    /// If this at-rule is a conditional group rule, return its condition.
    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        if !matches!(self.body, AtRuleBody::Rules(_)) {
            return None;
        }
        let kind = self.name.parse::<ConditionKind>().ok()?;
        Some(Condition {
            kind,
            text: self.prelude.clone(),
        })
    }

    /// Whether an at-rule with this name holds a list of rules rather than
    /// declarations.
    #[must_use]
    pub fn holds_rules(name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let unprefixed = strip_vendor_prefix(&name);
        matches!(
            unprefixed,
            "media" | "supports" | "container" | "layer" | "document" | "keyframes" | "scope"
        )
    }
}

/// Strip a `-webkit-`/`-moz-`/... prefix from an at-keyword.
fn strip_vendor_prefix(name: &str) -> &str {
    name.strip_prefix('-')
        .and_then(|rest| rest.split_once('-'))
        .map_or(name, |(_, unprefixed)| unprefixed)
}

/// [CSS Conditional Rules Level 3 § 2](https://www.w3.org/TR/css-conditional-3/#processing)
///
/// The kinds of conditional group rule a style rule can sit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConditionKind {
    /// `@media`
    Media,
    /// `@supports`
    Supports,
    /// `@container`
    Container,
}

/// A conditional wrapper: its kind and raw condition text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Which at-rule introduced the condition.
    pub kind: ConditionKind,
    /// The prelude, e.g. `(max-width: 600px)`.
    pub text: String,
}

impl Condition {
    /// Create a condition.
    #[must_use]
    pub fn new(kind: ConditionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "@{}", self.kind)
        } else {
            write!(f, "@{} {}", self.kind, self.text)
        }
    }
}

/// A top-level or block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssNode {
    /// A style rule.
    Rule(StyleRule),
    /// An at-rule.
    AtRule(AtRule),
    /// A comment between rules.
    Comment(Comment),
}

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// Top-level nodes in source order.
    pub nodes: Vec<CssNode>,
}

/// A node reached by [`Stylesheet::walk`], with the conditional group rules
/// enclosing it (outermost first).
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a, 'c> {
    /// A style rule.
    Rule(&'a StyleRule, &'c [Condition]),
    /// An at-rule that is not a conditional group rule.
    AtRule(&'a AtRule, &'c [Condition]),
    /// A comment.
    Comment(&'a Comment, &'c [Condition]),
}

impl Stylesheet {
    /// Visit every node in source order, descending into `@media`,
    /// `@supports` and `@container` blocks. Other at-rules are visited whole.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(Visit<'a, '_>)) {
        let mut conditions = Vec::new();
        walk_nodes(&self.nodes, &mut conditions, visitor);
    }

    /// Visit every style rule reachable by [`Stylesheet::walk`].
    pub fn walk_rules<'a>(&'a self, visitor: &mut impl FnMut(&'a StyleRule, &[Condition])) {
        self.walk(&mut |visit| {
            if let Visit::Rule(rule, conditions) = visit {
                visitor(rule, conditions);
            }
        });
    }

    /// Count declarations in the stylesheet, including those inside at-rules.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        count_in_nodes(&self.nodes)
    }
}

fn walk_nodes<'a>(
    nodes: &'a [CssNode],
    conditions: &mut Vec<Condition>,
    visitor: &mut impl FnMut(Visit<'a, '_>),
) {
    for node in nodes {
        match node {
            CssNode::Rule(rule) => visitor(Visit::Rule(rule, conditions)),
            CssNode::Comment(comment) => visitor(Visit::Comment(comment, conditions)),
            CssNode::AtRule(at_rule) => match (at_rule.condition(), &at_rule.body) {
                (Some(condition), AtRuleBody::Rules(children)) => {
                    conditions.push(condition);
                    walk_nodes(children, conditions, visitor);
                    let _ = conditions.pop();
                }
                _ => visitor(Visit::AtRule(at_rule, conditions)),
            },
        }
    }
}

fn count_in_nodes(nodes: &[CssNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            CssNode::Rule(rule) => rule.declarations().count(),
            CssNode::Comment(_) => 0,
            CssNode::AtRule(at_rule) => match &at_rule.body {
                AtRuleBody::None => 0,
                AtRuleBody::Rules(children) => count_in_nodes(children),
                AtRuleBody::Declarations(items) => items
                    .iter()
                    .filter(|item| matches!(item, RuleItem::Declaration(_)))
                    .count(),
            },
        })
        .sum()
}
