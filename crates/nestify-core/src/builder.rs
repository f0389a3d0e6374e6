//! Tree construction and conditional routing.
//!
//! Rules are inserted in source order. Each rule's selector is decomposed,
//! resolved against the anchor set and walked from the root, reusing nodes
//! that already exist. The rule's declarations land on the last node of the
//! path.
//!
//! A rule inside `@media`/`@supports`/`@container` is resolved the same way,
//! and its declarations go into a conditional block attached to the node its
//! unconditioned selector would occupy. Nested conditions give nested
//! blocks, outermost first. A conditional rule with no anchor to attach to
//! is kept unnested at the root, inside a root-level conditional block.

use nestify_css::{
    AtRule, AtRuleBody, Comment, Condition, CssNode, RuleItem, StyleRule, Stylesheet, Visit,
};

use crate::anchors::AnchorSet;
use crate::error::NestError;
use crate::options::ConvertOptions;
use crate::resolve::{ResolvedPath, limit_depth, merge_alternatives, resolve_path};
use crate::selector::decompose_lossy;
use crate::tree::{Entry, NestTree, NodeId};
use crate::warning::{Warning, WarningKind};

/// Builds a [`NestTree`] from a flat stylesheet.
pub struct TreeBuilder<'a> {
    anchors: &'a AnchorSet,
    options: &'a ConvertOptions,
    tree: NestTree,
    warnings: Vec<Warning>,
    /// Comments seen since the last rule, waiting for a home.
    pending_comments: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder. The anchor set must already cover the whole
    /// stylesheet.
    #[must_use]
    pub fn new(anchors: &'a AnchorSet, options: &'a ConvertOptions) -> Self {
        Self {
            anchors,
            options,
            tree: NestTree::new(),
            warnings: Vec::new(),
            pending_comments: Vec::new(),
        }
    }

    /// Insert every node of `sheet`, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`NestError`] when a rule's selector is empty.
    pub fn build(mut self, sheet: &Stylesheet) -> Result<(NestTree, Vec<Warning>), NestError> {
        let mut failure = None;
        sheet.walk(&mut |visit| {
            if failure.is_some() {
                return;
            }
            if let Err(error) = self.visit(visit) {
                failure = Some(error);
            }
        });
        if let Some(error) = failure {
            return Err(error);
        }

        // Trailing comments stay at the end of the document.
        let trailing = core::mem::take(&mut self.pending_comments);
        for text in trailing {
            self.tree.push_trailing_comment(text);
        }

        Ok((self.tree, self.warnings))
    }

    fn visit(&mut self, visit: Visit<'_, '_>) -> Result<(), NestError> {
        match visit {
            Visit::Rule(rule, conditions) => self.insert_rule(rule, conditions),
            Visit::AtRule(at_rule, conditions) => {
                self.carry_at_rule(at_rule, conditions);
                Ok(())
            }
            Visit::Comment(comment, _) => {
                self.queue_comment(comment);
                Ok(())
            }
        }
    }

    fn queue_comment(&mut self, comment: &Comment) {
        if self.options.comments {
            self.pending_comments.push(comment.text.trim().to_string());
        }
    }

    /// Non-conditional at-rules are kept verbatim: at the root, or inside a
    /// root-level conditional block when they sit inside one.
    fn carry_at_rule(&mut self, at_rule: &AtRule, conditions: &[Condition]) {
        let target = self.root_conditional_chain(conditions);
        self.flush_comments(target);
        let mut carried = at_rule.clone();
        if !self.options.comments {
            strip_comments(&mut carried);
        }
        self.tree.push_entry(target, Entry::AtRule(carried));
    }

    fn insert_rule(&mut self, rule: &StyleRule, conditions: &[Condition]) -> Result<(), NestError> {
        // STEP 1: A rule must have a selector, and so must every alternative.
        if rule.selectors.iter().any(|alternative| alternative.trim().is_empty()) {
            return Err(NestError::EmptySelector { line: rule.line });
        }

        // STEP 2: Resolve the selector into nesting steps.
        let path = self.resolve(rule);
        if path.steps.is_empty() || path.steps.iter().any(String::is_empty) {
            return Err(NestError::EmptyStep {
                selector: rule.selector.clone(),
                line: rule.line,
            });
        }

        // STEP 3: Find the node that receives the declarations.
        let target = if conditions.is_empty() {
            self.tree.ensure_path(NodeId::ROOT, &path.steps)
        } else if path.anchored {
            let node = self.tree.ensure_path(NodeId::ROOT, &path.steps);
            conditions
                .iter()
                .fold(node, |node, condition| self.tree.ensure_conditional(node, condition))
        } else {
            if self.options.nest {
                let reason = if rule.selectors.len() > 1 {
                    "its alternatives share no anchor"
                } else {
                    "has no anchor"
                };
                self.warnings.push(Warning::new(
                    WarningKind::UnanchoredConditional,
                    format!(
                        "line {}: `{}` inside `{}` {reason}; kept unnested",
                        rule.line,
                        rule.selector,
                        conditions.last().map(ToString::to_string).unwrap_or_default(),
                    ),
                ));
            }
            let block = self.root_conditional_chain(conditions);
            self.tree.ensure_rule(block, &flat_selector(rule))
        };

        // STEP 4: Leading comments, then the rule's own items in order.
        self.flush_comments(target);
        for item in &rule.items {
            match item {
                RuleItem::Declaration(decl) => {
                    self.tree.push_entry(target, Entry::Declaration(decl.clone()));
                }
                RuleItem::Comment(comment) => {
                    if self.options.comments {
                        let text = comment.text.trim().to_string();
                        self.tree.push_entry(target, Entry::Comment(text));
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve a rule's selector list into one path.
    fn resolve(&mut self, rule: &StyleRule) -> ResolvedPath {
        if !self.options.nest {
            return ResolvedPath {
                steps: vec![flat_selector(rule)],
                anchored: false,
            };
        }

        let mut paths = Vec::with_capacity(rule.selectors.len());
        for alternative in &rule.selectors {
            let (segments, error) = decompose_lossy(alternative);
            if let Some(error) = error {
                self.warnings.push(Warning::new(
                    WarningKind::SelectorFallback,
                    format!(
                        "line {}: could not decompose `{alternative}` ({error}); split on whitespace",
                        rule.line
                    ),
                ));
            }
            let mut path = resolve_path(&segments, self.anchors);
            if let Some(limit) = self.options.depth_limit() {
                limit_depth(&mut path, limit);
            }
            paths.push(path);
        }
        merge_alternatives(paths)
    }

    /// The innermost block of a chain of root-level conditional blocks.
    fn root_conditional_chain(&mut self, conditions: &[Condition]) -> NodeId {
        conditions.iter().fold(NodeId::ROOT, |node, condition| {
            self.tree.ensure_conditional(node, condition)
        })
    }

    fn flush_comments(&mut self, target: NodeId) {
        let pending = core::mem::take(&mut self.pending_comments);
        for text in pending {
            self.tree.push_entry(target, Entry::Comment(text));
        }
    }
}

/// Remove every comment inside a carried at-rule.
fn strip_comments(at_rule: &mut AtRule) {
    match &mut at_rule.body {
        AtRuleBody::None => {}
        AtRuleBody::Declarations(items) => {
            items.retain(|item| matches!(item, RuleItem::Declaration(_)));
        }
        AtRuleBody::Rules(nodes) => {
            nodes.retain(|node| !matches!(node, CssNode::Comment(_)));
            for node in nodes {
                match node {
                    CssNode::Rule(rule) => {
                        rule.items
                            .retain(|item| matches!(item, RuleItem::Declaration(_)));
                    }
                    CssNode::AtRule(nested) => strip_comments(nested),
                    CssNode::Comment(_) => {}
                }
            }
        }
    }
}

/// The rule's selector list, normalized to `", "` separators.
fn flat_selector(rule: &StyleRule) -> String {
    rule.selectors
        .iter()
        .map(|alternative| alternative.trim())
        .collect::<Vec<_>>()
        .join(", ")
}
