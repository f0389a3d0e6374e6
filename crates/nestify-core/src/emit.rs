//! SCSS serialization of a [`NestTree`].
//!
//! Output uses two-space indentation. Rule, conditional and property group
//! nodes with nothing to print are omitted. At the top level, entries of the
//! root (variables, carried at-rules) come first, then the root's children,
//! then trailing comments. Top-level blocks are separated by a blank line
//! and the output ends with a newline.

use core::fmt::Write as _;

use nestify_css::{AtRule, AtRuleBody, CssNode, Declaration, RuleItem};

use crate::tree::{Entry, NestTree, NodeId, NodeKind};

const INDENT: &str = "  ";

/// Serialize the tree as SCSS.
#[must_use]
pub fn emit(tree: &NestTree) -> String {
    let mut pieces: Vec<(String, bool)> = Vec::new();

    for entry in tree.entries(NodeId::ROOT) {
        let mut piece = String::new();
        write_entry(&mut piece, entry, 0);
        let is_block = matches!(entry, Entry::AtRule(at_rule) if !matches!(at_rule.body, AtRuleBody::None));
        pieces.push((piece, is_block));
    }
    for &child in tree.children(NodeId::ROOT) {
        if is_blank(tree, child) {
            continue;
        }
        let mut piece = String::new();
        write_node(&mut piece, tree, child, 0);
        pieces.push((piece, true));
    }
    for text in tree.trailing_comments() {
        let mut piece = String::new();
        write_comment(&mut piece, text, 0);
        pieces.push((piece, false));
    }

    let mut out = String::new();
    let mut previous_block = None;
    for (piece, is_block) in pieces {
        if previous_block.is_some_and(|previous| previous || is_block) {
            out.push('\n');
        }
        out.push_str(&piece);
        previous_block = Some(is_block);
    }
    out
}

/// Whether a node would print nothing.
fn is_blank(tree: &NestTree, id: NodeId) -> bool {
    tree.entries(id).is_empty()
        && tree
            .children(id)
            .iter()
            .all(|&child| is_blank(tree, child))
}

fn write_node(out: &mut String, tree: &NestTree, id: NodeId, depth: usize) {
    let indent = INDENT.repeat(depth);
    let header = match tree.kind(id) {
        Some(NodeKind::Rule { selector }) => format!("{selector} {{"),
        Some(NodeKind::Conditional(condition)) => format!("{condition} {{"),
        Some(NodeKind::PropertyGroup { prefix }) => format!("{prefix}: {{"),
        Some(NodeKind::Root) | None => return,
    };
    let _ = writeln!(out, "{indent}{header}");

    for entry in tree.entries(id) {
        write_entry(out, entry, depth + 1);
    }
    for &child in tree.children(id) {
        if !is_blank(tree, child) {
            write_node(out, tree, child, depth + 1);
        }
    }

    let _ = writeln!(out, "{indent}}}");
}

fn write_entry(out: &mut String, entry: &Entry, depth: usize) {
    match entry {
        Entry::Declaration(decl) => write_declaration(out, decl, depth),
        Entry::Comment(text) => write_comment(out, text, depth),
        Entry::AtRule(at_rule) => write_at_rule(out, at_rule, depth),
    }
}

fn write_declaration(out: &mut String, decl: &Declaration, depth: usize) {
    let indent = INDENT.repeat(depth);
    let important = if decl.important { " !important" } else { "" };
    let _ = writeln!(out, "{indent}{}: {}{important};", decl.property, decl.value);
}

fn write_comment(out: &mut String, text: &str, depth: usize) {
    let indent = INDENT.repeat(depth);
    let _ = writeln!(out, "{indent}/* {text} */");
}

/// Carried at-rules are printed as they were parsed.
fn write_at_rule(out: &mut String, at_rule: &AtRule, depth: usize) {
    let indent = INDENT.repeat(depth);
    let head = if at_rule.prelude.is_empty() {
        format!("@{}", at_rule.name)
    } else {
        format!("@{} {}", at_rule.name, at_rule.prelude)
    };

    match &at_rule.body {
        AtRuleBody::None => {
            let _ = writeln!(out, "{indent}{head};");
        }
        AtRuleBody::Declarations(items) => {
            let _ = writeln!(out, "{indent}{head} {{");
            write_items(out, items, depth + 1);
            let _ = writeln!(out, "{indent}}}");
        }
        AtRuleBody::Rules(nodes) => {
            let _ = writeln!(out, "{indent}{head} {{");
            for node in nodes {
                match node {
                    CssNode::Rule(rule) => {
                        let inner = INDENT.repeat(depth + 1);
                        let _ = writeln!(out, "{inner}{} {{", rule.selectors.join(", "));
                        write_items(out, &rule.items, depth + 2);
                        let _ = writeln!(out, "{inner}}}");
                    }
                    CssNode::AtRule(nested) => write_at_rule(out, nested, depth + 1),
                    CssNode::Comment(comment) => write_comment(out, comment.text.trim(), depth + 1),
                }
            }
            let _ = writeln!(out, "{indent}}}");
        }
    }
}

fn write_items(out: &mut String, items: &[RuleItem], depth: usize) {
    for item in items {
        match item {
            RuleItem::Declaration(decl) => write_declaration(out, decl, depth),
            RuleItem::Comment(comment) => write_comment(out, comment.text.trim(), depth),
        }
    }
}
