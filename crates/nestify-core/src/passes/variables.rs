//! Variable extraction.
//!
//! Values that occur at least `threshold` times across the document,
//! including inside carried at-rules such as `@font-face`, are hoisted into
//! `$name: value;` declarations at the top of the root, and every
//! occurrence is replaced by `$name`. Names are numbered in the order values
//! are first seen, starting from 1 for each call.
//!
//! The definitions go after any leading `@charset`, `@import`, `@use` and
//! `@forward` at-rules, which must stay first.

use std::collections::HashMap;

use nestify_css::{AtRule, AtRuleBody, CssNode, Declaration, RuleItem};

use crate::tree::{Entry, NestTree, NodeId};

/// A hoisted variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The name without the `$`.
    pub name: String,
    /// The shared value.
    pub value: String,
}

/// Whether a value already refers to a variable.
fn is_symbolic(value: &str) -> bool {
    value.starts_with("var(--") || value.starts_with('$')
}

/// The value of a declaration that may become a variable.
fn candidate(decl: &Declaration) -> Option<&str> {
    let value = decl.value.trim();
    if value.is_empty() || is_symbolic(value) || decl.property.starts_with('$') {
        None
    } else {
        Some(value)
    }
}

/// Hoist repeated values. Returns the variables in naming order.
pub fn extract_variables(tree: &mut NestTree, threshold: usize, prefix: &str) -> Vec<Variable> {
    let threshold = threshold.max(1);

    // STEP 1: Count values in document order.
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for_each_declaration(tree, &mut |decl| {
        if let Some(value) = candidate(decl) {
            let count = counts.entry(value.to_string()).or_insert_with(|| {
                first_seen.push(value.to_string());
                0
            });
            *count += 1;
        }
    });

    // STEP 2: Name the repeated values.
    let mut variables: Vec<Variable> = Vec::new();
    let mut names: HashMap<String, String> = HashMap::new();
    for value in first_seen {
        if counts.get(&value).copied().unwrap_or_default() < threshold {
            continue;
        }
        let name = format!("{prefix}-{}", variables.len() + 1);
        let _ = names.insert(value.clone(), name.clone());
        variables.push(Variable { name, value });
    }
    if variables.is_empty() {
        return variables;
    }

    // STEP 3: Rewrite every occurrence.
    for_each_declaration(tree, &mut |decl| {
        let name = candidate(decl).and_then(|value| names.get(value));
        if let Some(name) = name {
            decl.value = format!("${name}");
        }
    });

    // STEP 4: Hoist the definitions after the document preamble.
    if let Some(root) = tree.get_mut(NodeId::ROOT) {
        let at = preamble_len(&root.entries);
        let hoisted = variables.iter().map(|variable| {
            Entry::Declaration(Declaration::new(
                format!("${}", variable.name),
                variable.value.clone(),
                false,
            ))
        });
        let _ = root.entries.splice(at..at, hoisted);
    }

    variables
}

/// Visit every declaration in document order: node entries, then the
/// declarations held inside carried at-rules.
fn for_each_declaration(tree: &mut NestTree, visit: &mut impl FnMut(&mut Declaration)) {
    for id in tree.preorder() {
        let Some(node) = tree.get_mut(id) else {
            continue;
        };
        for entry in &mut node.entries {
            match entry {
                Entry::Declaration(decl) => visit(decl),
                Entry::AtRule(at_rule) => visit_at_rule(at_rule, visit),
                Entry::Comment(_) => {}
            }
        }
    }
}

fn visit_at_rule(at_rule: &mut AtRule, visit: &mut impl FnMut(&mut Declaration)) {
    match &mut at_rule.body {
        AtRuleBody::None => {}
        AtRuleBody::Declarations(items) => visit_items(items, visit),
        AtRuleBody::Rules(nodes) => {
            for node in nodes {
                match node {
                    CssNode::Rule(rule) => visit_items(&mut rule.items, visit),
                    CssNode::AtRule(nested) => visit_at_rule(nested, visit),
                    CssNode::Comment(_) => {}
                }
            }
        }
    }
}

fn visit_items(items: &mut [RuleItem], visit: &mut impl FnMut(&mut Declaration)) {
    for item in items {
        if let RuleItem::Declaration(decl) = item {
            visit(decl);
        }
    }
}

/// Number of leading root entries that must stay ahead of variables:
/// `@charset`/`@import`/`@use`/`@forward` and the comments among them.
fn preamble_len(entries: &[Entry]) -> usize {
    let mut len = 0;
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Entry::AtRule(at_rule) if is_preamble(&at_rule.name) => len = index + 1,
            Entry::Comment(_) => {}
            Entry::AtRule(_) | Entry::Declaration(_) => break,
        }
    }
    len
}

fn is_preamble(name: &str) -> bool {
    ["charset", "import", "use", "forward"]
        .iter()
        .any(|keyword| name.eq_ignore_ascii_case(keyword))
}
