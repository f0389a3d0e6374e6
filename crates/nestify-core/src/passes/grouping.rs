//! Property grouping.
//!
//! Within one node, declarations whose properties share a dash-delimited
//! prefix (`border-top`, `border-left`) move into a nested property block
//! keyed by the prefix, keeping only their suffix (`top`, `left`). Each rule
//! and conditional block is handled on its own. Vendor-prefixed, custom and
//! variable properties never group.

use crate::tree::{Entry, NestTree, NodeKind};

/// The grouping prefix of a property, if it has one.
#[must_use]
pub fn property_prefix(property: &str) -> Option<(&str, &str)> {
    if property.starts_with('-') || property.starts_with('$') {
        return None;
    }
    property
        .split_once('-')
        .filter(|(prefix, suffix)| !prefix.is_empty() && !suffix.is_empty())
}

/// Group declarations in every rule and conditional block. Returns the
/// number of groups created.
pub fn group_properties(tree: &mut NestTree, min_size: usize) -> usize {
    let min_size = min_size.max(2);
    let mut created = 0;

    for id in tree.preorder() {
        if !matches!(
            tree.kind(id),
            Some(NodeKind::Rule { .. } | NodeKind::Conditional(_))
        ) {
            continue;
        }

        // STEP 1: Collect prefixes in first-seen order.
        let mut prefixes: Vec<(String, usize)> = Vec::new();
        for entry in tree.entries(id) {
            let Entry::Declaration(decl) = entry else {
                continue;
            };
            if let Some((prefix, _)) = property_prefix(&decl.property) {
                match prefixes.iter_mut().find(|(known, _)| known == prefix) {
                    Some((_, count)) => *count += 1,
                    None => prefixes.push((prefix.to_string(), 1)),
                }
            }
        }

        // STEP 2: Move the members of each large enough group.
        for (prefix, count) in prefixes {
            if count < min_size {
                continue;
            }
            let Some(node) = tree.get_mut(id) else {
                continue;
            };
            let mut members = Vec::with_capacity(count);
            node.entries.retain(|entry| match entry {
                Entry::Declaration(decl) => match property_prefix(&decl.property) {
                    Some((p, suffix)) if p == prefix => {
                        let mut member = decl.clone();
                        member.property = suffix.to_string();
                        members.push(Entry::Declaration(member));
                        false
                    }
                    _ => true,
                },
                Entry::Comment(_) | Entry::AtRule(_) => true,
            });

            let group = tree.ensure_group(id, &prefix);
            if let Some(group) = tree.get_mut(group) {
                group.entries.extend(members);
            }
            created += 1;
        }
    }
    created
}
