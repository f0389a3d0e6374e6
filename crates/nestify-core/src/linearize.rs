//! Canonical ordering of the tree.
//!
//! Every node renders its entries first, then its children in three bands:
//! property groups, conditional blocks, nested rules. Within a band children
//! keep the order they were created in. Children are ordered before their
//! parent, so every depth obeys the same layout.
//!
//! The root is left in source order: moving a root-level conditional block
//! ahead of the rules it overrides would change the cascade.

use crate::tree::{NestTree, NodeId, NodeKind};

/// Reorder the children of every node into canonical order.
pub fn linearize(tree: &mut NestTree) {
    let mut order = tree.preorder();
    order.reverse();

    for id in order {
        if matches!(tree.kind(id), Some(NodeKind::Root)) {
            continue;
        }
        let children = tree.children(id).to_vec();
        let mut sorted = Vec::with_capacity(children.len());
        for band in 0..3 {
            sorted.extend(children.iter().copied().filter(|&child| band_of(tree, child) == band));
        }
        if let Some(node) = tree.get_mut(id) {
            node.children = sorted;
        }
    }
}

fn band_of(tree: &NestTree, id: NodeId) -> u8 {
    match tree.kind(id) {
        Some(NodeKind::PropertyGroup { .. }) => 0,
        Some(NodeKind::Conditional(_)) => 1,
        _ => 2,
    }
}
