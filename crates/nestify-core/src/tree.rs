//! The nested rule tree.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. Each node owns its entries and the ordered list of its
//! children; a node is never referenced from two parents, so the tree is
//! acyclic by construction.
//!
//! Children are looked up by key among the *direct* children of a node only.
//! Asking for an existing key returns the existing child, which is how
//! repeated selectors merge instead of producing duplicate siblings.

use std::collections::HashMap;

use nestify_css::{AtRule, Condition, Declaration};

/// A type-safe index into a [`NestTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// What a node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document.
    Root,
    /// A rule block; `selector` is one step (`.card`, `&:hover`, `> li`).
    Rule {
        /// The step's selector text.
        selector: String,
    },
    /// A conditional block (`@media ...`) attached under a node.
    Conditional(Condition),
    /// A nested property block (`border: { ... }`).
    PropertyGroup {
        /// The shared property prefix.
        prefix: String,
    },
}

/// Something held by a node, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A declaration.
    Declaration(Declaration),
    /// A comment, trimmed.
    Comment(String),
    /// An at-rule carried through unchanged.
    AtRule(AtRule),
}

/// Lookup key for a direct child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ChildKey {
    Rule(String),
    Conditional(Condition),
    Group(String),
}

/// One node of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node stands for.
    pub kind: NodeKind,
    /// The parent; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Declarations, comments and carried at-rules, in insertion order.
    pub entries: Vec<Entry>,
    /// Child nodes, in creation order until the tree is linearized.
    pub children: Vec<NodeId>,
    index: HashMap<ChildKey, NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            entries: Vec::new(),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Iterate over the node's own declarations.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Declaration(decl) => Some(decl),
            Entry::Comment(_) | Entry::AtRule(_) => None,
        })
    }
}

/// Arena of nested rule nodes.
#[derive(Debug, Clone)]
pub struct NestTree {
    nodes: Vec<Node>,
    /// Comments after the last rule of the document.
    trailing: Vec<String>,
}

impl Default for NestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NestTree {
    /// Create a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, None)],
            trailing: Vec::new(),
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from creation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    /// The children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// The entries of a node.
    #[must_use]
    pub fn entries(&self, id: NodeId) -> &[Entry] {
        self.get(id).map_or(&[], |node| node.entries.as_slice())
    }

    /// Return the rule child of `parent` with this selector, creating it if
    /// absent.
    pub fn ensure_rule(&mut self, parent: NodeId, selector: &str) -> NodeId {
        self.ensure(parent, ChildKey::Rule(selector.to_string()), || NodeKind::Rule {
            selector: selector.to_string(),
        })
    }

    /// Return the conditional child of `parent` for this condition, creating
    /// it if absent.
    pub fn ensure_conditional(&mut self, parent: NodeId, condition: &Condition) -> NodeId {
        self.ensure(parent, ChildKey::Conditional(condition.clone()), || {
            NodeKind::Conditional(condition.clone())
        })
    }

    /// Return the property group child of `parent` for this prefix, creating
    /// it if absent.
    pub fn ensure_group(&mut self, parent: NodeId, prefix: &str) -> NodeId {
        self.ensure(parent, ChildKey::Group(prefix.to_string()), || NodeKind::PropertyGroup {
            prefix: prefix.to_string(),
        })
    }

    /// Walk `steps` from `parent`, reusing or creating a rule node per step,
    /// and return the last one.
    pub fn ensure_path(&mut self, parent: NodeId, steps: &[String]) -> NodeId {
        steps
            .iter()
            .fold(parent, |node, step| self.ensure_rule(node, step))
    }

    /// Append an entry to a node.
    pub fn push_entry(&mut self, id: NodeId, entry: Entry) {
        if let Some(node) = self.get_mut(id) {
            node.entries.push(entry);
        }
    }

    /// Add a comment that follows everything else in the document.
    pub fn push_trailing_comment(&mut self, text: impl Into<String>) {
        self.trailing.push(text.into());
    }

    /// Comments that follow everything else in the document.
    #[must_use]
    pub fn trailing_comments(&self) -> &[String] {
        &self.trailing
    }

    /// All node ids in document order (pre-order, children in their current
    /// order).
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Every declaration in the tree, in document order.
    #[must_use]
    pub fn declarations(&self) -> Vec<&Declaration> {
        self.preorder()
            .into_iter()
            .filter_map(|id| self.get(id))
            .flat_map(Node::declarations)
            .collect()
    }

    fn ensure(
        &mut self,
        parent: NodeId,
        key: ChildKey,
        make: impl FnOnce() -> NodeKind,
    ) -> NodeId {
        if let Some(&existing) = self.nodes[parent.0].index.get(&key) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(make(), Some(parent)));
        let node = &mut self.nodes[parent.0];
        node.children.push(id);
        let _ = node.index.insert(key, id);
        id
    }
}
