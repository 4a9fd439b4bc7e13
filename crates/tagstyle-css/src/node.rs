/*
 * node.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Stylesheet nodes and the formatting recorded on them.
 */

//! Stylesheet node tree.
//!
//! Every node keeps the formatting it was parsed with in its [`Raws`], so
//! that stringifying an unmodified tree reproduces the input exactly.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tagstyle_source_map::Position;

static NEXT_ROOT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Root`], stable across mutation of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootId(u64);

impl RootId {
    pub fn fresh() -> Self {
        RootId(NEXT_ROOT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Start and end of a node. `end` points at the node's last byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeSource {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl NodeSource {
    pub fn starting_at(start: Position) -> Self {
        NodeSource {
            start: Some(start),
            end: None,
        }
    }
}

/// Raw kinds that may carry an additional namespaced variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawKind {
    Before,
    After,
    Between,
    Selector,
    Value,
    Params,
}

impl RawKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawKind::Before => "before",
            RawKind::After => "after",
            RawKind::Between => "between",
            RawKind::Selector => "selector",
            RawKind::Value => "value",
            RawKind::Params => "params",
        }
    }
}

/// The original text of a value whose cleaned form differs from its source
/// (for instance when comments were dropped from a selector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub raw: String,
}

/// Formatting preserved for a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Whitespace (and stray semicolons) before the node.
    pub before: Option<String>,
    /// Whitespace after the last child, before the closing brace.
    pub after: Option<String>,
    /// Text between property and value, or between selector/params and `{`.
    pub between: Option<String>,
    /// Whether the last declaration in the block has a semicolon.
    pub semicolon: Option<bool>,
    /// Text between an at-rule's name and its params.
    pub after_name: Option<String>,
    /// Whitespace inside a comment, before the text.
    pub left: Option<String>,
    /// Whitespace inside a comment, after the text.
    pub right: Option<String>,
    /// Exact spelling of `!important`.
    pub important: Option<String>,
    /// A semicolon (plus leading spaces) following a rule.
    pub own_semicolon: Option<String>,
    pub selector: Option<RawValue>,
    pub value: Option<RawValue>,
    pub params: Option<RawValue>,
    /// Text preceding a root when it is embedded in a larger document.
    pub code_before: Option<String>,
    /// Text following a root when it is embedded in a larger document.
    pub code_after: Option<String>,
    namespaced: BTreeMap<(String, RawKind), String>,
}

impl Raws {
    /// A raw stored under `namespace`, distinct from the default slot.
    pub fn namespaced(&self, namespace: &str, kind: RawKind) -> Option<&str> {
        self.namespaced
            .get(&(namespace.to_string(), kind))
            .map(String::as_str)
    }

    pub fn set_namespaced(&mut self, namespace: &str, kind: RawKind, value: String) {
        self.namespaced.insert((namespace.to_string(), kind), value);
    }

    pub fn remove_namespaced(&mut self, namespace: &str, kind: RawKind) -> Option<String> {
        self.namespaced.remove(&(namespace.to_string(), kind))
    }

    /// The default raw text for one of the string-valued kinds.
    pub fn get(&self, kind: RawKind) -> Option<&str> {
        match kind {
            RawKind::Before => self.before.as_deref(),
            RawKind::After => self.after.as_deref(),
            RawKind::Between => self.between.as_deref(),
            RawKind::Selector => self.selector.as_ref().map(|r| r.raw.as_str()),
            RawKind::Value => self.value.as_ref().map(|r| r.raw.as_str()),
            RawKind::Params => self.params.as_ref().map(|r| r.raw.as_str()),
        }
    }
}

/// The text a stylesheet was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub css: String,
    pub file: Option<String>,
}

/// A collection of roots, one per embedded stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Root>,
    pub raws: Raws,
    pub source: NodeSource,
    pub input: Option<Input>,
}

/// A stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub id: RootId,
    pub nodes: Vec<Node>,
    pub raws: Raws,
    pub source: NodeSource,
}

impl Default for Root {
    fn default() -> Self {
        Root {
            id: RootId::fresh(),
            nodes: Vec::new(),
            raws: Raws::default(),
            source: NodeSource::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub raws: Raws,
    pub source: NodeSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules such as `@import x;`.
    pub nodes: Option<Vec<Node>>,
    pub raws: Raws,
    pub source: NodeSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
    pub raws: Raws,
    pub source: NodeSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    pub text: String,
    pub raws: Raws,
    pub source: NodeSource,
}

/// A child of a root or block.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Decl(Declaration),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Root,
    Rule,
    AtRule,
    Decl,
    Comment,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Rule(_) => NodeKind::Rule,
            Node::AtRule(_) => NodeKind::AtRule,
            Node::Decl(_) => NodeKind::Decl,
            Node::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn raws(&self) -> &Raws {
        match self {
            Node::Rule(n) => &n.raws,
            Node::AtRule(n) => &n.raws,
            Node::Decl(n) => &n.raws,
            Node::Comment(n) => &n.raws,
        }
    }

    pub fn raws_mut(&mut self) -> &mut Raws {
        match self {
            Node::Rule(n) => &mut n.raws,
            Node::AtRule(n) => &mut n.raws,
            Node::Decl(n) => &mut n.raws,
            Node::Comment(n) => &mut n.raws,
        }
    }

    pub fn source(&self) -> &NodeSource {
        match self {
            Node::Rule(n) => &n.source,
            Node::AtRule(n) => &n.source,
            Node::Decl(n) => &n.source,
            Node::Comment(n) => &n.source,
        }
    }

    pub fn source_mut(&mut self) -> &mut NodeSource {
        match self {
            Node::Rule(n) => &mut n.source,
            Node::AtRule(n) => &mut n.source,
            Node::Decl(n) => &mut n.source,
            Node::Comment(n) => &mut n.source,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Rule(n) => Some(&n.nodes),
            Node::AtRule(n) => n.nodes.as_deref(),
            Node::Decl(_) | Node::Comment(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(n) => Some(&mut n.nodes),
            Node::AtRule(n) => n.nodes.as_mut(),
            Node::Decl(_) | Node::Comment(_) => None,
        }
    }

    /// The kind of the node's own value (`selector`, `value` or `params`).
    pub fn value_kind(&self) -> Option<RawKind> {
        match self {
            Node::Rule(_) => Some(RawKind::Selector),
            Node::Decl(_) => Some(RawKind::Value),
            Node::AtRule(_) => Some(RawKind::Params),
            Node::Comment(_) => None,
        }
    }

    /// The node's own value for its [`Node::value_kind`].
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Rule(n) => Some(&n.selector),
            Node::Decl(n) => Some(&n.value),
            Node::AtRule(n) => Some(&n.params),
            Node::Comment(_) => None,
        }
    }

    pub fn as_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Rule(n) => NodeRef::Rule(n),
            Node::AtRule(n) => NodeRef::AtRule(n),
            Node::Decl(n) => NodeRef::Decl(n),
            Node::Comment(n) => NodeRef::Comment(n),
        }
    }
}

/// A borrowed node of any kind, including documents and roots.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Root(&'a Root),
    Rule(&'a Rule),
    AtRule(&'a AtRule),
    Decl(&'a Declaration),
    Comment(&'a Comment),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Document(_) => NodeKind::Document,
            NodeRef::Root(_) => NodeKind::Root,
            NodeRef::Rule(_) => NodeKind::Rule,
            NodeRef::AtRule(_) => NodeKind::AtRule,
            NodeRef::Decl(_) => NodeKind::Decl,
            NodeRef::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn raws(&self) -> &'a Raws {
        match self {
            NodeRef::Document(n) => &n.raws,
            NodeRef::Root(n) => &n.raws,
            NodeRef::Rule(n) => &n.raws,
            NodeRef::AtRule(n) => &n.raws,
            NodeRef::Decl(n) => &n.raws,
            NodeRef::Comment(n) => &n.raws,
        }
    }

    pub fn source(&self) -> &'a NodeSource {
        match self {
            NodeRef::Document(n) => &n.source,
            NodeRef::Root(n) => &n.source,
            NodeRef::Rule(n) => &n.source,
            NodeRef::AtRule(n) => &n.source,
            NodeRef::Decl(n) => &n.source,
            NodeRef::Comment(n) => &n.source,
        }
    }

    /// Child nodes of a root or block. Documents hold roots, not nodes.
    pub fn children(&self) -> Option<&'a [Node]> {
        match self {
            NodeRef::Root(n) => Some(&n.nodes),
            NodeRef::Rule(n) => Some(&n.nodes),
            NodeRef::AtRule(n) => n.nodes.as_deref(),
            NodeRef::Document(_) | NodeRef::Decl(_) | NodeRef::Comment(_) => None,
        }
    }

    /// The node's own value for `selector`, `value` or `params`.
    pub fn value_of(&self, kind: RawKind) -> Option<&'a str> {
        match (self, kind) {
            (NodeRef::Rule(n), RawKind::Selector) => Some(&n.selector),
            (NodeRef::Decl(n), RawKind::Value) => Some(&n.value),
            (NodeRef::AtRule(n), RawKind::Params) => Some(&n.params),
            _ => None,
        }
    }
}

impl Root {
    /// Visit every descendant in document order, parents before children.
    /// The second argument is the depth, `0` for direct children of the root.
    pub fn walk<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        walk_nodes(&self.nodes, 0, visitor);
    }

    pub fn walk_mut<F>(&mut self, visitor: &mut F)
    where
        F: FnMut(&mut Node, usize),
    {
        walk_nodes_mut(&mut self.nodes, 0, visitor);
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.nodes.last()
    }
}

fn walk_nodes<F>(nodes: &[Node], depth: usize, visitor: &mut F)
where
    F: FnMut(&Node, usize),
{
    for node in nodes {
        visitor(node, depth);
        if let Some(children) = node.children() {
            walk_nodes(children, depth + 1, visitor);
        }
    }
}

fn walk_nodes_mut<F>(nodes: &mut [Node], depth: usize, visitor: &mut F)
where
    F: FnMut(&mut Node, usize),
{
    for node in nodes.iter_mut() {
        visitor(node, depth);
        if let Some(children) = node.children_mut() {
            walk_nodes_mut(children, depth + 1, visitor);
        }
    }
}
