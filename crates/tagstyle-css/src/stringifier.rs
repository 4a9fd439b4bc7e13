/*
 * stringifier.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Printing stylesheet trees, with overridable hooks.
 */

//! Turning a node tree back into text.
//!
//! [`Stringifier`] is a set of hooks, one per node kind plus the raw-value
//! lookups. Each hook has a default implementation that forwards to the
//! free function of the same name in this module, so an implementation can
//! override a hook and still call the default behaviour:
//!
//! ```rust
//! use tagstyle_css::stringifier::{self, Context, Stringifier};
//! use tagstyle_css::{NodeRef, RawKind};
//!
//! struct Shouting(String);
//!
//! impl Stringifier for Shouting {
//!     fn output(&mut self) -> &mut String {
//!         &mut self.0
//!     }
//!
//!     fn raw_value(&mut self, node: NodeRef<'_>, kind: RawKind) -> String {
//!         stringifier::raw_value(self, node, kind).to_uppercase()
//!     }
//! }
//! ```
//!
//! Raws missing from a node (for instance on nodes built by hand) are
//! guessed from other nodes of the same root, and fall back to fixed
//! defaults when no node carries an example.

use crate::node::{
    AtRule, Comment, Declaration, Document, Node, NodeKind, NodeRef, RawKind, Raws, Root, Rule,
};

/// Which side of a block a chunk of output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// A string raw a node may carry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Before,
    After,
    Between,
    Left,
    Right,
}

impl Slot {
    pub fn get(self, raws: &Raws) -> Option<&str> {
        match self {
            Slot::Before => raws.before.as_deref(),
            Slot::After => raws.after.as_deref(),
            Slot::Between => raws.between.as_deref(),
            Slot::Left => raws.left.as_deref(),
            Slot::Right => raws.right.as_deref(),
        }
    }

    pub fn raw_kind(self) -> Option<RawKind> {
        match self {
            Slot::Before => Some(RawKind::Before),
            Slot::After => Some(RawKind::After),
            Slot::Between => Some(RawKind::Between),
            Slot::Left | Slot::Right => None,
        }
    }
}

/// What to guess when a node lacks its own raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detect {
    Before,
    After,
    BeforeDecl,
    BeforeRule,
    BeforeComment,
    BeforeClose,
    BeforeOpen,
    Colon,
    EmptyBody,
    CommentLeft,
    CommentRight,
    Indent,
}

impl Detect {
    fn default_raw(self) -> &'static str {
        match self {
            Detect::After
            | Detect::BeforeClose
            | Detect::BeforeComment
            | Detect::BeforeDecl
            | Detect::BeforeRule
            | Detect::Before => "\n",
            Detect::BeforeOpen => " ",
            Detect::Colon => ": ",
            Detect::CommentLeft | Detect::CommentRight => " ",
            Detect::EmptyBody => "",
            Detect::Indent => "    ",
        }
    }
}

/// Where a node sits in the tree being printed.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The root the node belongs to; a root is its own root.
    pub root: Option<&'a Root>,
    pub parent: Option<NodeRef<'a>>,
    /// Position among the parent's children.
    pub index: usize,
    /// Number of ancestors between the node and its root.
    pub depth: usize,
}

impl<'a> Context<'a> {
    /// Context of a node printed on its own.
    pub fn detached() -> Self {
        Context {
            root: None,
            parent: None,
            index: 0,
            depth: 0,
        }
    }

    /// Context of a root printed on its own.
    pub fn for_root(root: &'a Root) -> Self {
        Context {
            root: Some(root),
            ..Context::detached()
        }
    }

    /// Context of the `index`th child of `parent`, whose context is `self`.
    pub fn child(&self, parent: NodeRef<'a>, index: usize) -> Context<'a> {
        match parent {
            NodeRef::Root(root) => Context {
                root: Some(root),
                parent: Some(parent),
                index,
                depth: 0,
            },
            _ => Context {
                root: self.root,
                parent: Some(parent),
                index,
                depth: self.depth + 1,
            },
        }
    }
}

/// Hooks for printing a node tree. See the module documentation.
pub trait Stringifier {
    /// The buffer that [`Stringifier::emit`] appends to.
    fn output(&mut self) -> &mut String;

    /// Append a chunk of output. `node` is the node the chunk belongs to, or
    /// `None` for whitespace between nodes.
    fn emit(&mut self, text: &str, node: Option<NodeRef<'_>>, edge: Option<Edge>) {
        let _ = (node, edge);
        self.output().push_str(text);
    }

    fn document(&mut self, node: &Document) {
        document(self, node);
    }

    fn root<'a>(&mut self, node: &'a Root, cx: &Context<'a>) {
        root(self, node, cx);
    }

    fn rule<'a>(&mut self, node: &'a Rule, cx: &Context<'a>) {
        rule(self, node, cx);
    }

    fn at_rule<'a>(&mut self, node: &'a AtRule, cx: &Context<'a>, semicolon: bool) {
        at_rule(self, node, cx, semicolon);
    }

    fn decl<'a>(&mut self, node: &'a Declaration, cx: &Context<'a>, semicolon: bool) {
        decl(self, node, cx, semicolon);
    }

    fn comment<'a>(&mut self, node: &'a Comment, cx: &Context<'a>) {
        comment(self, node, cx);
    }

    fn body<'a>(&mut self, node: NodeRef<'a>, nodes: &'a [Node], cx: &Context<'a>) {
        body(self, node, nodes, cx);
    }

    fn block<'a>(&mut self, node: NodeRef<'a>, nodes: &'a [Node], start: &str, cx: &Context<'a>) {
        block(self, node, nodes, start, cx);
    }

    /// The raw text for `own`, or a guess according to `detect`.
    fn raw<'a>(
        &mut self,
        node: NodeRef<'a>,
        cx: &Context<'a>,
        own: Option<Slot>,
        detect: Detect,
    ) -> String {
        raw(self, node, cx, own, detect)
    }

    fn raw_semicolon<'a>(&mut self, node: NodeRef<'a>, cx: &Context<'a>) -> bool {
        raw_semicolon(self, node, cx)
    }

    /// The text to print for a node's selector, value or params.
    fn raw_value(&mut self, node: NodeRef<'_>, kind: RawKind) -> String {
        raw_value(self, node, kind)
    }
}

/// Print a child node, dispatching on its kind.
pub fn stringify<'a, S>(s: &mut S, node: &'a Node, cx: &Context<'a>, semicolon: bool)
where
    S: Stringifier + ?Sized,
{
    match node {
        Node::Rule(n) => s.rule(n, cx),
        Node::AtRule(n) => s.at_rule(n, cx, semicolon),
        Node::Decl(n) => s.decl(n, cx, semicolon),
        Node::Comment(n) => s.comment(n, cx),
    }
}

pub fn document<S>(s: &mut S, node: &Document)
where
    S: Stringifier + ?Sized,
{
    let parent = NodeRef::Document(node);
    for (index, child) in node.nodes.iter().enumerate() {
        let cx = Context {
            root: Some(child),
            parent: Some(parent),
            index,
            depth: 0,
        };
        let before = s.raw(NodeRef::Root(child), &cx, Some(Slot::Before), Detect::Before);
        if !before.is_empty() {
            s.emit(&before, None, None);
        }
        s.root(child, &cx);
    }
}

pub fn root<'a, S>(s: &mut S, node: &'a Root, cx: &Context<'a>)
where
    S: Stringifier + ?Sized,
{
    s.body(NodeRef::Root(node), &node.nodes, cx);
    if let Some(after) = node.raws.after.as_deref().filter(|a| !a.is_empty()) {
        s.emit(after, None, None);
    }
}

pub fn rule<'a, S>(s: &mut S, node: &'a Rule, cx: &Context<'a>)
where
    S: Stringifier + ?Sized,
{
    let this = NodeRef::Rule(node);
    let selector = s.raw_value(this, RawKind::Selector);
    s.block(this, &node.nodes, &selector, cx);
    if let Some(own) = node.raws.own_semicolon.as_deref().filter(|o| !o.is_empty()) {
        s.emit(own, Some(this), Some(Edge::End));
    }
}

pub fn at_rule<'a, S>(s: &mut S, node: &'a AtRule, cx: &Context<'a>, semicolon: bool)
where
    S: Stringifier + ?Sized,
{
    let this = NodeRef::AtRule(node);
    let mut name = format!("@{}", node.name);
    let params = if node.params.is_empty() {
        String::new()
    } else {
        s.raw_value(this, RawKind::Params)
    };
    match node.raws.after_name.as_deref() {
        Some(after_name) => name.push_str(after_name),
        None if !params.is_empty() => name.push(' '),
        None => {}
    }

    match node.nodes.as_deref() {
        Some(nodes) => s.block(this, nodes, &(name + &params), cx),
        None => {
            let between = node.raws.between.as_deref().unwrap_or("");
            let end = if semicolon { ";" } else { "" };
            s.emit(&format!("{name}{params}{between}{end}"), Some(this), None);
        }
    }
}

pub fn decl<'a, S>(s: &mut S, node: &'a Declaration, cx: &Context<'a>, semicolon: bool)
where
    S: Stringifier + ?Sized,
{
    let this = NodeRef::Decl(node);
    let between = s.raw(this, cx, Some(Slot::Between), Detect::Colon);
    let mut string = format!("{}{}{}", node.prop, between, s.raw_value(this, RawKind::Value));
    if node.important {
        string.push_str(node.raws.important.as_deref().unwrap_or(" !important"));
    }
    if semicolon {
        string.push(';');
    }
    s.emit(&string, Some(this), None);
}

pub fn comment<'a, S>(s: &mut S, node: &'a Comment, cx: &Context<'a>)
where
    S: Stringifier + ?Sized,
{
    let this = NodeRef::Comment(node);
    let left = s.raw(this, cx, Some(Slot::Left), Detect::CommentLeft);
    let right = s.raw(this, cx, Some(Slot::Right), Detect::CommentRight);
    s.emit(&format!("/*{}{}{}*/", left, node.text, right), Some(this), None);
}

pub fn body<'a, S>(s: &mut S, node: NodeRef<'a>, nodes: &'a [Node], cx: &Context<'a>)
where
    S: Stringifier + ?Sized,
{
    let mut last = nodes.len().saturating_sub(1);
    while last > 0 && nodes[last].kind() == NodeKind::Comment {
        last -= 1;
    }

    let semicolon = s.raw_semicolon(node, cx);
    for (i, child) in nodes.iter().enumerate() {
        let child_cx = cx.child(node, i);
        let before = s.raw(child.as_ref(), &child_cx, Some(Slot::Before), Detect::Before);
        if !before.is_empty() {
            s.emit(&before, None, None);
        }
        stringify(s, child, &child_cx, last != i || semicolon);
    }
}

pub fn block<'a, S>(s: &mut S, node: NodeRef<'a>, nodes: &'a [Node], start: &str, cx: &Context<'a>)
where
    S: Stringifier + ?Sized,
{
    let between = s.raw(node, cx, Some(Slot::Between), Detect::BeforeOpen);
    s.emit(&format!("{start}{between}{{"), Some(node), Some(Edge::Start));

    let after = if nodes.is_empty() {
        s.raw(node, cx, Some(Slot::After), Detect::EmptyBody)
    } else {
        s.body(node, nodes, cx);
        s.raw(node, cx, Some(Slot::After), Detect::After)
    };
    if !after.is_empty() {
        s.emit(&after, None, None);
    }
    s.emit("}", Some(node), Some(Edge::End));
}

fn root_of<'a>(node: NodeRef<'a>, cx: &Context<'a>) -> Option<&'a Root> {
    match node {
        NodeRef::Root(root) => Some(root),
        _ => cx.root,
    }
}

pub fn raw<'a, S>(
    s: &mut S,
    node: NodeRef<'a>,
    cx: &Context<'a>,
    own: Option<Slot>,
    detect: Detect,
) -> String
where
    S: Stringifier + ?Sized,
{
    if let Some(value) = own.and_then(|slot| slot.get(node.raws())) {
        return value.to_string();
    }

    if detect == Detect::Before {
        match cx.parent {
            None | Some(NodeRef::Document(_)) => return String::new(),
            Some(NodeRef::Root(_)) if cx.index == 0 => return String::new(),
            _ => {}
        }
    }

    let (Some(_), Some(root)) = (cx.parent, root_of(node, cx)) else {
        return detect.default_raw().to_string();
    };

    match detect {
        Detect::Before | Detect::After => before_after(s, node, cx, detect),
        _ => detect_raw(s, root, node, cx, own, detect)
            .unwrap_or_else(|| detect.default_raw().to_string()),
    }
}

fn before_after<'a, S>(s: &mut S, node: NodeRef<'a>, cx: &Context<'a>, detect: Detect) -> String
where
    S: Stringifier + ?Sized,
{
    let guess = match node.kind() {
        NodeKind::Decl => Detect::BeforeDecl,
        NodeKind::Comment => Detect::BeforeComment,
        _ if detect == Detect::Before => Detect::BeforeRule,
        _ => Detect::BeforeClose,
    };
    let mut value = s.raw(node, cx, None, guess);

    if value.contains('\n') {
        let indent = s.raw(node, cx, None, Detect::Indent);
        for _ in 0..cx.depth {
            value.push_str(&indent);
        }
    }
    value
}

/// A descendant of a root, with its depth and position among its siblings.
struct Walked<'a> {
    node: &'a Node,
    depth: usize,
    index: usize,
}

fn flatten<'a>(nodes: &'a [Node], depth: usize, out: &mut Vec<Walked<'a>>) {
    for (index, node) in nodes.iter().enumerate() {
        out.push(Walked { node, depth, index });
        if let Some(children) = node.children() {
            flatten(children, depth + 1, out);
        }
    }
}

/// Drop a trailing partial line, then everything but whitespace.
fn whitespace_of(value: &str, trim_last_line: bool) -> String {
    let value = match value.rfind('\n') {
        Some(pos) if trim_last_line => &value[..=pos],
        _ => value,
    };
    value.chars().filter(|c| c.is_whitespace()).collect()
}

fn detect_raw<'a, S>(
    s: &mut S,
    root: &'a Root,
    node: NodeRef<'a>,
    cx: &Context<'a>,
    own: Option<Slot>,
    detect: Detect,
) -> Option<String>
where
    S: Stringifier + ?Sized,
{
    let mut walked = Vec::new();
    flatten(&root.nodes, 0, &mut walked);
    let is_container = |n: &Node| n.children().is_some();

    match detect {
        Detect::BeforeClose => walked
            .iter()
            .filter(|w| w.node.children().is_some_and(|c| !c.is_empty()))
            .find_map(|w| w.node.raws().after.as_deref())
            .map(|after| whitespace_of(after, true)),
        Detect::BeforeComment => {
            let found = walked
                .iter()
                .filter(|w| w.node.kind() == NodeKind::Comment)
                .find_map(|w| w.node.raws().before.as_deref());
            match found {
                Some(before) => Some(whitespace_of(before, true)),
                None => Some(s.raw(node, cx, None, Detect::BeforeDecl)),
            }
        }
        Detect::BeforeDecl => {
            let found = walked
                .iter()
                .filter(|w| w.node.kind() == NodeKind::Decl)
                .find_map(|w| w.node.raws().before.as_deref());
            match found {
                Some(before) => Some(whitespace_of(before, true)),
                None => Some(s.raw(node, cx, None, Detect::BeforeRule)),
            }
        }
        Detect::BeforeOpen => walked
            .iter()
            .filter(|w| w.node.kind() != NodeKind::Decl)
            .find_map(|w| w.node.raws().between.clone()),
        Detect::BeforeRule => walked
            .iter()
            .filter(|w| is_container(w.node) && !(w.depth == 0 && w.index == 0))
            .find_map(|w| w.node.raws().before.as_deref())
            .map(|before| whitespace_of(before, true)),
        Detect::Colon => walked
            .iter()
            .filter(|w| w.node.kind() == NodeKind::Decl)
            .find_map(|w| w.node.raws().between.as_deref())
            .map(|between| {
                between
                    .chars()
                    .filter(|c| c.is_whitespace() || *c == ':')
                    .collect()
            }),
        Detect::EmptyBody => walked
            .iter()
            .filter(|w| w.node.children().is_some_and(<[Node]>::is_empty))
            .find_map(|w| w.node.raws().after.clone()),
        Detect::Indent => walked
            .iter()
            .filter(|w| w.depth == 1)
            .find_map(|w| w.node.raws().before.as_deref())
            .map(|before| {
                let last_line = before.rsplit('\n').next().unwrap_or("");
                whitespace_of(last_line, false)
            }),
        Detect::CommentLeft | Detect::CommentRight => {
            let slot = own?;
            walked
                .iter()
                .find_map(|w| slot.get(w.node.raws()).map(str::to_string))
        }
        Detect::Before | Detect::After => None,
    }
}

pub fn raw_semicolon<'a, S>(_s: &mut S, node: NodeRef<'a>, cx: &Context<'a>) -> bool
where
    S: Stringifier + ?Sized,
{
    if let Some(semicolon) = node.raws().semicolon {
        return semicolon;
    }
    let (Some(_), Some(root)) = (cx.parent, root_of(node, cx)) else {
        return false;
    };

    let mut walked = Vec::new();
    flatten(&root.nodes, 0, &mut walked);
    walked
        .iter()
        .filter(|w| {
            w.node
                .children()
                .and_then(<[Node]>::last)
                .is_some_and(|last| last.kind() == NodeKind::Decl)
        })
        .find_map(|w| w.node.raws().semicolon)
        .unwrap_or(false)
}

pub fn raw_value<S>(_s: &mut S, node: NodeRef<'_>, kind: RawKind) -> String
where
    S: Stringifier + ?Sized,
{
    let value = node.value_of(kind).unwrap_or("");
    let raw = match kind {
        RawKind::Selector => node.raws().selector.as_ref(),
        RawKind::Value => node.raws().value.as_ref(),
        RawKind::Params => node.raws().params.as_ref(),
        _ => None,
    };
    match raw {
        Some(raw) if raw.value == value => raw.raw.clone(),
        _ => value.to_string(),
    }
}

/// A [`Stringifier`] with every hook left at its default.
#[derive(Debug, Default)]
pub struct DefaultStringifier {
    out: String,
}

impl DefaultStringifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Stringifier for DefaultStringifier {
    fn output(&mut self) -> &mut String {
        &mut self.out
    }
}

/// Print a root with the default hooks.
pub fn root_to_string(node: &Root) -> String {
    let mut s = DefaultStringifier::new();
    s.root(node, &Context::for_root(node));
    s.finish()
}

/// Print a document with the default hooks.
pub fn document_to_string(node: &Document) -> String {
    let mut s = DefaultStringifier::new();
    s.document(node);
    s.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse};
    use pretty_assertions::assert_eq;

    fn roundtrip(css: &str) {
        let root = parse(css, &ParseOptions::default()).unwrap();
        assert_eq!(root_to_string(&root), css);
    }

    #[test]
    fn test_roundtrip_preserves_formatting() {
        roundtrip("");
        roundtrip("  \n");
        roundtrip(".foo { color: hotpink; }");
        roundtrip(".foo {\n  color: red;\n  margin: 0\n}\n\n.bar{top:0}");
        roundtrip("@import 'a.css';\n@media (min-width: 10px) {\n  a { b: c !important }\n}\n");
        roundtrip("/* lead */\na , b /* x */ {\n  color: red /* y */ ;\n}\n");
        roundtrip(":root { --x: { a: b }; }\na {};\n");
        roundtrip("@font-face{font-family:x}");
        roundtrip(".a { /* POSTCSS_foo_0 */ }");
    }

    #[test]
    fn test_defaults_for_built_nodes() {
        let root = Root {
            nodes: vec![Node::Rule(Rule {
                selector: "a".to_string(),
                nodes: vec![Node::Decl(Declaration {
                    prop: "color".to_string(),
                    value: "red".to_string(),
                    ..Default::default()
                })],
                ..Default::default()
            })],
            ..Default::default()
        };
        assert_eq!(root_to_string(&root), "a {\n    color: red\n}");
    }

    #[test]
    fn test_new_nodes_follow_existing_style() {
        let mut root = parse("a{\n  color:red;\n}", &ParseOptions::default()).unwrap();
        if let Some(children) = root.nodes[0].children_mut() {
            children.push(Node::Decl(Declaration {
                prop: "top".to_string(),
                value: "0".to_string(),
                ..Default::default()
            }));
        }
        assert_eq!(root_to_string(&root), "a{\n  color:red;\n  top:0;\n}");
    }

    #[test]
    fn test_changed_value_drops_raw() {
        let mut root = parse("a { margin: 1px /* c */ 2px }", &ParseOptions::default()).unwrap();
        root.walk_mut(&mut |node, _| {
            if let Node::Decl(decl) = node {
                decl.value = "0".to_string();
            }
        });
        assert_eq!(root_to_string(&root), "a { margin: 0 }");
    }

    #[test]
    fn test_document_joins_roots() {
        let first = parse("a{}", &ParseOptions::default()).unwrap();
        let mut second = parse("b{}", &ParseOptions::default()).unwrap();
        second.raws.before = Some("\n".to_string());
        let doc = Document {
            nodes: vec![first, second],
            ..Default::default()
        };
        assert_eq!(document_to_string(&doc), "a{}\nb{}");
    }

    struct Upper(String);

    impl Stringifier for Upper {
        fn output(&mut self) -> &mut String {
            &mut self.0
        }

        fn raw_value(&mut self, node: NodeRef<'_>, kind: RawKind) -> String {
            raw_value(self, node, kind).to_uppercase()
        }
    }

    #[test]
    fn test_overridden_hook_calls_default() {
        let root = parse("a { color: red; }", &ParseOptions::default()).unwrap();
        let mut s = Upper(String::new());
        s.root(&root, &Context::for_root(&root));
        assert_eq!(s.0, "A { color: RED; }");
    }
}
