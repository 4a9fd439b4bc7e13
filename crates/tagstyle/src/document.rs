/*
 * document.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * A host document's stylesheets with their region state.
 */

use std::sync::Arc;

use tagstyle_css::{Document, Node, Root};
use tagstyle_host::HostAst;

use crate::parse::Warning;
use crate::state::{ExtractedStylesheetState, StateTable};
use crate::stringify::stringify_document;

/// The stylesheets of one host document, with what is needed to print them
/// back into it.
#[derive(Debug, Clone)]
pub struct StyledDocument {
    document: Document,
    states: StateTable,
    warnings: Vec<Warning>,
    id: String,
    ast: Arc<HostAst>,
}

impl StyledDocument {
    pub(crate) fn new(
        document: Document,
        states: StateTable,
        warnings: Vec<Warning>,
        id: String,
        ast: Arc<HostAst>,
    ) -> Self {
        StyledDocument {
            document,
            states,
            warnings,
            id,
            ast,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parsed host document.
    pub fn ast(&self) -> &Arc<HostAst> {
        &self.ast
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// One root per parsed region, in the order of their opening backticks.
    pub fn roots(&self) -> &[Root] {
        &self.document.nodes
    }

    pub fn roots_mut(&mut self) -> &mut Vec<Root> {
        &mut self.document.nodes
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateTable {
        &mut self.states
    }

    pub fn state(&self, root: &Root) -> Option<&ExtractedStylesheetState> {
        self.states.get(root.id)
    }

    /// Roots of templates that are not inside another template.
    pub fn top_level_roots(&self) -> impl Iterator<Item = &Root> + '_ {
        self.roots()
            .iter()
            .filter(|root| self.state(root).is_none_or(|state| !state.nested))
    }

    /// Roots of templates whose innermost enclosing template is `outer`.
    pub fn nested_roots<'d>(&'d self, outer: &Root) -> impl Iterator<Item = &'d Root> + 'd {
        let outer = outer.id;
        self.roots().iter().filter(move |root| {
            self.state(root)
                .is_some_and(|state| state.enclosing == Some(outer))
        })
    }

    /// Visit the nodes of `root` in document order. The nodes of a template
    /// nested in it follow the innermost node holding its interpolation, one
    /// level deeper, and so on for templates nested in those.
    pub fn walk_with_nested<F>(&self, root: &Root, visitor: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        self.walk_nested(root, 0, visitor);
    }

    fn walk_nested<F>(&self, root: &Root, depth: usize, visitor: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        let mut inner = self.nested_roots(root).collect::<Vec<_>>();
        self.walk_holding(&root.nodes, depth, &mut inner, visitor);
        // Interpolations outside every node.
        for root in inner {
            self.walk_nested(root, depth, visitor);
        }
    }

    fn walk_holding<'d, F>(
        &'d self,
        nodes: &[Node],
        depth: usize,
        inner: &mut Vec<&'d Root>,
        visitor: &mut F,
    ) where
        F: FnMut(&Node, usize),
    {
        for node in nodes {
            visitor(node, depth);
            if let Some(children) = node.children() {
                self.walk_holding(children, depth + 1, inner, visitor);
            }
            let (held, rest) = inner.drain(..).partition::<Vec<_>, _>(|root| {
                self.state(root)
                    .is_some_and(|state| holds(node, state.region.open().offset))
            });
            *inner = rest;
            for root in held {
                self.walk_nested(root, depth + 1, visitor);
            }
        }
    }

    /// Print the document back as host source.
    pub fn to_host_string(&self) -> String {
        stringify_document(&self.document, &self.states, &self.id)
    }
}

fn holds(node: &Node, offset: usize) -> bool {
    let source = node.source();
    matches!(
        (source.start, source.end),
        (Some(start), Some(end)) if start.offset <= offset && offset <= end.offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SyntaxOptions;
    use crate::parse::parse_styles;
    use pretty_assertions::assert_eq;

    fn walked(source: &str) -> Vec<(String, usize)> {
        let document =
            parse_styles(source, &SyntaxOptions::new("lit").with_tags(["css"])).unwrap();
        let outer = document.top_level_roots().next().unwrap();
        let mut seen = Vec::new();
        document.walk_with_nested(outer, &mut |node: &Node, depth| {
            let name = match node {
                Node::Rule(rule) => rule.selector.clone(),
                Node::Decl(decl) => decl.prop.clone(),
                Node::Comment(comment) => format!("/* {} */", comment.text),
                Node::AtRule(at_rule) => format!("@{}", at_rule.name),
            };
            seen.push((name, depth));
        });
        seen
    }

    #[test]
    fn test_nested_template_follows_its_placeholder() {
        assert_eq!(
            walked("const a = css`.a { ${css`.b { color: red; }`} top: 0; }`;"),
            vec![
                (".a".to_string(), 0),
                ("/* POSTCSS_lit_0 */".to_string(), 1),
                (".b".to_string(), 2),
                ("color".to_string(), 3),
                ("top".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_walk_without_nested_templates() {
        assert_eq!(
            walked("const a = css`.a { top: 0; }`;"),
            vec![(".a".to_string(), 0), ("top".to_string(), 1)]
        );
    }
}
