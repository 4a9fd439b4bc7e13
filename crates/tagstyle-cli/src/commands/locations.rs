/*
 * locations.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * The `locations` command: stylesheet nodes with host positions.
 */

use anyhow::Result;
use serde::Serialize;
use tagstyle::Syntax;
use tagstyle_css::{Node, Root};
use tagstyle_source_map::Position;

use super::{print_json, read_input};
use crate::SyntaxArgs;
use crate::config::resolve_options;

#[derive(Debug, Serialize, PartialEq)]
struct NodeLocation {
    kind: &'static str,
    /// Selector, property, at-rule name or comment text.
    name: String,
    depth: usize,
    start: Option<Position>,
    end: Option<Position>,
}

#[derive(Serialize)]
struct RootLocations {
    tag: String,
    nested: bool,
    start: Option<Position>,
    nodes: Vec<NodeLocation>,
}

#[derive(Serialize)]
struct LocationsReport {
    file: String,
    roots: Vec<RootLocations>,
}

fn describe(node: &Node) -> (&'static str, String) {
    match node {
        Node::Rule(rule) => ("rule", rule.selector.clone()),
        Node::AtRule(at) => ("atrule", format!("@{}", at.name)),
        Node::Decl(decl) => ("decl", decl.prop.clone()),
        Node::Comment(comment) => ("comment", comment.text.clone()),
    }
}

fn node_locations(root: &Root) -> Vec<NodeLocation> {
    let mut nodes = Vec::new();
    root.walk(&mut |node, depth| {
        let (kind, name) = describe(node);
        nodes.push(NodeLocation {
            kind,
            name,
            depth,
            start: node.source().start,
            end: node.source().end,
        });
    });
    nodes
}

pub fn execute(args: &SyntaxArgs) -> Result<()> {
    let syntax = Syntax::new(resolve_options(args)?);
    let source = read_input(&args.input)?;
    let document = syntax.parse(&source)?;

    let roots = document
        .roots()
        .iter()
        .map(|root| {
            let state = document.state(root);
            RootLocations {
                tag: state.map(|s| s.region.tag.clone()).unwrap_or_default(),
                nested: state.is_some_and(|s| s.nested),
                start: root.source.start,
                nodes: node_locations(root),
            }
        })
        .collect();

    print_json(
        &LocationsReport {
            file: args.input.display().to_string(),
            roots,
        },
        args.compact,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagstyle::SyntaxOptions;

    #[test]
    fn test_node_locations_are_host_positions() {
        let syntax = Syntax::new(SyntaxOptions::new("lit").with_tags(["css"]));
        let document = syntax.parse("x = css`a { b: c; }`").unwrap();
        let nodes = node_locations(&document.roots()[0]);
        assert_eq!(
            nodes,
            vec![
                NodeLocation {
                    kind: "rule",
                    name: "a".to_string(),
                    depth: 0,
                    start: Some(Position::new(1, 9, 8)),
                    end: Some(Position::new(1, 19, 18)),
                },
                NodeLocation {
                    kind: "decl",
                    name: "b".to_string(),
                    depth: 1,
                    start: Some(Position::new(1, 13, 12)),
                    end: Some(Position::new(1, 17, 16)),
                },
            ]
        );
    }
}
