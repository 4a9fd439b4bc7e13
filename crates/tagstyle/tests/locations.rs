/*
 * locations.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Node positions mapped into host coordinates.
 */

use pretty_assertions::assert_eq;
use tagstyle::{StyledDocument, Syntax, SyntaxOptions};
use tagstyle_css::Node;
use tagstyle_source_map::{LineIndex, Position};

fn parse(source: &str) -> StyledDocument {
    Syntax::new(SyntaxOptions::new("lit").with_tags(["css"]))
        .parse(source)
        .unwrap()
}

/// Every start and end, in document order.
fn positions(document: &StyledDocument) -> Vec<(Position, Option<Position>)> {
    let mut out = Vec::new();
    for root in document.roots() {
        if let Some(start) = root.source.start {
            out.push((start, None));
        }
        root.walk(&mut |node: &Node, _| {
            if let Some(start) = node.source().start {
                out.push((start, node.source().end));
            }
        });
    }
    out
}

/// Line and column of each corrected position agree with its offset.
fn assert_consistent(source: &str) {
    let document = parse(source);
    let index = LineIndex::new(source);
    let all = positions(&document);
    assert!(!all.is_empty());
    for (start, end) in all {
        assert_eq!(index.position(start.offset), Some(start));
        if let Some(end) = end {
            assert_eq!(index.position(end.offset), Some(end));
        }
    }
}

fn text_at(source: &str, position: Position) -> &str {
    &source[position.offset..]
}

#[test]
fn test_single_line_template() {
    let source = "const a = css`.foo { color: hotpink; }`;";
    let document = parse(source);
    let rule = &document.roots()[0].nodes[0];
    let start = rule.source().start.unwrap();
    assert_eq!(start, Position::new(1, 15, 14));
    assert!(text_at(source, start).starts_with(".foo"));
    assert_consistent(source);
}

#[test]
fn test_interpolation_shifts_following_positions() {
    let source = "css`.foo { padding: ${expr}; margin: 0; }`";
    let document = parse(source);
    let Node::Rule(rule) = &document.roots()[0].nodes[0] else {
        panic!("expected a rule");
    };
    let padding = rule.nodes[0].source();
    assert_eq!(padding.start, Some(Position::new(1, 12, 11)));
    assert_eq!(padding.end, Some(Position::new(1, 28, 27)));
    let margin = rule.nodes[1].source().start.unwrap();
    assert!(text_at(source, margin).starts_with("margin"));
    assert_consistent(source);
}

#[test]
fn test_indented_template() {
    let source = "function f() {\n  return css`\n    .a {\n      color: red;\n    }\n  `;\n}\n";
    let document = parse(source);
    let Node::Rule(rule) = &document.roots()[0].nodes[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.source.start, Some(Position::new(3, 5, 33)));
    assert_eq!(rule.source.end, Some(Position::new(5, 5, 60)));
    let decl = rule.nodes[0].source();
    assert_eq!(decl.start, Some(Position::new(4, 7, 44)));
    assert_eq!(decl.end, Some(Position::new(4, 17, 54)));
    assert_consistent(source);
}

#[test]
fn test_tab_indented_template() {
    assert_consistent("class A {\n\tstatic styles = css`\n\t\t.a {\n\t\t\tcolor: red;\n\t\t}\n\t`;\n}\n");
}

#[test]
fn test_multiline_interpolation() {
    let source = "css`\n.a {\n  color: ${\n    x\n  } red; top: 0;\n}\n`";
    let document = parse(source);
    let Node::Rule(rule) = &document.roots()[0].nodes[0] else {
        panic!("expected a rule");
    };
    let color = rule.nodes[0].source();
    assert_eq!(color.start, Some(Position::new(3, 3, 12)));
    assert_eq!(color.end, Some(Position::new(5, 8, 35)));
    let top = rule.nodes[1].source();
    assert_eq!(top.start, Some(Position::new(5, 10, 37)));
    assert_consistent(source);
}

#[test]
fn test_multiline_interpolation_on_the_opening_line() {
    let source = "const a = css`.a { color: ${\n  x\n}; b: c; }`;";
    let document = parse(source);
    let Node::Rule(rule) = &document.roots()[0].nodes[0] else {
        panic!("expected a rule");
    };
    let b = rule.nodes[1].source();
    assert_eq!(b.start, Some(Position::new(3, 4, 36)));
    assert!(text_at(source, b.start.unwrap()).starts_with("b: c;"));
    assert_eq!(rule.source.end, Some(Position::new(3, 10, 42)));
    assert_consistent(source);
}

#[test]
fn test_several_templates() {
    assert_consistent(
        "const a = css`\n  a { color: ${x}; }\n`;\n\nconst b = css`\n  b { color: ${y}; }\n`;\n",
    );
}

#[test]
fn test_offsets_increase_in_document_order() {
    let source = "const a = css`\n  .a {\n    color: ${c};\n    ${p}: 1px;\n  }\n  .b { top: 0; }\n`;\nconst b = css`c {}`;\n";
    let document = parse(source);
    let all = positions(&document);
    for pair in all.windows(2) {
        assert!(pair[0].0.offset <= pair[1].0.offset, "{pair:?}");
    }
    for (start, end) in all {
        if let Some(end) = end {
            assert!(start.offset <= end.offset);
        }
    }
}

#[test]
fn test_syntax_error_position_is_in_host_coordinates() {
    let source = "const ok = 1;\nconst a = css`\n  .a {\n`;\n";
    let document = parse(source);
    let warning = &document.warnings()[0];
    assert_eq!(warning.line, 2);
    assert_eq!(warning.reason, "Unclosed block");
    let position = warning.position.unwrap();
    assert!(text_at(source, position).starts_with(".a {"));
}
