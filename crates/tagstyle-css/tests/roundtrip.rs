/*
 * roundtrip.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Parse and print stylesheets without changing them.
 */

use pretty_assertions::assert_eq;
use tagstyle_css::stringifier::root_to_string;
use tagstyle_css::{CssParser, Node, ParseOptions, StyleParseError, StyleParser};

const SHEETS: &[&str] = &[
    "",
    "\n\n",
    "a{}",
    "a {\n}\n",
    ".foo { color: hotpink; }",
    "  .foo {\n    color: hotpink;\n  }\n",
    "h1, h2,\nh3 {\n  font: 12px/1.5 \"Helvetica Neue\", sans-serif;\n}",
    "@media screen and (max-width: 600px) {\n  .a { display: none }\n  .b { display: block; }\n}\n",
    "@charset \"utf-8\";@import url(foo.css);",
    "a { background: url(data:image/png;base64,AAA=) }",
    "a::before { content: '\\201C'; }",
    "/* a */ /* b */\n.x { /* c */ }",
    "a { color: red ; ; }",
    ".a { --empty:; --x: 1px }",
    "@supports (display: grid) and (not (display: inline-grid)) { a { b: c } }",
    "a { width: calc(100% - (2 * 10px)); }",
];

#[test]
fn test_every_sheet_prints_back_unchanged() {
    for css in SHEETS {
        let root = CssParser
            .parse(css, &ParseOptions::default())
            .unwrap_or_else(|err| panic!("failed to parse {css:?}: {err}"));
        assert_eq!(&root_to_string(&root), css);
    }
}

#[test]
fn test_every_node_has_positions() {
    let css = "@media print {\n  a { b: c; }\n  /* note */\n}\n";
    let root = CssParser.parse(css, &ParseOptions::default()).unwrap();

    let mut count = 0;
    root.walk(&mut |node: &Node, _| {
        count += 1;
        let source = node.source();
        let (start, end) = (source.start.unwrap(), source.end.unwrap());
        assert!(start.offset <= end.offset);
        assert_eq!(
            css.as_bytes()[end.offset],
            match node {
                Node::AtRule(_) | Node::Rule(_) => b'}',
                Node::Decl(_) => b';',
                Node::Comment(_) => b'/',
            }
        );
    });
    assert_eq!(count, 4);
}

#[test]
fn test_syntax_errors_are_recognizable() {
    let err = CssParser
        .parse("a { b }", &ParseOptions::default())
        .unwrap_err();
    let StyleParseError::Syntax(syntax) = err else {
        panic!("expected a syntax error");
    };
    assert_eq!(syntax.reason, "Unknown word");
    assert_eq!((syntax.line, syntax.column), (1, 5));
}
