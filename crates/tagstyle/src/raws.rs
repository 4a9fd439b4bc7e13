/*
 * raws.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Re-indented raws for printing back into the host.
 */

//! Re-indented copies of a node's raws.
//!
//! The parser records whitespace as it saw it, without the indentation that
//! was stripped from the stylesheet. For every raw that spans lines, a copy
//! with that indentation restored is stored next to it under the syntax id.
//! Selectors, values and params are stored even on a single line, so the
//! printer can tell parsed text from edited text. The parser's own raws are
//! left alone.
//!
//! Every anchor is the normalised line on which the raw text begins, and
//! the `n`th line after it takes the indentation removed from line
//! `anchor + n`. A root's trailing raw begins where its last child ends; its
//! final line takes the indentation of the stylesheet's last line.

use tagstyle_css::{Node, RawKind, Root};

use crate::normalise::IndentationMap;

fn newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Put indentation back on every line of `value` after the first.
/// `indent_of` gets the normalised line number and whether it is the last
/// line of `value`.
fn reindent<'m, F>(value: &str, anchor: usize, indent_of: F) -> String
where
    F: Fn(usize, bool) -> Option<&'m str>,
{
    let count = newlines(value) + 1;
    let mut out = String::with_capacity(value.len());
    for (i, part) in value.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if let Some(indent) = indent_of(anchor + i, i + 1 == count) {
                out.push_str(indent);
            }
        }
        out.push_str(part);
    }
    out
}

/// Re-indent `value`, which begins on normalised line `anchor`.
///
/// A value on a single line is returned unchanged unless `at_line_start` is
/// set, in which case it gets the whole indentation of its line.
pub fn compute_corrected_string(
    value: &str,
    anchor: usize,
    at_line_start: bool,
    map: &IndentationMap,
) -> String {
    if value.contains('\n') {
        return reindent(value, anchor, |line, _| map.indent(line));
    }
    match map.indent(anchor) {
        Some(indent) if at_line_start => format!("{indent}{value}"),
        _ => value.to_string(),
    }
}

/// The text printed for a node's selector, value or params.
pub(crate) fn effective_raw(node: &Node, kind: RawKind) -> Option<String> {
    let value = node.value()?;
    let raws = node.raws();
    let raw = match kind {
        RawKind::Selector => raws.selector.as_ref(),
        RawKind::Value => raws.value.as_ref(),
        RawKind::Params => raws.params.as_ref(),
        _ => None,
    };
    Some(match raw {
        Some(raw) if raw.value == value => raw.raw.clone(),
        _ => value.to_string(),
    })
}

/// Text of the node between its start and the raw of `kind`.
fn lead_text(node: &Node, kind: RawKind) -> String {
    match (node, kind) {
        (Node::Rule(_), RawKind::Between) => {
            effective_raw(node, RawKind::Selector).unwrap_or_default()
        }
        (Node::AtRule(at), RawKind::Between) => format!(
            "@{}{}{}",
            at.name,
            at.raws.after_name.as_deref().unwrap_or(""),
            effective_raw(node, RawKind::Params).unwrap_or_default()
        ),
        (Node::AtRule(at), RawKind::Params) => format!(
            "@{}{}",
            at.name,
            at.raws.after_name.as_deref().unwrap_or("")
        ),
        (Node::Decl(decl), RawKind::Between) => decl.prop.clone(),
        (Node::Decl(decl), RawKind::Value) => {
            format!("{}{}", decl.prop, decl.raws.between.as_deref().unwrap_or(""))
        }
        _ => String::new(),
    }
}

/// Store re-indented raws for a child node, before its positions are
/// corrected. `top_level` is set for direct children of a region's root,
/// whose leading raw is always stored.
pub fn capture_node_raws(node: &mut Node, top_level: bool, id: &str, map: &IndentationMap) {
    let source = *node.source();
    let Some(start) = source.start else {
        return;
    };
    let raws = node.raws();
    let mut captured = Vec::new();

    if let Some(before) = raws.before.as_deref() {
        if before.contains('\n') || top_level {
            let anchor = start.line.saturating_sub(newlines(before));
            let at_line_start = start.column == before.len() + 1;
            captured.push((
                RawKind::Before,
                compute_corrected_string(before, anchor, at_line_start, map),
            ));
        }
    }

    if let (Some(after), Some(end)) = (raws.after.as_deref(), source.end) {
        if after.contains('\n') {
            let anchor = end.line.saturating_sub(newlines(after));
            captured.push((
                RawKind::After,
                compute_corrected_string(after, anchor, false, map),
            ));
        }
    }

    if let Some(between) = raws.between.as_deref().filter(|b| b.contains('\n')) {
        let anchor = start.line + newlines(&lead_text(node, RawKind::Between));
        captured.push((
            RawKind::Between,
            compute_corrected_string(between, anchor, false, map),
        ));
    }

    if let Some(kind) = node.value_kind() {
        if let Some(raw) = effective_raw(node, kind) {
            let anchor = start.line + newlines(&lead_text(node, kind));
            captured.push((kind, compute_corrected_string(&raw, anchor, false, map)));
        }
    }

    let raws = node.raws_mut();
    for (kind, value) in captured {
        raws.set_namespaced(id, kind, value);
    }
}

/// Store the re-indented trailing raw of a region's root, before any of its
/// children are corrected.
pub fn capture_root_raws(root: &mut Root, id: &str, map: &IndentationMap) {
    let Some(after) = root.raws.after.as_deref().filter(|a| a.contains('\n')) else {
        return;
    };
    let anchor = root
        .last_child()
        .and_then(|child| child.source().end)
        .map_or(1, |end| end.line);
    let corrected = reindent(after, anchor, |line, last| {
        if last {
            map.last_line_indent()
        } else {
            map.indent(line)
        }
    });
    root.raws.set_namespaced(id, RawKind::After, corrected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalise::normalise_with_base;
    use pretty_assertions::assert_eq;
    use tagstyle_css::{ParseOptions, parse};

    fn map_of(lines: &[(usize, &str)]) -> IndentationMap {
        let mut map = IndentationMap::default();
        for (line, indent) in lines {
            map.insert(*line, indent);
        }
        map
    }

    #[test]
    fn test_multiline_string_is_reindented() {
        let map = map_of(&[(2, "  "), (3, "\t")]);
        assert_eq!(
            compute_corrected_string("a\nb\nc\nd", 1, false, &map),
            "a\n  b\n\tc\nd"
        );
    }

    #[test]
    fn test_single_line_only_at_line_start() {
        let map = map_of(&[(1, "    ")]);
        assert_eq!(compute_corrected_string("  ", 1, true, &map), "      ");
        assert_eq!(compute_corrected_string(" ", 1, false, &map), " ");
        assert_eq!(compute_corrected_string(" ", 2, true, &map), " ");
    }

    fn captured(text: &str, base: usize) -> (Root, IndentationMap) {
        let normalised = normalise_with_base(text, base);
        let mut root = parse(&normalised.result, &ParseOptions::default()).unwrap();
        let map = normalised.indentation_map;
        capture_root_raws(&mut root, "lit", &map);
        root.walk_mut(&mut |node, depth| capture_node_raws(node, depth == 0, "lit", &map));
        (root, map)
    }

    #[test]
    fn test_block_raws() {
        let (root, _) = captured("\n    a {\n      color: red;\n    }\n  ", 4);
        let rule = &root.nodes[0];
        assert_eq!(
            rule.raws().namespaced("lit", RawKind::Before),
            Some("    ")
        );
        assert_eq!(
            rule.raws().namespaced("lit", RawKind::After),
            Some("\n    ")
        );
        let decl = &rule.children().unwrap()[0];
        assert_eq!(
            decl.raws().namespaced("lit", RawKind::Before),
            Some("\n      ")
        );
        assert_eq!(root.raws.namespaced("lit", RawKind::After), Some("\n  "));
    }

    #[test]
    fn test_top_level_before_is_always_stored() {
        let (root, _) = captured("\n      a {}\n    b {}\n    ", 4);
        assert_eq!(
            root.nodes[0].raws().namespaced("lit", RawKind::Before),
            Some("      ")
        );
        assert_eq!(
            root.nodes[1].raws().namespaced("lit", RawKind::Before),
            Some("\n    ")
        );
    }

    #[test]
    fn test_single_line_values_are_stored() {
        let (root, _) = captured("a { color: red; }", 0);
        let rule = &root.nodes[0];
        assert_eq!(rule.raws().namespaced("lit", RawKind::Selector), Some("a"));
        let decl = &rule.children().unwrap()[0];
        assert_eq!(decl.raws().namespaced("lit", RawKind::Value), Some("red"));
        assert_eq!(decl.raws().namespaced("lit", RawKind::Between), None);
    }

    #[test]
    fn test_multiline_values() {
        let (root, _) = captured(
            "\n  a,\n  b {\n    grid-template-areas:\n      'x'\n      'y';\n  }\n",
            2,
        );
        let rule = &root.nodes[0];
        assert_eq!(
            rule.raws().namespaced("lit", RawKind::Selector),
            Some("a,\n  b")
        );
        let decl = &rule.children().unwrap()[0];
        assert_eq!(
            decl.raws().namespaced("lit", RawKind::Between),
            Some(":\n      ")
        );
        assert_eq!(
            decl.raws().namespaced("lit", RawKind::Value),
            Some("'x'\n      'y'")
        );
    }
}
