/*
 * parser.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Building the host arena from a tree-sitter tree.
 */

//! Builds a [`HostAst`] from JavaScript or TypeScript source.
//!
//! The tree-sitter tree is walked twice. The first walk finds every tagged
//! template so that nested ones can be referred to by id; the second lowers
//! templates, their interpolations and the statements that enclose them.

use std::collections::HashMap;

use tagstyle_source_map::{LineIndex, Location, Range};
use tree_sitter::{Node, Parser};

use crate::ast::{
    CommentKind, Expr, ExprId, ExprKind, HostAst, HostComment, Quasi, Statement, StatementId,
    TaggedTemplate, TemplateId,
};
use crate::error::{HostError, HostResult};
use crate::options::HostOptions;
use crate::traversals::{TraversePhase, find_ancestor, first_named_child, topdown_traverse};

impl HostAst {
    /// Parse `source` with the grammar selected in `options`.
    pub fn parse(source: &str, options: &HostOptions) -> HostResult<HostAst> {
        parse_host(source, options)
    }
}

/// Parse a host document and collect its tagged templates.
///
/// Syntax errors in the host are recovered from by tree-sitter; the result
/// records them in [`HostAst::has_errors`] instead of failing.
pub fn parse_host(source: &str, options: &HostOptions) -> HostResult<HostAst> {
    let dialect = options.dialect;
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|err| HostError::GrammarLoad {
            dialect: dialect.to_string(),
            message: err.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| HostError::ParseFailed {
            dialect: dialect.to_string(),
        })?;
    let root = tree.root_node();
    let has_errors = root.has_error();
    if has_errors {
        tracing::debug!(%dialect, "host source contains syntax errors; continuing with recovered tree");
    }

    let mut calls = Vec::new();
    topdown_traverse(&mut tree.walk(), &mut |node, phase| {
        if phase == TraversePhase::Enter && is_tagged_template(&node) {
            calls.push(node);
        }
        true
    });
    // A tag can itself be a tagged template (`` a`x``y` ``), in which case
    // the outer call is entered first but its backtick comes later.
    calls.sort_by_key(|call| {
        call.child_by_field_name("arguments")
            .map_or(call.start_byte(), |quasi| quasi.start_byte())
    });

    let mut builder = Builder {
        source,
        line_index: LineIndex::new(source),
        exprs: Vec::new(),
        statements: Vec::new(),
        statement_ids: HashMap::new(),
        template_ids: calls
            .iter()
            .enumerate()
            .map(|(i, call)| (call.id(), TemplateId(i)))
            .collect(),
    };

    let bindings = builder.collect_bindings(root);
    let templates = calls
        .iter()
        .enumerate()
        .map(|(i, call)| builder.build_template(TemplateId(i), *call))
        .collect::<Vec<_>>();

    tracing::trace!(
        templates = templates.len(),
        bindings = bindings.len(),
        "host document parsed"
    );

    Ok(HostAst {
        source: source.to_string(),
        line_index: builder.line_index,
        exprs: builder.exprs,
        templates,
        statements: builder.statements,
        bindings,
        has_errors,
    })
}

fn is_tagged_template(node: &Node) -> bool {
    node.kind() == "call_expression"
        && node
            .child_by_field_name("arguments")
            .is_some_and(|args| args.kind() == "template_string")
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind.ends_with("_declaration")
        || matches!(
            kind,
            "field_definition" | "public_field_definition" | "method_definition"
        )
}

fn location(point: tree_sitter::Point, offset: usize) -> Location {
    Location {
        offset,
        row: point.row,
        column: point.column,
    }
}

fn node_range(node: &Node) -> Range {
    Range {
        start: location(node.start_position(), node.start_byte()),
        end: location(node.end_position(), node.end_byte()),
    }
}

struct Builder<'s> {
    source: &'s str,
    line_index: LineIndex,
    exprs: Vec<Expr>,
    statements: Vec<Statement>,
    statement_ids: HashMap<usize, StatementId>,
    template_ids: HashMap<usize, TemplateId>,
}

impl<'s> Builder<'s> {
    fn text(&self, node: &Node) -> &'s str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    fn push(&mut self, kind: ExprKind, node: &Node) -> ExprId {
        let id = ExprId(self.exprs.len());
        self.exprs.push(Expr {
            kind,
            range: node_range(node),
        });
        id
    }

    /// Program-level `const` declarations, exported or not.
    fn collect_bindings(&mut self, program: Node<'_>) -> HashMap<String, ExprId> {
        let mut bindings = HashMap::new();
        let mut cursor = program.walk();
        let top_level = program.named_children(&mut cursor).collect::<Vec<_>>();
        for item in top_level {
            let declaration = if item.kind() == "export_statement" {
                match item.child_by_field_name("declaration") {
                    Some(declaration) => declaration,
                    None => continue,
                }
            } else {
                item
            };
            if declaration.kind() != "lexical_declaration"
                || declaration
                    .child_by_field_name("kind")
                    .is_none_or(|kind| kind.kind() != "const")
            {
                continue;
            }
            let mut inner = declaration.walk();
            let declarators = declaration
                .named_children(&mut inner)
                .filter(|child| child.kind() == "variable_declarator")
                .collect::<Vec<_>>();
            for declarator in declarators {
                let (Some(name), Some(value)) = (
                    declarator.child_by_field_name("name"),
                    declarator.child_by_field_name("value"),
                ) else {
                    continue;
                };
                if name.kind() != "identifier" {
                    continue;
                }
                let value = self.lower(value);
                bindings.insert(self.text(&name).to_string(), value);
            }
        }
        bindings
    }

    fn build_template(&mut self, id: TemplateId, call: Node<'_>) -> TaggedTemplate {
        let tag_node = call.child_by_field_name("function").unwrap_or(call);
        // Filtered in `is_tagged_template`.
        let quasi_node = call.child_by_field_name("arguments").unwrap_or(call);

        let mut cursor = quasi_node.walk();
        let substitutions = quasi_node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "template_substitution")
            .collect::<Vec<_>>();

        let open = location(quasi_node.start_position(), quasi_node.start_byte());
        let close = location(quasi_node.end_position(), quasi_node.end_byte());
        let mut boundaries = vec![Location {
            offset: open.offset + 1,
            row: open.row,
            column: open.column + 1,
        }];
        for substitution in &substitutions {
            boundaries.push(location(
                substitution.start_position(),
                substitution.start_byte(),
            ));
            boundaries.push(location(substitution.end_position(), substitution.end_byte()));
        }
        boundaries.push(Location {
            offset: close.offset.saturating_sub(1),
            row: close.row,
            column: close.column.saturating_sub(1),
        });

        let quasis = boundaries
            .chunks(2)
            .map(|pair| {
                let range = Range {
                    start: pair[0],
                    end: pair[1],
                };
                Quasi {
                    raw: range.slice(self.source).to_string(),
                    range,
                }
            })
            .collect::<Vec<_>>();

        let expressions = substitutions
            .iter()
            .map(|substitution| match first_named_child(*substitution) {
                Some(expr) => self.lower(expr),
                None => self.push(ExprKind::Other, substitution),
            })
            .collect::<Vec<_>>();

        let statement = self.statement_for(call);

        tracing::trace!(
            template = id.index(),
            tag = self.text(&tag_node),
            interpolations = expressions.len(),
            "tagged template"
        );

        TaggedTemplate {
            id,
            tag: self.text(&tag_node).to_string(),
            tag_range: node_range(&tag_node),
            range: node_range(&call),
            quasi_range: node_range(&quasi_node),
            quasis,
            expressions,
            statement,
        }
    }

    fn statement_for(&mut self, node: Node<'_>) -> Option<StatementId> {
        let mut statement = find_ancestor(node, |n| is_statement_kind(n.kind()))?;
        while let Some(parent) = statement.parent() {
            let wraps = parent.kind() == "export_statement"
                || (parent.start_byte() == statement.start_byte() && parent.kind() != "program");
            if !wraps {
                break;
            }
            statement = parent;
        }

        if let Some(id) = self.statement_ids.get(&statement.id()) {
            return Some(*id);
        }

        let mut leading_comments = Vec::new();
        let mut previous = statement.prev_sibling();
        while let Some(sibling) = previous {
            if sibling.kind() != "comment" {
                break;
            }
            let text = self.text(&sibling);
            leading_comments.push(HostComment {
                kind: if text.starts_with("//") {
                    CommentKind::Line
                } else {
                    CommentKind::Block
                },
                text: text.to_string(),
                range: node_range(&sibling),
            });
            previous = sibling.prev_sibling();
        }
        leading_comments.reverse();

        let id = StatementId(self.statements.len());
        self.statements.push(Statement {
            kind: statement.kind().to_string(),
            range: node_range(&statement),
            leading_comments,
        });
        self.statement_ids.insert(statement.id(), id);
        Some(id)
    }

    fn lower(&mut self, node: Node<'_>) -> ExprId {
        let kind = match node.kind() {
            "string" => ExprKind::String(self.decode_string(node)),
            "number" => parse_number(self.text(&node)).map_or(ExprKind::Other, ExprKind::Number),
            "true" => ExprKind::Boolean(true),
            "false" => ExprKind::Boolean(false),
            "null" => ExprKind::Null,
            "template_string" => self.lower_template_literal(node),
            "binary_expression" => {
                match (
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (Some(operator), Some(left), Some(right)) => ExprKind::Binary {
                        operator: operator.kind().to_string(),
                        left: self.lower(left),
                        right: self.lower(right),
                    },
                    _ => ExprKind::Other,
                }
            }
            "unary_expression" => {
                match (
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("argument"),
                ) {
                    (Some(operator), Some(argument)) => ExprKind::Unary {
                        operator: operator.kind().to_string(),
                        argument: self.lower(argument),
                    },
                    _ => ExprKind::Other,
                }
            }
            "ternary_expression" => {
                match (
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("consequence"),
                    node.child_by_field_name("alternative"),
                ) {
                    (Some(test), Some(consequent), Some(alternate)) => ExprKind::Conditional {
                        test: self.lower(test),
                        consequent: self.lower(consequent),
                        alternate: self.lower(alternate),
                    },
                    _ => ExprKind::Other,
                }
            }
            "parenthesized_expression"
            | "as_expression"
            | "satisfies_expression"
            | "non_null_expression" => match first_named_child(node) {
                Some(inner) => ExprKind::Parenthesized(self.lower(inner)),
                None => ExprKind::Other,
            },
            "identifier" => ExprKind::Identifier(self.text(&node).to_string()),
            "call_expression" => match self.template_ids.get(&node.id()) {
                Some(id) => ExprKind::TaggedTemplate(*id),
                None => ExprKind::Other,
            },
            _ => ExprKind::Other,
        };
        self.push(kind, &node)
    }

    fn lower_template_literal(&mut self, node: Node<'_>) -> ExprKind {
        let mut quasis = vec![String::new()];
        let mut substitutions = Vec::new();
        let mut cursor = node.walk();
        let children = node.named_children(&mut cursor).collect::<Vec<_>>();
        for child in children {
            match child.kind() {
                "string_fragment" => push_str(&mut quasis, self.text(&child)),
                "escape_sequence" => push_str(&mut quasis, &unescape(self.text(&child))),
                "template_substitution" => {
                    let expr = match first_named_child(child) {
                        Some(expr) => self.lower(expr),
                        None => self.push(ExprKind::Other, &child),
                    };
                    substitutions.push(expr);
                    quasis.push(String::new());
                }
                _ => {}
            }
        }
        ExprKind::Template {
            quasis,
            substitutions,
        }
    }

    fn decode_string(&self, node: Node<'_>) -> String {
        let mut value = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "string_fragment" => value.push_str(self.text(&child)),
                "escape_sequence" => value.push_str(&unescape(self.text(&child))),
                _ => {}
            }
        }
        value
    }
}

fn push_str(quasis: &mut [String], text: &str) {
    if let Some(last) = quasis.last_mut() {
        last.push_str(text);
    }
}

/// Decode a single JavaScript escape sequence, backslash included.
pub(crate) fn unescape(sequence: &str) -> String {
    let Some(body) = sequence.strip_prefix('\\') else {
        return sequence.to_string();
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let decoded = match first {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '0' if rest.is_empty() => Some('\0'),
        'x' => u32::from_str_radix(rest, 16).ok().and_then(char::from_u32),
        'u' => {
            let hex = rest
                .strip_prefix('{')
                .and_then(|r| r.strip_suffix('}'))
                .unwrap_or(rest);
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        }
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => return String::new(),
        other => return std::iter::once(other).chain(rest.chars()).collect(),
    };
    decoded.map_or_else(|| body.to_string(), String::from)
}

/// Numeric value of a JavaScript number literal. BigInts are not numbers.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "");
    if cleaned.ends_with('n') {
        return None;
    }
    let radix = |prefix_lower: &str, prefix_upper: &str, radix: u32| {
        cleaned
            .strip_prefix(prefix_lower)
            .or_else(|| cleaned.strip_prefix(prefix_upper))
            .map(|digits| u64::from_str_radix(digits, radix).ok().map(|n| n as f64))
    };
    if let Some(value) = radix("0x", "0X", 16) {
        return value;
    }
    if let Some(value) = radix("0o", "0O", 8) {
        return value;
    }
    if let Some(value) = radix("0b", "0B", 2) {
        return value;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Dialect;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> HostAst {
        parse_host(source, &HostOptions::default()).unwrap()
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\n"), "\n");
        assert_eq!(unescape("\\x41"), "A");
        assert_eq!(unescape("\\u0041"), "A");
        assert_eq!(unescape("\\u{1F600}"), "\u{1F600}");
        assert_eq!(unescape("\\'"), "'");
        assert_eq!(unescape("\\\n"), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("1_000"), Some(1000.0));
        assert_eq!(parse_number("0xff"), Some(255.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("10n"), None);
    }

    #[test]
    fn test_quasi_ranges() {
        let source = "const a = css`x ${b} y ${c}`;";
        let ast = parse(source);
        let template = &ast.templates()[0];
        let raws = template
            .quasis
            .iter()
            .map(|q| q.raw.as_str())
            .collect::<Vec<_>>();
        assert_eq!(raws, vec!["x ", " y ", ""]);
        assert_eq!(template.quasi_range.start.offset, 13);
        assert_eq!(template.quasis[0].range.start.offset, 14);
        assert_eq!(
            ast.slice(template.substitution_range(0).unwrap()),
            "${b}"
        );
        assert_eq!(template.tag, "css");
    }

    #[test]
    fn test_chained_tags_are_ordered_by_backtick() {
        let ast = parse("a`x``y`;");
        let raws = ast
            .templates()
            .iter()
            .map(|t| t.quasis[0].raw.clone())
            .collect::<Vec<_>>();
        assert_eq!(raws, vec!["x", "y"]);
        assert_eq!(ast.templates()[1].tag, "a`x`");
    }

    #[test]
    fn test_exported_statement_keeps_comments() {
        let source = "// first\n// second\nexport const a = css``;";
        let ast = parse(source);
        let statement = ast.statement(ast.templates()[0].statement.unwrap());
        assert_eq!(statement.kind, "export_statement");
        let texts = statement
            .leading_comments
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["// first", "// second"]);
    }

    #[test]
    fn test_syntax_errors_are_recovered() {
        let ast = parse_host(
            "const a = css`b`; const = ;",
            &HostOptions {
                dialect: Dialect::JavaScript,
            },
        )
        .unwrap();
        assert!(ast.has_errors());
        assert_eq!(ast.templates().len(), 1);
    }
}
