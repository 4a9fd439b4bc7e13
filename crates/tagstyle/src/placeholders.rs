/*
 * placeholders.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Choosing the text that stands in for an interpolation.
 */

//! Choosing the text that stands in for an interpolation.
//!
//! The stylesheet parser never sees `${ ... }`. Each interpolation becomes
//! either its constant value, when that is known, or a generated name shaped
//! to fit where it appears: a value, a property name, a selector, a whole
//! statement or a comment.

use tagstyle_host::{ExprId, ExprKind, HostAst, evaluate};

use crate::options::{PlaceholderRequest, SyntaxOptions};

/// The syntactic slot an interpolation fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderPosition {
    /// After a closing brace: between rules.
    Block,
    /// After an opening brace or a semicolon: where a declaration starts.
    Statement,
    /// A value, or nowhere in particular.
    Default,
    /// Followed by an opening brace.
    Selector,
    /// Followed by a colon.
    Property,
    /// Inside an unterminated comment.
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InComment,
}

/// Classify the end of `prefix`, then refine with the start of `suffix`.
///
/// The prefix is scanned backward. Characters inside a comment that closes
/// before the end of the prefix are ignored.
pub fn compute_possible_position(prefix: &str, suffix: Option<&str>) -> PlaceholderPosition {
    let bytes = prefix.as_bytes();
    let mut state = ScanState::Normal;
    let mut position = PlaceholderPosition::Default;

    for i in (0..bytes.len()).rev() {
        let current = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            ScanState::InComment => {
                if current == b'/' && next == Some(b'*') {
                    state = ScanState::Normal;
                }
            }
            ScanState::Normal => match (current, next) {
                (b'/', Some(b'*')) => {
                    position = PlaceholderPosition::Comment;
                    break;
                }
                (b'*', Some(b'/')) => state = ScanState::InComment,
                (b';' | b'{', _) => {
                    position = PlaceholderPosition::Statement;
                    break;
                }
                (b':', _) => {
                    position = PlaceholderPosition::Default;
                    break;
                }
                (b'}', _) => {
                    position = PlaceholderPosition::Block;
                    break;
                }
                _ => {}
            },
        }
    }

    let next = suffix.and_then(|s| s.chars().find(|c| !c.is_whitespace()));
    match (position, next) {
        (PlaceholderPosition::Block, Some('{')) => PlaceholderPosition::Selector,
        (PlaceholderPosition::Statement, Some(':')) => PlaceholderPosition::Property,
        _ => position,
    }
}

/// The bare placeholder name for `key`.
pub fn default_placeholder(id: &str, key: usize) -> String {
    format!("POSTCSS_{id}_{key}")
}

pub fn placeholder_for(position: PlaceholderPosition, id: &str, key: usize) -> String {
    let name = default_placeholder(id, key);
    match position {
        PlaceholderPosition::Block | PlaceholderPosition::Statement => format!("/* {name} */"),
        PlaceholderPosition::Property => format!("--{name}"),
        PlaceholderPosition::Default
        | PlaceholderPosition::Selector
        | PlaceholderPosition::Comment => name,
    }
}

/// Fold an expression to text. A conditional whose branches can be folded
/// takes the consequent, else the alternate, whatever its test.
pub fn try_evaluate(ast: &HostAst, expr: ExprId) -> Option<String> {
    if let ExprKind::Conditional {
        consequent,
        alternate,
        ..
    } = &ast.expr(expr).kind
    {
        let folded = try_evaluate(ast, *consequent).or_else(|| try_evaluate(ast, *alternate));
        if folded.is_some() {
            return folded;
        }
    }
    evaluate(ast, expr).map(|value| value.to_string())
}

/// The built-in placeholder selection.
pub fn create_placeholder(request: &PlaceholderRequest<'_>, options: &SyntaxOptions) -> String {
    if options.fold_constants {
        let folded = match &options.evaluator {
            Some(evaluator) => evaluator(request.ast, request.expr),
            None => try_evaluate(request.ast, request.expr),
        };
        if let Some(value) = folded {
            return value;
        }
    }

    if request.prefix.is_empty() {
        return default_placeholder(request.id, request.key);
    }

    let position = compute_possible_position(request.prefix, Some(request.suffix));
    placeholder_for(position, request.id, request.key)
}
