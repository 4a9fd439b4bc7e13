/*
 * comments.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Disable comments in front of host statements.
 */

//! The `// postcss-<id>-disable-next-line` opt-out comment.

use tagstyle_host::{CommentKind, HostAst, HostComment, TaggedTemplate};

pub fn disable_marker(id: &str) -> String {
    format!("postcss-{id}-disable-next-line")
}

/// A line comment carrying the disable marker. Block comments never count.
pub fn is_disable_comment(comment: &HostComment, id: &str) -> bool {
    comment.kind == CommentKind::Line && comment.text.contains(&disable_marker(id))
}

/// Whether the last comment above the statement holding `template` opts it
/// out of extraction.
pub fn has_disable_comment(ast: &HostAst, template: &TaggedTemplate, id: &str) -> bool {
    template
        .statement
        .map(|statement| ast.statement(statement))
        .and_then(|statement| statement.leading_comments.last())
        .is_some_and(|comment| is_disable_comment(comment, id))
}
