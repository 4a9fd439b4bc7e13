/*
 * traversals.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Generic traversal helpers for tree-sitter cursors.
 */

//! Cursor-based walks over the host syntax tree.

use tree_sitter::{Node, TreeCursor};

/// Whether the visitor is called before or after a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversePhase {
    Enter,
    Exit,
}

/// Top-down traversal of a tree-sitter tree.
///
/// Each node is visited on entry and again on exit. Returning `false` on
/// entry skips the node's children. Nodes handed to the visitor live as long
/// as the tree, so they can be collected.
pub fn topdown_traverse<'t, F>(cursor: &mut TreeCursor<'t>, visitor: &mut F)
where
    F: FnMut(Node<'t>, TraversePhase) -> bool,
{
    enum Step {
        Visit,
        Parent,
        Exit,
        Sibling,
    }

    let mut stack = vec![Step::Visit];
    while let Some(step) = stack.pop() {
        match step {
            Step::Visit => {
                stack.push(Step::Exit);
                if visitor(cursor.node(), TraversePhase::Enter) && cursor.goto_first_child() {
                    stack.push(Step::Parent);
                    stack.push(Step::Sibling);
                    stack.push(Step::Visit);
                }
            }
            Step::Parent => {
                cursor.goto_parent();
            }
            Step::Exit => {
                visitor(cursor.node(), TraversePhase::Exit);
            }
            Step::Sibling => {
                if cursor.goto_next_sibling() {
                    stack.push(Step::Sibling);
                    stack.push(Step::Visit);
                }
            }
        }
    }
}

/// Nearest ancestor of `node` (excluding itself) satisfying `pred`.
pub fn find_ancestor<'t, P>(node: Node<'t>, pred: P) -> Option<Node<'t>>
where
    P: Fn(&Node<'t>) -> bool,
{
    let mut current = node.parent();
    while let Some(candidate) = current {
        if pred(&candidate) {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// First named child that is not a comment.
pub fn first_named_child<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    found
}
