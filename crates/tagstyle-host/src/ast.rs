/*
 * ast.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Read-only arena of the host program's templates and expressions.
 */

//! Read-only arena describing the parts of a host document that matter for
//! embedded stylesheets.
//!
//! Expressions, templates and statements live in flat vectors and refer to
//! each other through index handles.

use std::collections::HashMap;

use tagstyle_source_map::{LineIndex, Location, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatementId(pub(crate) usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl TemplateId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A string literal, with escapes decoded.
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// An untagged template literal; `quasis` are the decoded fragments.
    Template {
        quasis: Vec<String>,
        substitutions: Vec<ExprId>,
    },
    Binary {
        operator: String,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        operator: String,
        argument: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    /// Parentheses, or a TypeScript `as`/`satisfies`/`!` wrapper.
    Parenthesized(ExprId),
    Identifier(String),
    TaggedTemplate(TemplateId),
    /// Anything the evaluator does not look into.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: Range,
}

/// A literal fragment of a template: the text between delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quasi {
    /// Source text, escapes left as written.
    pub raw: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostComment {
    pub kind: CommentKind,
    pub text: String,
    pub range: Range,
}

/// The statement (or class member) enclosing a tagged template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: String,
    pub range: Range,
    /// Comments directly above the statement, in source order.
    pub leading_comments: Vec<HostComment>,
}

/// A tagged template literal such as `` css`a { b: c }` ``.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplate {
    pub id: TemplateId,
    /// Source text of the tag expression (`css`, `styled.div`, ...).
    pub tag: String,
    pub tag_range: Range,
    /// The whole tagged expression.
    pub range: Range,
    /// The template literal, backticks included.
    pub quasi_range: Range,
    /// Literal fragments; always one more than `expressions`.
    pub quasis: Vec<Quasi>,
    pub expressions: Vec<ExprId>,
    pub statement: Option<StatementId>,
}

impl TaggedTemplate {
    /// Location of the opening backtick.
    pub fn open(&self) -> Location {
        self.quasi_range.start
    }

    /// Location just past the closing backtick.
    pub fn close(&self) -> Location {
        self.quasi_range.end
    }

    /// Range of the `${ ... }` for the `i`th interpolation.
    pub fn substitution_range(&self, i: usize) -> Option<Range> {
        let before = self.quasis.get(i)?;
        let after = self.quasis.get(i + 1)?;
        Some(Range {
            start: before.range.end,
            end: after.range.start,
        })
    }
}

/// The host document and everything extracted from it.
#[derive(Debug, Clone)]
pub struct HostAst {
    pub(crate) source: String,
    pub(crate) line_index: LineIndex,
    pub(crate) exprs: Vec<Expr>,
    pub(crate) templates: Vec<TaggedTemplate>,
    pub(crate) statements: Vec<Statement>,
    pub(crate) bindings: HashMap<String, ExprId>,
    pub(crate) has_errors: bool,
}

impl HostAst {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0]
    }

    pub fn template(&self, id: TemplateId) -> &TaggedTemplate {
        &self.templates[id.0]
    }

    /// Every tagged template, ordered by the position of its opening backtick.
    pub fn templates(&self) -> &[TaggedTemplate] {
        &self.templates
    }

    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.statements[id.0]
    }

    /// The initializer of a program-level `const` binding.
    pub fn binding(&self, name: &str) -> Option<ExprId> {
        self.bindings.get(name).copied()
    }

    /// Source text covered by `range`.
    pub fn slice(&self, range: Range) -> &str {
        range.slice(&self.source)
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}
