/*
 * lib.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * JavaScript and TypeScript front-end built on tree-sitter.
 */

//! JavaScript and TypeScript front-end for tagstyle.
//!
//! [`HostAst::parse`] reads a host document with tree-sitter and keeps what
//! embedded stylesheets need: tagged templates with their literal fragments
//! and interpolated expressions, the statements enclosing them (with their
//! leading comments) and program-level `const` bindings. [`evaluate`] folds
//! expressions whose value is known at compile time.
//!
//! ```rust
//! use tagstyle_host::{HostAst, HostOptions};
//!
//! let ast = HostAst::parse("const a = css`color: ${'red'};`;", &HostOptions::default()).unwrap();
//! let template = &ast.templates()[0];
//! assert_eq!(template.tag, "css");
//! assert_eq!(template.quasis.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod evaluate;
pub mod options;
pub mod parser;
pub mod traversals;

pub use ast::{
    CommentKind, Expr, ExprId, ExprKind, HostAst, HostComment, Quasi, Statement, StatementId,
    TaggedTemplate, TemplateId,
};
pub use error::{HostError, HostResult};
pub use evaluate::{ConstValue, evaluate};
pub use options::{Dialect, HostOptions};
pub use parser::parse_host;
