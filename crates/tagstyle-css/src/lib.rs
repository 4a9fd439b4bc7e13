/*
 * lib.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Raw-preserving stylesheet tree, parser and printer.
 */

//! A CSS node tree that keeps every byte of formatting.
//!
//! [`parse`] builds a [`Root`] whose nodes remember the whitespace and
//! punctuation around them, and [`stringifier::root_to_string`] prints it
//! back. Printing an unmodified tree yields the original text:
//!
//! ```rust
//! use tagstyle_css::{ParseOptions, parse, stringifier::root_to_string};
//!
//! let css = ".foo {\n  color: hotpink;\n}\n";
//! let root = parse(css, &ParseOptions::default()).unwrap();
//! assert_eq!(root_to_string(&root), css);
//! ```

pub mod error;
pub mod node;
pub mod parser;
pub mod stringifier;
pub mod tokenizer;

pub use error::{CssSyntaxError, StyleParseError};
pub use node::{
    AtRule, Comment, Declaration, Document, Input, Node, NodeKind, NodeRef, NodeSource, RawKind,
    RawValue, Raws, Root, RootId, Rule,
};
pub use parser::{CssParser, ParseOptions, StyleParser, parse};
pub use stringifier::Stringifier;
pub use tagstyle_source_map::Position;
