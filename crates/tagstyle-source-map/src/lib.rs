/*
 * lib.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Positions in a source text and conversions between them.
 */

//! Coordinate types for tagstyle
//!
//! Two coordinate systems meet in this workspace:
//!
//! - [`Location`] / [`Range`]: 0-indexed row and column, used for spans in
//!   the host document (these come straight from tree-sitter points).
//! - [`Position`]: 1-indexed line and column plus a 0-indexed byte offset,
//!   used for stylesheet nodes. The same type is used both before and after
//!   positions are mapped back into the host document.
//!
//! [`LineIndex`] converts byte offsets into either system.
//!
//! # Example
//!
//! ```rust
//! use tagstyle_source_map::LineIndex;
//!
//! let index = LineIndex::new("a {\n  color: red;\n}");
//! let pos = index.position(6).unwrap();
//! assert_eq!((pos.line, pos.column), (2, 3));
//! ```

pub mod line_index;
pub mod types;

pub use line_index::LineIndex;
pub use types::{Location, Position, Range};
