/*
 * types.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Location, range and position types.
 */

//! Core coordinate types

use serde::{Deserialize, Serialize};

/// A location in host source text (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in bytes)
    pub column: usize,
}

impl Location {
    /// 1-indexed line number of this location.
    pub fn line(&self) -> usize {
        self.row + 1
    }
}

/// A range in host source text from start to end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    /// Number of bytes covered by the range.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies strictly inside this range.
    pub fn strictly_contains(&self, other: &Range) -> bool {
        self.start.offset < other.start.offset && self.end.offset > other.end.offset
    }

    /// Slice the covered text out of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }
}

/// A stylesheet node position.
///
/// `line` and `column` are 1-indexed, `offset` is a 0-indexed byte offset.
/// Columns count bytes so that arithmetic against host byte ranges stays
/// exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }

    /// Position of the first byte of a text.
    pub fn start() -> Self {
        Position::new(1, 1, 0)
    }
}

impl From<Location> for Position {
    fn from(loc: Location) -> Self {
        Position {
            line: loc.row + 1,
            column: loc.column + 1,
            offset: loc.offset,
        }
    }
}
