/*
 * line_index.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Line-start table for offset and position lookups.
 */

//! Offset to line/column lookups

use crate::types::{Location, Position};
use serde::{Deserialize, Serialize};

/// Line-break index over a text.
///
/// Scans the content once to record every newline so that offset lookups
/// run in O(log n) by binary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineIndex {
    /// Byte offsets of each newline character
    line_breaks: Vec<usize>,

    /// Total length of the text in bytes
    total_length: usize,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let line_breaks = content
            .bytes()
            .enumerate()
            .filter_map(|(idx, b)| (b == b'\n').then_some(idx))
            .collect();

        LineIndex {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a 0-indexed [`Location`].
    ///
    /// A newline belongs to the line it terminates. Returns None if the
    /// offset is out of bounds.
    pub fn location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }

        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };

        Some(Location {
            offset,
            row,
            column: offset - self.line_start(row)?,
        })
    }

    /// Convert a byte offset to a 1-indexed [`Position`].
    pub fn position(&self, offset: usize) -> Option<Position> {
        self.location(offset).map(Position::from)
    }

    /// Byte offset of the first byte of a 0-indexed row.
    pub fn line_start(&self, row: usize) -> Option<usize> {
        if row == 0 {
            Some(0)
        } else {
            self.line_breaks.get(row - 1).map(|b| b + 1)
        }
    }

    /// Byte offset for a 1-indexed line and column.
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        let start = self.line_start(line.checked_sub(1)?)?;
        let offset = start + column.checked_sub(1)?;
        (offset <= self.total_length).then_some(offset)
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Number of lines; a trailing newline opens an (empty) final line.
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
