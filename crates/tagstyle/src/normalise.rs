/*
 * normalise.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Stripping host indentation from stylesheet text.
 */

//! Removing the host code's indentation from a stylesheet.
//!
//! A stylesheet written inside indented code carries that indentation on
//! every line. It is stripped before parsing, and the amount removed from
//! each line is kept so positions and raws can be put back.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extract::Region;

/// Text dropped before the first content line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrefixOffset {
    pub lines: usize,
    pub offset: usize,
}

/// How much indentation was removed from each line.
///
/// Lines are numbered from 1 in the normalised text. Lines that were left
/// alone have no entry. The removed text itself is kept so tabs survive
/// being put back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndentationMap {
    lines: BTreeMap<usize, String>,
    last_line: Option<String>,
}

impl IndentationMap {
    /// Number of bytes removed from `line`.
    pub fn get(&self, line: usize) -> Option<usize> {
        self.lines.get(&line).map(String::len)
    }

    /// The text removed from `line`.
    pub fn indent(&self, line: usize) -> Option<&str> {
        self.lines.get(&line).map(String::as_str)
    }

    /// Number of bytes removed from the final line, if any.
    pub fn last_line(&self) -> Option<usize> {
        self.last_line.as_ref().map(String::len)
    }

    pub fn last_line_indent(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    pub fn insert(&mut self, line: usize, indent: &str) {
        self.lines.insert(line, indent.to_string());
    }

    pub fn set_last_line(&mut self, indent: &str) {
        self.last_line = Some(indent.to_string());
    }

    /// Total indentation removed from lines `1..=line`.
    pub fn stripped_through(&self, line: usize) -> usize {
        self.lines.range(..=line).map(|(_, indent)| indent.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `(line, bytes removed)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.lines.iter().map(|(line, indent)| (*line, indent.len()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalisedSource {
    pub result: String,
    pub indentation_map: IndentationMap,
    pub prefix_offset: PrefixOffset,
}

fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r'))
}

/// Strip the region's base indentation from every line of `text`.
pub fn compute_normalised_source(text: &str, region: &Region) -> NormalisedSource {
    normalise_with_base(text, region.base_indentation())
}

pub(crate) fn normalise_with_base(text: &str, base: usize) -> NormalisedSource {
    let mut lines = text.split('\n').collect::<Vec<_>>();
    let mut prefix_offset = PrefixOffset::default();
    let mut indentation_map = IndentationMap::default();

    if lines.len() > 1 && is_blank(lines[0]) {
        prefix_offset = PrefixOffset {
            lines: 1,
            offset: lines[0].len() + 1,
        };
        lines.remove(0);
    }

    let count = lines.len();
    let normalised = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let indented = base > 0
                && line.len() >= base
                && line.as_bytes()[..base].iter().all(|b| matches!(b, b' ' | b'\t'));
            if !indented {
                return line;
            }
            let (indent, rest) = line.split_at(base);
            indentation_map.insert(i + 1, indent);
            if i + 1 == count {
                indentation_map.set_last_line(indent);
            }
            rest
        })
        .collect::<Vec<_>>();

    NormalisedSource {
        result: normalised.join("\n"),
        indentation_map,
        prefix_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line_is_untouched() {
        let normalised = normalise_with_base(".foo { color: hotpink; }", 40);
        assert_eq!(normalised.result, ".foo { color: hotpink; }");
        assert!(normalised.indentation_map.is_empty());
        assert_eq!(normalised.prefix_offset, PrefixOffset::default());
    }

    #[test]
    fn test_blank_first_line_becomes_prefix() {
        let normalised = normalise_with_base("  \n    a {}\n  ", 2);
        assert_eq!(normalised.prefix_offset, PrefixOffset { lines: 1, offset: 3 });
        assert_eq!(normalised.result, "  a {}\n");
        assert_eq!(
            normalised.indentation_map.iter().collect::<Vec<_>>(),
            vec![(1, 2), (2, 2)]
        );
        assert_eq!(normalised.indentation_map.last_line(), Some(2));
    }

    #[test]
    fn test_blank_single_line_is_content() {
        let normalised = normalise_with_base("   ", 2);
        assert_eq!(normalised.prefix_offset, PrefixOffset::default());
        assert_eq!(normalised.result, " ");
    }

    #[test]
    fn test_under_indented_lines_are_kept() {
        let normalised = normalise_with_base("\n    a {\n  b: c;\n    }\nd", 4);
        assert_eq!(normalised.result, "a {\n  b: c;\n}\nd");
        assert_eq!(normalised.indentation_map.get(1), Some(4));
        assert_eq!(normalised.indentation_map.get(2), None);
        assert_eq!(normalised.indentation_map.get(3), Some(4));
        assert_eq!(normalised.indentation_map.last_line(), None);
    }

    #[test]
    fn test_tabs_count_as_indentation() {
        let normalised = normalise_with_base("\n\t\ta {}\n\t", 1);
        assert_eq!(normalised.result, "\ta {}\n");
        assert_eq!(normalised.indentation_map.stripped_through(2), 2);
        assert_eq!(normalised.indentation_map.indent(1), Some("\t"));
    }

    #[test]
    fn test_restoring_indentation_gives_back_each_line() {
        let text = "\n      .a {\n        color: red;\n      }\n    ";
        let normalised = normalise_with_base(text, 4);
        let original = text.split('\n').skip(1).collect::<Vec<_>>();
        for (i, line) in normalised.result.split('\n').enumerate() {
            let restored = match normalised.indentation_map.indent(i + 1) {
                Some(indent) => format!("{indent}{line}"),
                None => line.to_string(),
            };
            assert_eq!(restored, original[i]);
        }
    }
}
