/*
 * location.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Correcting stylesheet positions into host coordinates.
 */

//! Mapping stylesheet positions back into the host document.
//!
//! The parser reports positions in the normalised text: no opening
//! backtick, no stripped indentation, placeholders instead of
//! interpolations. [`correct_position`] undoes each of those in turn,
//! folding over the interpolations that come before the position.

use tagstyle_css::{Node, Root};
use tagstyle_source_map::Position;

use crate::raws::{capture_node_raws, capture_root_raws};
use crate::state::ExtractedStylesheetState;

/// Running adjustments while walking the interpolations of a region.
///
/// Line numbers are 1-based host lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionAccumulator {
    pub line_offset: isize,
    pub column_offset: isize,
    /// The corrected offset so far.
    pub offset: isize,
    /// The host line that `column_offset` applies to.
    pub current_line: usize,
}

impl CorrectionAccumulator {
    /// Adjustments before any interpolation is taken into account.
    pub fn new(position: Position, state: &ExtractedStylesheetState) -> Self {
        let open = state.region.open();
        let prefix = state.prefix_offset;
        let stripped = state.indentation_map.stripped_through(position.line);
        CorrectionAccumulator {
            line_offset: (open.row + prefix.lines) as isize,
            column_offset: open.column as isize + 1,
            offset: (position.offset + open.offset + 1 + prefix.offset + stripped) as isize,
            current_line: open.line(),
        }
    }

    /// Account for the `index`th interpolation if the position lies past it.
    pub fn step(self, state: &ExtractedStylesheetState, index: usize) -> Self {
        let region = &state.region;
        let (Some(previous), Some(next), Some(replacement)) = (
            region.quasis.get(index),
            region.quasis.get(index + 1),
            state.replacements.get(index),
        ) else {
            return self;
        };
        if previous.range.end.offset as isize >= self.offset {
            return self;
        }

        let placeholder_len = replacement.placeholder.len() as isize;
        let growth =
            next.range.start.offset as isize - previous.range.end.offset as isize - placeholder_len;
        let start_line = previous.range.end.line();
        let end_line = next.range.start.line();

        let mut acc = self;
        acc.offset += growth;
        acc.line_offset += end_line as isize - start_line as isize;
        if acc.current_line != end_line {
            // Column of the interpolation start in the normalised line.
            let mut start_column = previous.range.end.column as isize;
            if start_line == acc.current_line {
                start_column -= acc.column_offset;
            }
            acc.current_line = end_line;
            acc.column_offset = if start_line == end_line {
                growth
            } else {
                next.range.start.column as isize - start_column - placeholder_len
            };
        } else {
            acc.column_offset += growth;
        }
        acc
    }

    /// The corrected position, or `None` if the adjustments do not fit.
    pub fn apply(&self, position: Position, state: &ExtractedStylesheetState) -> Option<Position> {
        let line = usize::try_from(position.line as isize + self.line_offset).ok()?;
        let mut column = position.column as isize;
        if line == self.current_line {
            column += self.column_offset;
        }
        column += state.indentation_map.get(position.line).unwrap_or(0) as isize;
        Some(Position {
            line,
            column: usize::try_from(column).ok()?,
            offset: usize::try_from(self.offset).ok()?,
        })
    }
}

/// Move a position from the normalised text into the host document.
/// Positions that cannot be mapped are returned as they are.
pub fn correct_position(position: Position, state: &ExtractedStylesheetState) -> Position {
    let acc = (0..state.region.expressions.len()).fold(
        CorrectionAccumulator::new(position, state),
        |acc, index| acc.step(state, index),
    );
    match acc.apply(position, state) {
        Some(corrected) => corrected,
        None => {
            tracing::debug!(?position, "position could not be mapped to the host document");
            position
        }
    }
}

fn correct_node(node: &mut Node, top_level: bool, state: &ExtractedStylesheetState, id: &str) {
    capture_node_raws(node, top_level, id, &state.indentation_map);
    let source = node.source_mut();
    source.start = source.start.map(|start| correct_position(start, state));
    source.end = source.end.map(|end| correct_position(end, state));
}

/// Capture raws and correct positions for a root and all its descendants,
/// parents first.
pub fn correct_root(root: &mut Root, state: &ExtractedStylesheetState, id: &str) {
    capture_root_raws(root, id, &state.indentation_map);
    root.source.start = root.source.start.map(|start| correct_position(start, state));
    root.walk_mut(&mut |node, depth| correct_node(node, depth == 0, state, id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SyntaxOptions;
    use crate::parse::parse_styles;
    use pretty_assertions::assert_eq;

    fn state_of(source: &str) -> ExtractedStylesheetState {
        let document = parse_styles(source, &SyntaxOptions::new("lit").with_tags(["css"])).unwrap();
        document.state(&document.roots()[0]).unwrap().clone()
    }

    #[test]
    fn test_positions_before_and_after_an_interpolation() {
        let state = state_of("css`.foo { padding: ${expr}; }`");
        assert_eq!(
            correct_position(Position::new(1, 1, 0), &state),
            Position::new(1, 5, 4)
        );
        // The semicolon after `POSTCSS_lit_0`.
        assert_eq!(
            correct_position(Position::new(1, 30, 29), &state),
            Position::new(1, 28, 27)
        );
    }

    #[test]
    fn test_accumulator_skips_later_interpolations() {
        let state = state_of("css`a { b: ${x}; c: ${y}; }`");
        let position = Position::new(1, 9, 8);
        let acc = CorrectionAccumulator::new(position, &state);
        assert_eq!(acc.step(&state, 0), acc.step(&state, 0).step(&state, 1));
        assert_eq!(acc.offset, 12);
    }

    #[test]
    fn test_multiline_interpolation_on_the_opening_line() {
        let state = state_of("const a = css`.a { color: ${\n  x\n}; b: c; }`;");
        // `b` follows `POSTCSS_lit_0; ` on the single normalised line.
        assert_eq!(
            correct_position(Position::new(1, 28, 27), &state),
            Position::new(3, 4, 36)
        );
    }

    #[test]
    fn test_prefix_line_and_indentation() {
        let state = state_of("if (a) {\n  x = css`\n    b {}\n  `;\n}");
        assert_eq!(
            correct_position(Position::new(1, 1, 0), &state),
            Position::new(3, 3, 22)
        );
    }
}
