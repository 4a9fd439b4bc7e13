/*
 * roundtrip.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * The `roundtrip` command: parse, print and compare.
 */

use anyhow::{Result, bail};
use serde::Serialize;
use tagstyle::{Syntax, Warning};

use super::{print_json, read_input};
use crate::SyntaxArgs;
use crate::config::resolve_options;

#[derive(Serialize)]
struct RoundtripReport<'a> {
    file: String,
    roots: usize,
    identical: bool,
    /// Byte offset of the first difference.
    first_difference: Option<usize>,
    warnings: &'a [Warning],
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

pub fn execute(args: &SyntaxArgs) -> Result<()> {
    let syntax = Syntax::new(resolve_options(args)?);
    let source = read_input(&args.input)?;
    let document = syntax.parse(&source)?;
    let printed = syntax.stringify(&document);

    let difference = first_difference(&source, &printed);
    print_json(
        &RoundtripReport {
            file: args.input.display().to_string(),
            roots: document.roots().len(),
            identical: difference.is_none(),
            first_difference: difference,
            warnings: document.warnings(),
        },
        args.compact,
    )?;

    if let Some(offset) = difference {
        bail!(
            "{} does not round-trip: output differs at byte {}",
            args.input.display(),
            offset
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("abc", "abc"), None);
        assert_eq!(first_difference("abc", "abd"), Some(2));
        assert_eq!(first_difference("abc", "ab"), Some(2));
    }
}
