/*
 * replacements.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Placeholders substituted for a region's interpolations.
 */

//! Substituting placeholders for a region's interpolations.

use serde::Serialize;
use tagstyle_host::{ExprId, HostAst};
use tagstyle_source_map::Range;

use crate::extract::Region;
use crate::options::PlaceholderRequest;
use crate::placeholders::default_placeholder;

/// One interpolation and the text that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    /// Position among the region's interpolations.
    pub index: usize,
    /// Document-wide sequence number.
    pub key: usize,
    #[serde(skip)]
    pub expr: ExprId,
    /// The host text of the interpolation, `${` and `}` included.
    pub source: String,
    /// Where `source` sits in the host document.
    pub range: Range,
    pub placeholder: String,
    /// Whether `placeholder` is a generated name rather than a folded value.
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedSource {
    pub result: String,
    pub replacements: Vec<Replacement>,
}

/// Hands out placeholder keys that are unique within one document.
#[derive(Debug, Clone, Default)]
pub struct KeySequence {
    next: usize,
}

impl KeySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self) -> usize {
        let key = self.next;
        self.next += 1;
        key
    }
}

/// Join the region's fragments, putting a placeholder where each
/// interpolation was.
pub fn compute_replaced_source<F>(
    ast: &HostAst,
    region: &Region,
    id: &str,
    keys: &mut KeySequence,
    mut placeholder: F,
) -> ReplacedSource
where
    F: FnMut(&PlaceholderRequest<'_>) -> String,
{
    let mut result = String::new();
    let mut replacements = Vec::with_capacity(region.expressions.len());

    for (index, quasi) in region.quasis.iter().enumerate() {
        result.push_str(&quasi.raw);

        let (Some(expr), Some(next), Some(range)) = (
            region.expressions.get(index),
            region.quasis.get(index + 1),
            region.substitution_range(index),
        ) else {
            continue;
        };

        let key = keys.next_key();
        let text = placeholder(&PlaceholderRequest {
            index,
            key,
            id,
            expr: *expr,
            ast,
            prefix: &result,
            suffix: &next.raw,
        });
        let generated = text.contains(&default_placeholder(id, key));
        replacements.push(Replacement {
            index,
            key,
            expr: *expr,
            source: ast.slice(range).to_string(),
            range,
            placeholder: text.clone(),
            generated,
        });
        result.push_str(&text);
    }

    ReplacedSource {
        result,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_regions;
    use crate::options::SyntaxOptions;
    use crate::placeholders::create_placeholder;
    use pretty_assertions::assert_eq;
    use tagstyle_host::HostOptions;

    fn replace(source: &str) -> Vec<ReplacedSource> {
        let ast = HostAst::parse(source, &HostOptions::default()).unwrap();
        let options = SyntaxOptions::new("lit").with_tags(["css"]);
        let mut keys = KeySequence::new();
        extract_regions(&ast, &options)
            .iter()
            .map(|region| {
                compute_replaced_source(&ast, region, "lit", &mut keys, |request| {
                    create_placeholder(request, &options)
                })
            })
            .collect()
    }

    #[test]
    fn test_no_interpolations() {
        let replaced = replace("css`.foo { color: hotpink; }`");
        assert_eq!(replaced[0].result, ".foo { color: hotpink; }");
        assert!(replaced[0].replacements.is_empty());
    }

    #[test]
    fn test_value_interpolation() {
        let replaced = replace("css`.foo { padding: ${expr}; }`");
        assert_eq!(replaced[0].result, ".foo { padding: POSTCSS_lit_0; }");
        let replacement = &replaced[0].replacements[0];
        assert_eq!(replacement.index, 0);
        assert_eq!(replacement.source, "${expr}");
        assert!(replacement.generated);
    }

    #[test]
    fn test_expression_source_keeps_inner_formatting() {
        let replaced = replace("css`a { b: ${ x /* why */ }; }`");
        assert_eq!(replaced[0].replacements[0].source, "${ x /* why */ }");
    }

    #[test]
    fn test_selector_and_statement_positions() {
        let replaced = replace("css`a {} ${sel} { b: c; ${mixin} }`");
        assert_eq!(
            replaced[0].result,
            "a {} POSTCSS_lit_0 { b: c; /* POSTCSS_lit_1 */ }"
        );
    }

    #[test]
    fn test_folded_constant() {
        let replaced = replace("const red = '#f00';\ncss`a { color: ${red}; }`");
        assert_eq!(replaced[0].result, "a { color: #f00; }");
        assert!(!replaced[0].replacements[0].generated);
    }

    #[test]
    fn test_keys_are_unique_across_regions() {
        let replaced = replace("css`a { b: ${x}; }`; css`c { d: ${y}; }`;");
        assert_eq!(replaced[0].replacements[0].placeholder, "POSTCSS_lit_0");
        assert_eq!(replaced[1].replacements[0].placeholder, "POSTCSS_lit_1");
        assert_eq!(replaced[1].replacements[0].index, 0);
    }
}
