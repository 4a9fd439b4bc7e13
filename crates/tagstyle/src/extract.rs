/*
 * extract.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Selecting the tagged templates that hold stylesheets.
 */

//! Selecting the tagged templates that hold stylesheets.

use serde::Serialize;
use tagstyle_host::{ExprId, HostAst, Quasi, TaggedTemplate, TemplateId};
use tagstyle_source_map::{Location, Range};

use crate::comments::has_disable_comment;
use crate::options::SyntaxOptions;

/// A tagged template selected for extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    #[serde(skip)]
    pub template: TemplateId,
    pub tag: String,
    #[serde(skip)]
    pub quasis: Vec<Quasi>,
    #[serde(skip)]
    pub expressions: Vec<ExprId>,
    /// The template literal, backticks included.
    pub range: Range,
    /// Whether the template sits inside another region's interpolation.
    pub nested: bool,
    /// Index of the innermost region containing this one.
    pub enclosing: Option<usize>,
}

impl Region {
    fn from_template(template: &TaggedTemplate) -> Region {
        Region {
            template: template.id,
            tag: template.tag.clone(),
            quasis: template.quasis.clone(),
            expressions: template.expressions.clone(),
            range: template.quasi_range,
            nested: false,
            enclosing: None,
        }
    }

    /// The opening backtick.
    pub fn open(&self) -> Location {
        self.range.start
    }

    /// Offset of the first byte of content, just past the opening backtick.
    pub fn content_start(&self) -> usize {
        self.range.start.offset + 1
    }

    /// Column of the closing backtick, taken as the indentation of the
    /// stylesheet's lines.
    pub fn base_indentation(&self) -> usize {
        self.range.end.column.saturating_sub(1)
    }

    /// The `${ ... }` source of the `index`th interpolation.
    pub fn substitution_range(&self, index: usize) -> Option<Range> {
        let before = self.quasis.get(index)?;
        let after = self.quasis.get(index + 1)?;
        Some(Range {
            start: before.range.end,
            end: after.range.start,
        })
    }
}

/// Whether `tag` is accepted by one of `matchers`.
pub fn is_supported_tag(tag: &str, matchers: &[String]) -> bool {
    matchers.iter().any(|matcher| match matcher.strip_suffix('*') {
        Some(prefix) => tag.starts_with(prefix),
        None => matcher == tag,
    })
}

/// The regions of a host document, ordered by their opening backtick.
pub fn extract_regions(ast: &HostAst, options: &SyntaxOptions) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::new();
    if options.tag_names.is_empty() {
        return regions;
    }

    for template in ast.templates() {
        if !is_supported_tag(&template.tag, &options.tag_names) {
            continue;
        }
        if template.quasis.len() != template.expressions.len() + 1
            || template.quasi_range.len() < 2
        {
            tracing::trace!(tag = %template.tag, "skipping template without usable ranges");
            continue;
        }
        if has_disable_comment(ast, template, &options.id) {
            tracing::trace!(
                tag = %template.tag,
                line = template.open().line(),
                "template disabled by comment"
            );
            continue;
        }

        let mut region = Region::from_template(template);
        region.enclosing = regions
            .iter()
            .rposition(|outer| outer.range.strictly_contains(&region.range));
        region.nested = region.enclosing.is_some();
        regions.push(region);
    }

    regions
}
