/*
 * parse.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Parsing every stylesheet region of a host document.
 */

//! The parse pipeline: host document in, document of stylesheet roots out.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tagstyle_css::{CssSyntaxError, Document, Input, NodeSource, Root, RootId, StyleParseError};
use tagstyle_host::HostAst;
use tagstyle_source_map::Position;

use crate::document::StyledDocument;
use crate::error::Result;
use crate::extract::{Region, extract_regions};
use crate::location::{correct_position, correct_root};
use crate::normalise::compute_normalised_source;
use crate::options::SyntaxOptions;
use crate::placeholders::create_placeholder;
use crate::replacements::{KeySequence, compute_replaced_source};
use crate::state::{ExtractedStylesheetState, StateTable};

/// A region that was left out of the document because its stylesheet
/// could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// The syntax id that produced the warning.
    pub plugin: String,
    pub file: Option<String>,
    /// Host line of the template's opening backtick.
    pub line: usize,
    /// What the stylesheet parser objected to.
    pub reason: String,
    /// Where the parser stopped, in host coordinates.
    #[serde(skip)]
    pub position: Option<Position>,
}

impl Warning {
    fn skipped_template(
        options: &SyntaxOptions,
        region: &Region,
        err: &CssSyntaxError,
        position: Position,
    ) -> Self {
        Warning {
            plugin: options.id.clone(),
            file: options.parse.from.clone(),
            line: region.open().line(),
            reason: err.reason.clone(),
            position: Some(position),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Skipping template (Line {}) as it included either invalid syntax or complex \
             expressions the plugin could not interpret. Consider using a \
             \"// postcss-{}-disable-next-line\" comment to disable this message",
            self.line, self.plugin
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }
        write!(f, "{} ({})", self.message(), self.reason)
    }
}

/// Build the state for one region. Returns the state with the text the
/// stylesheet parser should see.
fn prepare_region(
    ast: &HostAst,
    region: Region,
    enclosing: Option<RootId>,
    keys: &mut KeySequence,
    options: &SyntaxOptions,
) -> ExtractedStylesheetState {
    let replaced = compute_replaced_source(ast, &region, &options.id, keys, |request| {
        match &options.placeholder {
            Some(placeholder) => placeholder(request),
            None => create_placeholder(request, options),
        }
    });
    let normalised = compute_normalised_source(&replaced.result, &region);
    tracing::debug!(
        tag = %region.tag,
        line = region.open().line(),
        placeholders = replaced.replacements.len(),
        normalized_len = normalised.result.len(),
        "extracted stylesheet"
    );
    ExtractedStylesheetState {
        replacements: replaced.replacements,
        normalized_source: normalised.result,
        prefix_offset: normalised.prefix_offset,
        indentation_map: normalised.indentation_map,
        nested: region.nested,
        enclosing,
        region,
    }
}

/// Run the stylesheet parser, turning failures into warnings or logs.
fn parse_region(
    state: &ExtractedStylesheetState,
    options: &SyntaxOptions,
    warnings: &mut Vec<Warning>,
) -> Option<Root> {
    match options.parser.parse(&state.normalized_source, &options.parse) {
        Ok(root) => Some(root),
        Err(StyleParseError::Syntax(err)) => {
            let at = correct_position(Position::new(err.line, err.column, err.offset), state);
            let warning = Warning::skipped_template(options, &state.region, &err, at);
            tracing::warn!(
                file = warning.file.as_deref().unwrap_or("<input>"),
                line = warning.line,
                reason = %err.reason,
                "{}",
                warning.message()
            );
            warnings.push(warning);
            None
        }
        Err(err) => {
            tracing::debug!(%err, line = state.region.open().line(), "stylesheet parser failed");
            None
        }
    }
}

/// Parse every embedded stylesheet of `source`.
///
/// Fails only when the host document itself cannot be read. Regions whose
/// stylesheet does not parse are left out and reported as warnings.
pub fn parse_styles(source: &str, options: &SyntaxOptions) -> Result<StyledDocument> {
    let ast = Arc::new(HostAst::parse(source, &options.host)?);
    let regions = extract_regions(&ast, options);

    let mut keys = KeySequence::new();
    let mut states = StateTable::new();
    let mut warnings = Vec::new();
    let mut roots = Vec::with_capacity(regions.len());
    // The root parsed from each region, by region index.
    let mut region_roots: Vec<Option<RootId>> = Vec::with_capacity(regions.len());
    let mut current_offset = 0;
    let mut last_top_level = None;

    for region in regions {
        let enclosing = region
            .enclosing
            .and_then(|index| region_roots.get(index).copied().flatten());
        let state = prepare_region(&ast, region, enclosing, &mut keys, options);
        let Some(mut root) = parse_region(&state, options, &mut warnings) else {
            region_roots.push(None);
            continue;
        };

        if !state.nested {
            let start = state.region.content_start() + state.prefix_offset.offset;
            let code_before = source.get(current_offset..start).unwrap_or("");
            root.raws.code_before = Some(code_before.to_string());
            current_offset = state.region.range.end.offset.saturating_sub(1);
            last_top_level = Some(roots.len());
        }

        correct_root(&mut root, &state, &options.id);
        region_roots.push(Some(root.id));
        states.insert(root.id, state);
        roots.push(root);
    }

    if let Some(root) = last_top_level.and_then(|index| roots.get_mut(index)) {
        root.raws.code_after = Some(source.get(current_offset..).unwrap_or("").to_string());
    }

    let document = Document {
        nodes: roots,
        source: NodeSource::starting_at(Position::start()),
        input: Some(Input {
            css: source.to_string(),
            file: options.parse.from.clone(),
        }),
        ..Document::default()
    };

    Ok(StyledDocument::new(
        document,
        states,
        warnings,
        options.id.clone(),
        ast,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> SyntaxOptions {
        SyntaxOptions::new("lit").with_tags(["css"])
    }

    #[test]
    fn test_code_before_and_after() {
        let source = "const a = css`a {}`;\nconst b = css`b {}`;\n";
        let doc = parse_styles(source, &options()).unwrap();
        let roots = doc.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].raws.code_before.as_deref(), Some("const a = css`"));
        assert_eq!(roots[0].raws.code_after, None);
        assert_eq!(
            roots[1].raws.code_before.as_deref(),
            Some("`;\nconst b = css`")
        );
        assert_eq!(roots[1].raws.code_after.as_deref(), Some("`;\n"));
    }

    #[test]
    fn test_prefix_line_belongs_to_code_before() {
        let source = "css`\n  a {}\n`";
        let doc = parse_styles(source, &options()).unwrap();
        assert_eq!(doc.roots()[0].raws.code_before.as_deref(), Some("css`\n"));
    }

    #[test]
    fn test_invalid_region_becomes_warning() {
        let source = "const a = css`a {`;\nconst b = css`b {}`;";
        let doc = parse_styles(source, &options().with_from("a.ts")).unwrap();
        assert_eq!(doc.roots().len(), 1);
        assert_eq!(doc.warnings().len(), 1);
        let warning = &doc.warnings()[0];
        assert_eq!(warning.line, 1);
        assert_eq!(warning.plugin, "lit");
        assert_eq!(warning.file.as_deref(), Some("a.ts"));
        assert!(warning.message().starts_with("Skipping template (Line 1)"));
        assert!(warning.message().contains("// postcss-lit-disable-next-line"));
        assert!(warning.to_string().starts_with("a.ts: "));
    }

    #[test]
    fn test_nested_regions_are_linked() {
        let source = "css`a { ${css`.b {}`} }`";
        let doc = parse_styles(source, &options()).unwrap();
        let roots = doc.roots();
        assert_eq!(roots.len(), 2);
        let inner = doc.state(&roots[1]).unwrap();
        assert!(inner.nested);
        assert_eq!(inner.enclosing, Some(roots[0].id));
        assert_eq!(roots[1].raws.code_before, None);
    }
}
