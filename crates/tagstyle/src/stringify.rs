/*
 * stringify.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Printing stylesheets back into host source.
 */

//! Printing a document of embedded stylesheets back into host source.
//!
//! Each root prints the host code before it, its stylesheet, and for the
//! last root the host code after it. Stylesheet text is escaped for the
//! template literal and placeholders are replaced by the interpolations
//! they stood for. Folded values are only put back at the place their
//! interpolation had in the host, and selectors, values or params that were
//! edited get their backslashes doubled.

use std::collections::HashSet;

use tagstyle_css::stringifier::{self, Context, Detect, Edge, Slot};
use tagstyle_css::{Document, NodeRef, RawKind, Root, Stringifier};

use crate::replacements::Replacement;
use crate::state::{ExtractedStylesheetState, StateTable};

/// Whether `corrected` is `plain` with indentation put back on its lines.
fn corresponds(corrected: &str, plain: &str) -> bool {
    corrected.split('\n').count() == plain.split('\n').count()
        && corrected.split('\n').zip(plain.split('\n')).all(|(c, p)| {
            c.strip_suffix(p)
                .is_some_and(|indent| indent.bytes().all(|b| b == b' ' || b == b'\t'))
        })
}

/// Escape a backtick or `${` unless a backslash already does.
pub fn escape_template_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let escaped = backslashes % 2 == 1;
        match c {
            '`' if !escaped => out.push_str("\\`"),
            '$' if !escaped && chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    out
}

/// Replace every `placeholder` not followed by a digit.
fn replace_placeholder(text: &str, placeholder: &str, source: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(placeholder) {
        let end = pos + placeholder.len();
        let boundary = !rest[end..].starts_with(|c: char| c.is_ascii_digit());
        out.push_str(&rest[..pos]);
        out.push_str(if boundary { source } else { placeholder });
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Double every backslash of text that did not come from the template.
pub fn escape_backslashes(text: &str) -> String {
    text.replace('\\', "\\\\")
}

/// Folded values whose placeholder sits, in `text`, where the host holds
/// their interpolation. `start` is the host offset at which `text` begins;
/// the results are byte positions in `text`, in order.
fn folded_in<'r>(
    text: &str,
    start: usize,
    replacements: &'r [Replacement],
    restored: &HashSet<usize>,
) -> Vec<(usize, &'r Replacement)> {
    let mut found = Vec::new();
    // Host bytes minus placeholder bytes of the interpolations passed so far.
    let mut shrink = 0isize;
    let mut free_from = 0usize;
    for replacement in replacements {
        let at = replacement.range.start.offset;
        if at < start {
            continue;
        }
        let Ok(pos) = usize::try_from((at - start) as isize - shrink) else {
            break;
        };
        if pos >= text.len() {
            break;
        }
        shrink += replacement.source.len() as isize - replacement.placeholder.len() as isize;
        if replacement.generated
            || replacement.placeholder.is_empty()
            || restored.contains(&replacement.key)
            || pos < free_from
        {
            continue;
        }
        if text
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(&replacement.placeholder))
        {
            free_from = pos + replacement.placeholder.len();
            found.push((pos, replacement));
        }
    }
    found
}

/// A [`Stringifier`] for roots that came from tagged templates.
pub struct EmbeddedStringifier<'s> {
    out: String,
    id: &'s str,
    states: &'s StateTable,
    active: Option<&'s ExtractedStylesheetState>,
    /// Keys of folded values already put back.
    restored: HashSet<usize>,
}

impl<'s> EmbeddedStringifier<'s> {
    pub fn new(id: &'s str, states: &'s StateTable) -> Self {
        EmbeddedStringifier {
            out: String::new(),
            id,
            states,
            active: None,
            restored: HashSet::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn is_nested(&self, root: &Root) -> bool {
        self.states.get(root.id).is_some_and(|state| state.nested)
    }

    fn restore(&mut self, text: &str, node: NodeRef<'_>, edge: Option<Edge>) -> String {
        let Some(state) = self.active else {
            return text.to_string();
        };
        let folded = match (edge, node.source().start) {
            (Some(Edge::End), _) | (_, None) => Vec::new(),
            (_, Some(start)) => folded_in(text, start.offset, &state.replacements, &self.restored),
        };

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (pos, replacement) in folded {
            out.push_str(&escape_template_text(&text[last..pos]));
            out.push_str(&replacement.source);
            last = pos + replacement.placeholder.len();
            self.restored.insert(replacement.key);
        }
        out.push_str(&escape_template_text(&text[last..]));

        for replacement in state.replacements.iter().filter(|r| r.generated) {
            out = replace_placeholder(&out, &replacement.placeholder, &replacement.source);
        }
        out
    }

    fn corrected(&self, node: NodeRef<'_>, kind: RawKind, plain: &str) -> Option<String> {
        node.raws()
            .namespaced(self.id, kind)
            .filter(|corrected| corresponds(corrected, plain))
            .map(str::to_string)
    }
}

impl Stringifier for EmbeddedStringifier<'_> {
    fn output(&mut self) -> &mut String {
        &mut self.out
    }

    fn emit(&mut self, text: &str, node: Option<NodeRef<'_>>, edge: Option<Edge>) {
        let chunk = match node {
            None | Some(NodeRef::Document(_) | NodeRef::Root(_)) => text.to_string(),
            Some(node) => self.restore(text, node, edge),
        };
        self.out.push_str(&chunk);
    }

    fn document(&mut self, node: &Document) {
        if node.nodes.iter().all(|root| self.is_nested(root)) {
            let input = node.input.as_ref().map_or("", |input| input.css.as_str());
            self.out.push_str(input);
            return;
        }
        stringifier::document(self, node);
    }

    fn root<'a>(&mut self, node: &'a Root, cx: &Context<'a>) {
        let state = self.states.get(node.id);
        if state.is_some_and(|state| state.nested) {
            return;
        }
        let previous = std::mem::replace(&mut self.active, state);

        let this = NodeRef::Root(node);
        let code_before = node.raws.code_before.as_deref().unwrap_or("");
        self.emit(code_before, Some(this), Some(Edge::Start));
        self.body(this, &node.nodes, cx);
        let after = node.raws.after.as_deref().unwrap_or("");
        let after = self
            .corrected(this, RawKind::After, after)
            .unwrap_or_else(|| after.to_string());
        if !after.is_empty() {
            self.emit(&after, None, None);
        }
        let code_after = node.raws.code_after.as_deref().unwrap_or("");
        self.emit(code_after, Some(this), Some(Edge::End));

        self.active = previous;
    }

    fn raw<'a>(
        &mut self,
        node: NodeRef<'a>,
        cx: &Context<'a>,
        own: Option<Slot>,
        detect: Detect,
    ) -> String {
        if let Some(slot) = own {
            if let (Some(kind), Some(plain)) = (slot.raw_kind(), slot.get(node.raws())) {
                if let Some(corrected) = self.corrected(node, kind, plain) {
                    return corrected;
                }
            }
        }
        stringifier::raw(self, node, cx, own, detect)
    }

    fn raw_value(&mut self, node: NodeRef<'_>, kind: RawKind) -> String {
        let plain = stringifier::raw_value(self, node, kind);
        match self.corrected(node, kind, &plain) {
            Some(corrected) => corrected,
            None if self.active.is_some() => escape_backslashes(&plain),
            None => plain,
        }
    }
}

/// Print `document` as host source.
pub fn stringify_document(document: &Document, states: &StateTable, id: &str) -> String {
    let mut s = EmbeddedStringifier::new(id, states);
    s.document(document);
    s.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_template_text() {
        assert_eq!(escape_template_text("a`b"), "a\\`b");
        assert_eq!(escape_template_text("a\\`b"), "a\\`b");
        assert_eq!(escape_template_text("a\\\\`b"), "a\\\\\\`b");
        assert_eq!(escape_template_text("${x} $y"), "\\${x} $y");
        assert_eq!(escape_template_text("'\\201C'"), "'\\201C'");
    }

    #[test]
    fn test_escape_backslashes() {
        assert_eq!(escape_backslashes(".foo\\:bar"), ".foo\\\\:bar");
        assert_eq!(escape_template_text(&escape_backslashes("a\\`")), "a\\\\\\`");
    }

    #[test]
    fn test_replace_placeholder_respects_boundaries() {
        assert_eq!(
            replace_placeholder("POSTCSS_lit_1 POSTCSS_lit_10", "POSTCSS_lit_1", "${a}"),
            "${a} POSTCSS_lit_10"
        );
        assert_eq!(
            replace_placeholder("--POSTCSS_lit_2: x", "--POSTCSS_lit_2", "${p}"),
            "${p}: x"
        );
    }

    #[test]
    fn test_corresponds() {
        assert!(corresponds("\n    a", "\n  a"));
        assert!(corresponds("  x", "x"));
        assert!(!corresponds("\n    a", "\n  b"));
        assert!(!corresponds("\n  a\n", "\n  a"));
    }

    #[test]
    fn test_empty_document_prints_input() {
        let document = Document {
            input: Some(tagstyle_css::Input {
                css: "const a = 1;".to_string(),
                file: None,
            }),
            ..Document::default()
        };
        assert_eq!(
            stringify_document(&document, &StateTable::new(), "lit"),
            "const a = 1;"
        );
    }
}
