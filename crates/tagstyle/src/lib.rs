/*
 * lib.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Stylesheets embedded in tagged template literals.
 */

//! Stylesheets embedded in JavaScript and TypeScript tagged templates.
//!
//! Each template whose tag matches the configuration is parsed as a
//! standalone stylesheet. Interpolations are swapped for placeholders the
//! stylesheet parser accepts, the host code's indentation is removed, and
//! afterwards every node position is moved back into the host file. Printing
//! the document reproduces the host file byte for byte, with any edits made
//! to the stylesheets in place.
//!
//! ```rust
//! use tagstyle::{Syntax, SyntaxOptions};
//!
//! let source = "const button = css`\n  .btn {\n    color: ${color};\n  }\n`;\n";
//! let syntax = Syntax::new(SyntaxOptions::new("lit").with_tags(["css"]));
//! let document = syntax.parse(source).unwrap();
//!
//! let rule = &document.roots()[0].nodes[0];
//! assert_eq!(rule.source().start.unwrap().line, 2);
//! assert_eq!(syntax.stringify(&document), source);
//! ```

pub mod comments;
pub mod document;
pub mod error;
pub mod extract;
pub mod location;
pub mod normalise;
pub mod options;
pub mod parse;
pub mod placeholders;
pub mod raws;
pub mod replacements;
pub mod state;
pub mod stringify;

pub use document::StyledDocument;
pub use error::{Error, Result};
pub use extract::{Region, extract_regions};
pub use location::{CorrectionAccumulator, correct_position, correct_root};
pub use normalise::{IndentationMap, NormalisedSource, PrefixOffset, compute_normalised_source};
pub use options::{PlaceholderRequest, SyntaxConfig, SyntaxOptions};
pub use parse::{Warning, parse_styles};
pub use placeholders::{PlaceholderPosition, compute_possible_position, create_placeholder};
pub use replacements::{KeySequence, Replacement, compute_replaced_source};
pub use state::{ExtractedStylesheetState, StateTable};
pub use stringify::{EmbeddedStringifier, stringify_document};

/// A configured embedded-stylesheet syntax.
#[derive(Debug, Clone)]
pub struct Syntax {
    options: SyntaxOptions,
}

impl Syntax {
    pub fn new(options: SyntaxOptions) -> Self {
        Syntax { options }
    }

    pub fn from_config(config: &SyntaxConfig) -> Result<Self> {
        Ok(Syntax::new(SyntaxOptions::from_config(config)?))
    }

    pub fn options(&self) -> &SyntaxOptions {
        &self.options
    }

    pub fn parse(&self, source: &str) -> Result<StyledDocument> {
        parse_styles(source, &self.options)
    }

    pub fn stringify(&self, document: &StyledDocument) -> String {
        document.to_host_string()
    }
}
