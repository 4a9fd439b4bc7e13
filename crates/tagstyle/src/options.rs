/*
 * options.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Syntax configuration and runtime options.
 */

//! Configuration for extracting embedded stylesheets.
//!
//! [`SyntaxConfig`] is the serializable part, suitable for configuration
//! files. [`SyntaxOptions`] is what the pipeline runs with; it adds the
//! pluggable pieces (placeholder function, evaluator, parser) that cannot be
//! written down in a file.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tagstyle_css::{CssParser, ParseOptions, StyleParser};
use tagstyle_host::{Dialect, ExprId, HostAst, HostOptions};

use crate::error::{Error, Result};

/// Everything a placeholder function gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderRequest<'a> {
    /// Position of the interpolation within its template.
    pub index: usize,
    /// Sequence number unique within the document.
    pub key: usize,
    /// Identifier of the syntax, used in generated placeholder names.
    pub id: &'a str,
    pub expr: ExprId,
    pub ast: &'a HostAst,
    /// The substituted text of the template up to the interpolation.
    pub prefix: &'a str,
    /// The raw text of the template fragment following the interpolation.
    pub suffix: &'a str,
}

pub type PlaceholderFn = Arc<dyn Fn(&PlaceholderRequest<'_>) -> String + Send + Sync>;

/// Folds an expression to the text it would produce, if known.
pub type EvaluatorFn = Arc<dyn Fn(&HostAst, ExprId) -> Option<String> + Send + Sync>;

/// Serializable settings, as read from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    /// Namespaces placeholder names, raw keys and the disable comment.
    pub id: String,
    /// Tag matchers; a trailing `*` matches any tag with that prefix.
    pub tag_names: Vec<String>,
    pub dialect: Dialect,
    /// File name reported in diagnostics.
    pub from: Option<String>,
    pub fold_constants: bool,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        SyntaxConfig {
            id: "lit".to_string(),
            tag_names: vec!["css".to_string()],
            dialect: Dialect::default(),
            from: None,
            fold_constants: true,
        }
    }
}

/// Runtime options for [`crate::Syntax`].
#[derive(Clone)]
pub struct SyntaxOptions {
    pub id: String,
    pub tag_names: Vec<String>,
    pub host: HostOptions,
    pub parse: ParseOptions,
    /// Replaces the built-in placeholder selection entirely.
    pub placeholder: Option<PlaceholderFn>,
    /// Replaces the built-in constant folding.
    pub evaluator: Option<EvaluatorFn>,
    pub fold_constants: bool,
    pub parser: Arc<dyn StyleParser + Send + Sync>,
}

impl SyntaxOptions {
    pub fn new(id: impl Into<String>) -> Self {
        SyntaxOptions {
            id: id.into(),
            tag_names: Vec::new(),
            host: HostOptions::default(),
            parse: ParseOptions::default(),
            placeholder: None,
            evaluator: None,
            fold_constants: true,
            parser: Arc::new(CssParser),
        }
    }

    pub fn from_config(config: &SyntaxConfig) -> Result<Self> {
        if config.id.is_empty() {
            return Err(Error::Config("`id` must not be empty".to_string()));
        }
        let mut options = SyntaxOptions::new(config.id.clone()).with_tags(config.tag_names.clone());
        options.host.dialect = config.dialect;
        options.parse.from = config.from.clone();
        options.fold_constants = config.fold_constants;
        Ok(options)
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_names = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.host.dialect = dialect;
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.parse.from = Some(from.into());
        self
    }

    pub fn with_placeholder<F>(mut self, placeholder: F) -> Self
    where
        F: Fn(&PlaceholderRequest<'_>) -> String + Send + Sync + 'static,
    {
        self.placeholder = Some(Arc::new(placeholder));
        self
    }

    pub fn with_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&HostAst, ExprId) -> Option<String> + Send + Sync + 'static,
    {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: StyleParser + Send + Sync + 'static,
    {
        self.parser = Arc::new(parser);
        self
    }

    pub fn without_folding(mut self) -> Self {
        self.fold_constants = false;
        self
    }
}

impl fmt::Debug for SyntaxOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxOptions")
            .field("id", &self.id)
            .field("tag_names", &self.tag_names)
            .field("host", &self.host)
            .field("parse", &self.parse)
            .field("placeholder", &self.placeholder.as_ref().map(|_| "<fn>"))
            .field("evaluator", &self.evaluator.as_ref().map(|_| "<fn>"))
            .field("fold_constants", &self.fold_constants)
            .finish_non_exhaustive()
    }
}
