/*
 * error.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Errors reported by stylesheet parsers.
 */

use std::fmt;

use thiserror::Error;

/// A grammar error in a stylesheet, positioned in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CssSyntaxError {
    pub reason: String,
    /// 1-indexed
    pub line: usize,
    /// 1-indexed, in bytes
    pub column: usize,
    pub offset: usize,
    pub file: Option<String>,
}

impl fmt::Display for CssSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.as_deref().unwrap_or("<css input>");
        write!(f, "{}:{}:{}: {}", file, self.line, self.column, self.reason)
    }
}

/// Failure reported by a [`crate::StyleParser`].
#[derive(Debug, Error)]
pub enum StyleParseError {
    /// The text is not valid stylesheet syntax.
    #[error(transparent)]
    Syntax(#[from] CssSyntaxError),

    /// Any other failure of the parser implementation.
    #[error("stylesheet parser failed: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StyleParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_file() {
        let mut err = CssSyntaxError {
            reason: "Unknown word".to_string(),
            line: 2,
            column: 5,
            offset: 9,
            file: None,
        };
        assert_eq!(err.to_string(), "<css input>:2:5: Unknown word");

        err.file = Some("a.ts".to_string());
        assert_eq!(err.to_string(), "a.ts:2:5: Unknown word");
    }

    #[test]
    fn test_syntax_error_converts() {
        let err: StyleParseError = CssSyntaxError {
            reason: "Unclosed block".to_string(),
            line: 1,
            column: 1,
            offset: 0,
            file: None,
        }
        .into();
        assert!(matches!(err, StyleParseError::Syntax(_)));
    }
}
