/*
 * error.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Errors from parsing host programs.
 */

//! Error types for the host front-end.

use thiserror::Error;

/// Errors that can occur while building a [`crate::HostAst`].
#[derive(Debug, Error)]
pub enum HostError {
    /// The grammar for the requested dialect could not be loaded.
    #[error("Failed to load {dialect} grammar: {message}")]
    GrammarLoad { dialect: String, message: String },

    /// Tree-sitter produced no tree (cancelled or timed out).
    #[error("Tree-sitter parse failed for {dialect} source")]
    ParseFailed { dialect: String },
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
