/*
 * error.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Errors of the embedded stylesheet syntax.
 */

//! Error types for tagstyle.
//!
//! Problems inside a single embedded stylesheet never surface here; they
//! become [`crate::Warning`]s on the parsed document instead.

use tagstyle_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host document could not be read at all.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The configuration cannot be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
