/*
 * mod.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Subcommand implementations and shared input/output helpers.
 */

//! Command implementations for the tagstyle CLI
//!
//! Each command reads one input file, runs the library and prints JSON to
//! stdout.

pub mod locations;
pub mod regions;
pub mod roundtrip;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub(crate) fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
