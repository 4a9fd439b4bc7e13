/*
 * regions.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * The `regions` command: templates selected for parsing.
 */

use anyhow::Result;
use serde::Serialize;
use tagstyle::{Region, extract_regions};
use tagstyle_host::HostAst;

use super::{print_json, read_input};
use crate::SyntaxArgs;
use crate::config::resolve_options;

#[derive(Serialize)]
struct RegionsReport<'a> {
    file: String,
    regions: &'a [Region],
}

pub fn execute(args: &SyntaxArgs) -> Result<()> {
    let options = resolve_options(args)?;
    let source = read_input(&args.input)?;
    let ast = HostAst::parse(&source, &options.host)?;
    if ast.has_errors() {
        tracing::warn!(file = %args.input.display(), "host file has syntax errors");
    }
    let regions = extract_regions(&ast, &options);
    print_json(
        &RegionsReport {
            file: args.input.display().to_string(),
            regions: &regions,
        },
        args.compact,
    )
}
