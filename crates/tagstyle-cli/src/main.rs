/*
 * main.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Entry point of the tagstyle command-line tool.
 */

//! tagstyle CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "tagstyle")]
#[command(version)]
#[command(about = "Inspect stylesheets embedded in tagged template literals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SyntaxArgs {
    /// JavaScript or TypeScript file to read
    pub input: PathBuf,

    /// TOML file with syntax settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Syntax id used in placeholders and disable comments
    #[arg(long)]
    pub id: Option<String>,

    /// Tag to extract (repeatable); a trailing `*` matches a prefix
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Host dialect (javascript, typescript, tsx); guessed from the file
    /// extension when omitted
    #[arg(long, value_parser = config::parse_dialect)]
    pub dialect: Option<tagstyle_host::Dialect>,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the templates that would be parsed as stylesheets
    Regions(SyntaxArgs),

    /// Print every stylesheet node with its position in the input file
    Locations(SyntaxArgs),

    /// Parse and print the file again, failing if the output differs
    Roundtrip(SyntaxArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagstyle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Regions(args) => commands::regions::execute(&args),
        Commands::Locations(args) => commands::locations::execute(&args),
        Commands::Roundtrip(args) => commands::roundtrip::execute(&args),
    }
}
