/*
 * config.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Syntax settings from TOML files and command-line flags.
 */

//! Building syntax options from a config file and command-line flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tagstyle::{SyntaxConfig, SyntaxOptions};
use tagstyle_host::Dialect;

use crate::SyntaxArgs;

pub fn parse_dialect(value: &str) -> Result<Dialect, String> {
    match value.to_ascii_lowercase().as_str() {
        "javascript" | "js" => Ok(Dialect::JavaScript),
        "typescript" | "ts" => Ok(Dialect::TypeScript),
        "tsx" => Ok(Dialect::Tsx),
        other => Err(format!(
            "unknown dialect '{other}' (expected javascript, typescript or tsx)"
        )),
    }
}

pub fn load_config(path: &Path) -> Result<SyntaxConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Settings for `args`: the config file if given, then flags on top.
///
/// Without a config file or `--dialect`, the dialect follows the input's
/// extension.
pub fn resolve_config(args: &SyntaxArgs) -> Result<SyntaxConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = SyntaxConfig::default();
            if let Some(dialect) = args
                .input
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Dialect::from_extension)
            {
                config.dialect = dialect;
            }
            config
        }
    };

    if let Some(id) = &args.id {
        config.id = id.clone();
    }
    if !args.tags.is_empty() {
        config.tag_names = args.tags.clone();
    }
    if let Some(dialect) = args.dialect {
        config.dialect = dialect;
    }
    if config.from.is_none() {
        config.from = Some(args.input.display().to_string());
    }
    Ok(config)
}

pub fn resolve_options(args: &SyntaxArgs) -> Result<SyntaxOptions> {
    let config = resolve_config(args)?;
    tracing::debug!(?config, "resolved syntax config");
    Ok(SyntaxOptions::from_config(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(input: &str) -> SyntaxArgs {
        SyntaxArgs {
            input: PathBuf::from(input),
            config: None,
            id: None,
            tags: Vec::new(),
            dialect: None,
            compact: false,
        }
    }

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(resolve_config(&args("a.js")).unwrap().dialect, Dialect::JavaScript);
        assert_eq!(resolve_config(&args("a.ts")).unwrap().dialect, Dialect::TypeScript);
        assert_eq!(resolve_config(&args("a.vue")).unwrap().dialect, Dialect::Tsx);
    }

    #[test]
    fn test_flags_override() {
        let mut a = args("a.js");
        a.id = Some("styled".to_string());
        a.tags = vec!["styled.*".to_string()];
        a.dialect = Some(Dialect::Tsx);
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.id, "styled");
        assert_eq!(config.tag_names, vec!["styled.*"]);
        assert_eq!(config.dialect, Dialect::Tsx);
        assert_eq!(config.from.as_deref(), Some("a.js"));
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!(parse_dialect("TS"), Ok(Dialect::TypeScript));
        assert!(parse_dialect("coffee").is_err());
    }
}
