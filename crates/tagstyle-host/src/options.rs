/*
 * options.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Host dialects and parsing options.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// The grammar used to read the host document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    JavaScript,
    TypeScript,
    /// TypeScript with JSX, which also accepts most plain JavaScript.
    #[default]
    Tsx,
}

impl Dialect {
    pub fn language(self) -> Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Guess a dialect from a file extension.
    pub fn from_extension(ext: &str) -> Option<Dialect> {
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Some(Dialect::JavaScript),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::JavaScript => "javascript",
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        };
        f.write_str(name)
    }
}

/// Options for reading a host document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOptions {
    pub dialect: Dialect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(Dialect::from_extension("ts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_extension("jsx"), Some(Dialect::JavaScript));
        assert_eq!(Dialect::from_extension("css"), None);
    }

    #[test]
    fn test_dialect_deserializes_lowercase() {
        let options: HostOptions = serde_json::from_str(r#"{"dialect": "typescript"}"#).unwrap();
        assert_eq!(options.dialect, Dialect::TypeScript);

        let options: HostOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.dialect, Dialect::Tsx);
        assert_eq!(options.dialect.to_string(), "tsx");
    }
}
