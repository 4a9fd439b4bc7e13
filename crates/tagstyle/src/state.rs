/*
 * state.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-region state kept next to each root.
 */

//! What is remembered about each parsed region, keyed by its root.

use std::collections::HashMap;

use serde::Serialize;
use tagstyle_css::RootId;

use crate::extract::Region;
use crate::normalise::{IndentationMap, PrefixOffset};
use crate::replacements::Replacement;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedStylesheetState {
    pub replacements: Vec<Replacement>,
    /// The text handed to the stylesheet parser.
    pub normalized_source: String,
    pub prefix_offset: PrefixOffset,
    pub indentation_map: IndentationMap,
    pub nested: bool,
    /// Root of the region whose interpolation holds this one.
    #[serde(skip)]
    pub enclosing: Option<RootId>,
    pub region: Region,
}

/// Region state for every root of a document.
///
/// Entries stay valid while the roots are edited, moved or removed; a root
/// without an entry is printed as plain stylesheet text.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    states: HashMap<RootId, ExtractedStylesheetState>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, root: RootId) -> Option<&ExtractedStylesheetState> {
        self.states.get(&root)
    }

    pub fn insert(&mut self, root: RootId, state: ExtractedStylesheetState) {
        self.states.insert(root, state);
    }

    pub fn remove(&mut self, root: RootId) -> Option<ExtractedStylesheetState> {
        self.states.remove(&root)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
