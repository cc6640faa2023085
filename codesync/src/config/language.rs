//! Language tags for embedded code blocks.

use serde::{Deserialize, Serialize};

/// Maps source file extensions to the tag written on a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Code block tag (e.g., "python", "rust").
    pub name: String,

    /// File extensions and aliases for this language.
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl Language {
    /// Creates a new Language with no extra identifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifiers: Vec::new(),
        }
    }

    /// Adds file extensions/identifiers.
    pub fn with_identifiers(mut self, identifiers: Vec<String>) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// Checks if this language matches a given identifier (case-insensitive).
    pub fn matches(&self, identifier: &str) -> bool {
        self.name.eq_ignore_ascii_case(identifier)
            || self
                .identifiers
                .iter()
                .any(|id| id.eq_ignore_ascii_case(identifier))
    }
}
