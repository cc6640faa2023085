//! Error types for the codesync system.

use std::path::PathBuf;
use thiserror::Error;

use crate::text_location::TextLocation;

/// Main error type for codesync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not inside the code library {root}")]
    OutsideLibrary { path: PathBuf, root: PathBuf },

    #[error("Missing required attribute `{name}` at {location}")]
    MissingAttribute { name: String, location: TextLocation },

    #[error("Invalid attribute list at {location}: {message}")]
    InvalidAttribute {
        location: TextLocation,
        message: String,
    },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Host pipeline error: {0}")]
    Host(String),

    #[error("{0}")]
    Other(String),
}

impl From<notify::Error> for SyncError {
    fn from(e: notify::Error) -> Self {
        SyncError::Watch(e.to_string())
    }
}

/// Result type alias for codesync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
