//! Embed directives written by documentation authors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SyncError};
use crate::readers::Attributes;
use crate::text_location::TextLocation;

/// Self-closing `<Embed ... />` tag; `attrs` captures the attribute list.
pub static EMBED_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Embed\b(?P<attrs>[^>]*?)/>").unwrap());

/// A parsed `<Embed filePath="..." language="..." showRationale="..." />`.
///
/// Parsed fresh on every render pass; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedDirective {
    /// Path of the embedded file, relative to the project root.
    pub file_path: String,
    /// Declared language tag, if any.
    pub language: Option<String>,
    /// Whether the rationale section is shown.
    pub show_rationale: bool,
    /// Where the directive appears.
    pub location: TextLocation,
}

impl EmbedDirective {
    /// Parses a directive from its attribute list.
    pub fn from_attributes(attrs: &str, location: TextLocation) -> Result<Self> {
        let attrs = Attributes::parse(attrs).map_err(|message| SyncError::InvalidAttribute {
            location: location.clone(),
            message,
        })?;

        let file_path = attrs
            .get("filePath")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| SyncError::MissingAttribute {
                name: "filePath".to_string(),
                location: location.clone(),
            })?
            .to_string();

        let language = attrs
            .get("language")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(Self {
            file_path,
            language,
            show_rationale: attrs.get_bool("showRationale").unwrap_or(true),
            location,
        })
    }

    /// Parses the first directive found in `text`.
    pub fn parse(text: &str, location: TextLocation) -> Result<Self> {
        let caps = EMBED_TAG.captures(text).ok_or_else(|| SyncError::InvalidAttribute {
            location: location.clone(),
            message: "not a self-closing <Embed /> tag".to_string(),
        })?;
        Self::from_attributes(&caps["attrs"], location)
    }
}

/// Returns true if `text` is exactly one self-closing embed tag.
pub fn is_embed_block(text: &str) -> bool {
    let trimmed = text.trim();
    EMBED_TAG
        .find(trimmed)
        .map(|m| m.start() == 0 && m.end() == trimmed.len())
        .unwrap_or(false)
}
