//! Decides whether a document embeds a given source file.
//!
//! Authors may address a file three ways in an `<Embed filePath="..."/>`
//! directive: with the library directory prefix, relative to the library, or
//! by any path ending in the bare file name. The last form survives directory
//! reorganizations but matches every file sharing that name; those false
//! positives only cause an extra re-render and are accepted.

use regex::{Regex, RegexBuilder};

/// Matches embed directives referencing one library-relative path.
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    patterns: Vec<Regex>,
}

/// Builds a case-insensitive pattern for a directive whose `filePath`
/// attribute value satisfies `value_pattern`.
///
/// The value may be written `"v"`, `'v'`, `{"v"}`, `{'v'}` or bare, the
/// same forms the attribute parser reads.
fn directive_pattern(value_pattern: &str) -> Option<Regex> {
    let source = format!(
        r#"<Embed\b[^>]*?\bfilePath\s*=\s*(?:\{{\s*)?["']?{}(?:["'}}\s/>]|$)"#,
        value_pattern
    );
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| tracing::debug!("Skipping reference pattern: {}", e))
        .ok()
}

impl ReferenceMatcher {
    /// Creates a matcher for `relative_path` inside the library named
    /// `library_name`.
    pub fn new(library_name: &str, relative_path: &str) -> Self {
        let relative = relative_path.trim_start_matches('/');
        let file_name = relative.rsplit('/').next().unwrap_or(relative);

        let full = format!(
            "{}/{}",
            regex::escape(library_name.trim_end_matches('/')),
            regex::escape(relative)
        );
        let bare = regex::escape(relative);
        let suffix = format!(r#"[^"'{{}}\s>]*/{}"#, regex::escape(file_name));

        let patterns = [full, bare, suffix]
            .iter()
            .filter_map(|p| directive_pattern(p))
            .collect();

        Self { patterns }
    }

    /// Returns true if the document text embeds the file.
    pub fn is_match(&self, document_text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(document_text))
    }
}

/// Returns true if `document_text` embeds `relative_path` from the library
/// named `library_name`.
pub fn matches(document_text: &str, relative_path: &str, library_name: &str) -> bool {
    ReferenceMatcher::new(library_name, relative_path).is_match(document_text)
}
