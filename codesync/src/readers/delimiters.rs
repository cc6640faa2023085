//! Fenced code block extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_location::TextLocation;

/// Pattern for matching code fence openings.
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>\s*)(?P<fence>`{3,}|~{3,})(?P<info>.*)$").unwrap());

/// A fenced code block extracted from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedToken {
    /// The info string from the opening fence.
    pub info: String,
    /// The content between fences, with the fence indentation stripped.
    pub content: String,
    /// The block exactly as written, fences included.
    pub raw: String,
    /// Location of the opening fence.
    pub location: TextLocation,
    /// Indentation of the code fence.
    pub indent: String,
}

/// One step of extraction.
#[derive(Debug)]
pub enum ExtractResult {
    /// A complete fenced block.
    Token(DelimitedToken),
    /// A line outside any fence.
    NotDelimited { line: String, location: TextLocation },
    /// A fence left open until end of input; its content runs to the end.
    Unclosed(DelimitedToken),
}

/// Returns true if `line` closes a fence opened with `fence_len` copies of
/// `fence_char`.
fn is_closing_fence(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= fence_len && trimmed.chars().all(|c| c == fence_char)
}

/// Extracts fenced blocks from lines.
pub struct DelimitedTokenGetter {
    /// Current line number (1-indexed).
    line_number: usize,
}

impl DelimitedTokenGetter {
    /// Creates a new getter.
    pub fn new() -> Self {
        Self { line_number: 1 }
    }

    /// Creates a new getter starting at a specific line.
    pub fn at_line(line: usize) -> Self {
        Self { line_number: line }
    }

    /// Extracts the next token from the line iterator.
    pub fn extract<'a, I>(&mut self, lines: &mut I) -> Option<ExtractResult>
    where
        I: Iterator<Item = &'a str>,
    {
        let line = lines.next()?;
        let start_line = self.line_number;
        self.line_number += 1;

        let Some(caps) = FENCE_OPEN.captures(line) else {
            return Some(ExtractResult::NotDelimited {
                line: line.to_string(),
                location: TextLocation::line_only(start_line),
            });
        };

        let indent = caps["indent"].to_string();
        let fence = &caps["fence"];
        let info = caps["info"].trim().to_string();
        let fence_char = fence.chars().next().unwrap_or('`');
        let fence_len = fence.len();

        let mut raw_lines = vec![line];
        let mut content_lines = Vec::new();

        loop {
            match lines.next() {
                Some(content_line) => {
                    self.line_number += 1;
                    raw_lines.push(content_line);

                    if is_closing_fence(content_line, fence_char, fence_len) {
                        return Some(ExtractResult::Token(DelimitedToken {
                            info,
                            content: content_lines.join("\n"),
                            raw: raw_lines.join("\n"),
                            location: TextLocation::line_only(start_line),
                            indent,
                        }));
                    }

                    let stripped = content_line.strip_prefix(indent.as_str()).unwrap_or(content_line);
                    content_lines.push(stripped);
                }
                None => {
                    return Some(ExtractResult::Unclosed(DelimitedToken {
                        info,
                        content: content_lines.join("\n"),
                        raw: raw_lines.join("\n"),
                        location: TextLocation::line_only(start_line),
                        indent,
                    }));
                }
            }
        }
    }
}

impl Default for DelimitedTokenGetter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to extract all tokens from a string.
pub fn extract_all_tokens(input: &str) -> Vec<ExtractResult> {
    let mut getter = DelimitedTokenGetter::new();
    let mut lines = input.lines().peekable();
    let mut results = Vec::new();

    while lines.peek().is_some() {
        if let Some(result) = getter.extract(&mut lines) {
            results.push(result);
        }
    }

    results
}
