//! Separation of a design rationale section from embedded source text.
//!
//! A rationale section opens with a line holding a bolded label followed by a
//! colon, either inside the bold (`**Design Rationale:**`) or right after it
//! (`**设计理由**：`). The line may carry a comment or list lead (`#`, `//`,
//! `--`, `>`, `-`). The section runs until the next bolded label line at the
//! same indentation, or to the end of the file.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Result;

/// Any bolded label line; `indent` is compared against the opening line.
static BOLD_LABEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?:#+|//+|--|>|-)?[ \t]*\*\*[^*]+?(?:[:：][ \t]*\*\*|\*\*[ \t]*[:：])")
        .unwrap()
});

/// Raw source split into display code and an optional rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSource {
    /// Rationale text, trimmed. `None` when no label was found or the
    /// section holds only whitespace.
    pub rationale: Option<String>,
    /// The raw text with the rationale span removed, trimmed.
    pub code: String,
    /// Byte range of the removed span in the raw text.
    pub span: Option<Range<usize>>,
}

/// Finds rationale sections opened by a fixed set of labels.
#[derive(Debug, Clone)]
pub struct RationaleSplitter {
    /// `None` when no labels are configured.
    label_line: Option<Regex>,
}

impl RationaleSplitter {
    /// Creates a splitter recognizing `labels`.
    pub fn new(labels: &[String]) -> Result<Self> {
        let alternatives = labels
            .iter()
            .map(|l| regex::escape(l.trim()))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();

        if alternatives.is_empty() {
            return Ok(Self { label_line: None });
        }

        let labels = alternatives.join("|");
        let label_line = Regex::new(&format!(
            r"^(?P<indent>[ \t]*)(?:#+|//+|--|>|-)?[ \t]*\*\*[ \t]*(?:{labels})[ \t]*(?:[:：][ \t]*\*\*|\*\*[ \t]*[:：])(?P<rest>.*)$"
        ))?;

        Ok(Self {
            label_line: Some(label_line),
        })
    }

    /// Splits `raw` into rationale and display code.
    pub fn split(&self, raw: &str) -> SplitSource {
        let lines: Vec<(usize, &str)> = raw
            .split_inclusive('\n')
            .scan(0, |offset, line| {
                let start = *offset;
                *offset += line.len();
                Some((start, line))
            })
            .collect();

        let opening = self.label_line.as_ref().and_then(|label_line| {
            lines.iter().enumerate().find_map(|(i, (_, line))| {
                label_line
                    .captures(strip_eol(line))
                    .map(|caps| (i, caps["indent"].to_string(), caps["rest"].to_string()))
            })
        });

        let Some((first, indent, rest)) = opening else {
            return SplitSource {
                rationale: None,
                code: raw.trim().to_string(),
                span: None,
            };
        };

        let end = lines[first + 1..]
            .iter()
            .position(|(_, line)| {
                BOLD_LABEL_LINE
                    .captures(strip_eol(line))
                    .is_some_and(|caps| caps["indent"] == indent)
            })
            .map(|p| first + 1 + p)
            .unwrap_or(lines.len());

        let mut captured = vec![rest.as_str()];
        captured.extend(lines[first + 1..end].iter().map(|(_, line)| strip_eol(line)));
        let rationale = captured.join("\n").trim().to_string();

        let span_start = lines[first].0;
        let span_end = lines.get(end).map(|(offset, _)| *offset).unwrap_or(raw.len());

        let mut code = String::with_capacity(raw.len());
        code.push_str(&raw[..span_start]);
        code.push_str(&raw[span_end..]);

        SplitSource {
            rationale: (!rationale.is_empty()).then_some(rationale),
            code: code.trim().to_string(),
            span: Some(span_start..span_end),
        }
    }
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

/// Splits `raw` using the given rationale labels.
pub fn split_rationale(raw: &str, labels: &[String]) -> Result<SplitSource> {
    Ok(RationaleSplitter::new(labels)?.split(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels() -> Vec<String> {
        vec!["Design Rationale".to_string(), "设计理由".to_string()]
    }

    const CALC: &str = "\"\"\"\nCalculator helpers.\n\n**Design Rationale:**\nFloats are enough here.\n\n**Usage:**\nadd(1, 2)\n\"\"\"\n\ndef add(a, b):\n    return a + b\n";

    #[test]
    fn test_split_with_following_label() {
        let split = split_rationale(CALC, &labels()).unwrap();

        assert_eq!(split.rationale.as_deref(), Some("Floats are enough here."));
        assert_eq!(
            split.code,
            "\"\"\"\nCalculator helpers.\n\n**Usage:**\nadd(1, 2)\n\"\"\"\n\ndef add(a, b):\n    return a + b"
        );
    }

    #[test]
    fn test_span_reconstructs_original() {
        let split = split_rationale(CALC, &labels()).unwrap();
        let span = split.span.clone().unwrap();

        let removed = &CALC[span.clone()];
        assert!(removed.starts_with("**Design Rationale:**"));
        assert!(removed.contains("Floats are enough here."));

        let rebuilt = format!("{}{}{}", &CALC[..span.start], removed, &CALC[span.end..]);
        assert_eq!(rebuilt, CALC);
        assert_eq!(format!("{}{}", &CALC[..span.start], &CALC[span.end..]).trim(), split.code);
    }

    #[test]
    fn test_no_label() {
        let split = split_rationale("\n  x = 1\n\n", &labels()).unwrap();
        assert_eq!(split.rationale, None);
        assert_eq!(split.code, "x = 1");
        assert_eq!(split.span, None);
    }

    #[test]
    fn test_label_without_colon_is_not_a_section() {
        let raw = "**Design Rationale**\nNot captured.\n";
        let split = split_rationale(raw, &labels()).unwrap();
        assert_eq!(split.rationale, None);
        assert_eq!(split.code, raw.trim());
    }

    #[test]
    fn test_full_width_colon_after_bold() {
        let raw = "x = 1\n\n**设计理由**：保持简单。\n";
        let split = split_rationale(raw, &labels()).unwrap();
        assert_eq!(split.rationale.as_deref(), Some("保持简单。"));
        assert_eq!(split.code, "x = 1");
    }

    #[test]
    fn test_runs_to_end_of_file() {
        let raw = "def f():\n    pass\n\n# **Design Rationale:**\n# Kept tiny.\n# Really.\n";
        let split = split_rationale(raw, &labels()).unwrap();
        assert_eq!(split.rationale.as_deref(), Some("# Kept tiny.\n# Really."));
        assert_eq!(split.code, "def f():\n    pass");
    }

    #[test]
    fn test_boundary_needs_same_indentation() {
        let raw = "def f():\n    \"\"\"\n    **Design Rationale:**\n    Nested.\n  **Aside:** not a boundary\n    **Returns:**\n    None\n    \"\"\"\n";
        let split = split_rationale(raw, &labels()).unwrap();

        assert_eq!(
            split.rationale.as_deref(),
            Some("Nested.\n  **Aside:** not a boundary")
        );
        assert_eq!(
            split.code,
            "def f():\n    \"\"\"\n    **Returns:**\n    None\n    \"\"\""
        );
    }

    #[test]
    fn test_whitespace_only_section_is_absent() {
        let raw = "x = 1\n**Design Rationale:**\n   \n**Usage:**\ny\n";
        let split = split_rationale(raw, &labels()).unwrap();
        assert_eq!(split.rationale, None);
        assert_eq!(split.code, "x = 1\n**Usage:**\ny");
    }

    #[test]
    fn test_crlf_lines() {
        let raw = "x = 1\r\n**Design Rationale:**\r\nWhy.\r\n";
        let split = split_rationale(raw, &labels()).unwrap();
        assert_eq!(split.rationale.as_deref(), Some("Why."));
        assert_eq!(split.code, "x = 1");
    }

    #[test]
    fn test_no_labels_configured() {
        let split = split_rationale("**Design Rationale:**\nWhy.", &[]).unwrap();
        assert_eq!(split.rationale, None);
    }
}
