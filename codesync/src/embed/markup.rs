//! Raw markup rendering for callers without a document tree.

use crate::model::Admonition;

/// Escapes text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders an embedded file as an optional admonition followed by a
/// `<pre><code>` block.
pub fn render_markup(rationale: Option<&Admonition>, language: &str, code: &str) -> String {
    let mut out = String::new();
    if let Some(admonition) = rationale {
        out.push_str(&admonition.to_markdown());
        out.push('\n');
    }
    out.push_str(&format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        escape_html(language),
        escape_html(code)
    ));
    out
}
