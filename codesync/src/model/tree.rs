//! Block-level document tree.
//!
//! A documentation page is a flat sequence of block nodes. Nodes read from
//! the source keep their original text so an untouched document serializes
//! back byte-for-byte (modulo the trailing newline).

use crate::text_location::TextLocation;

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNode {
    /// Language tag.
    pub lang: Option<String>,
    /// Rest of the info string after the language.
    pub meta: Option<String>,
    /// Code content.
    pub value: String,
    /// Original text, when read from a document.
    pub raw: Option<String>,
}

impl CodeNode {
    /// Creates a generated code block.
    pub fn new(lang: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            meta: None,
            value: value.into(),
            raw: None,
        }
    }

    /// Returns the shortest backtick fence that cannot be closed from inside
    /// the content.
    fn fence(&self) -> String {
        let longest_run = self
            .value
            .lines()
            .map(|l| {
                let t = l.trim_start();
                t.len() - t.trim_start_matches('`').len()
            })
            .max()
            .unwrap_or(0);
        "`".repeat(longest_run.max(2) + 1)
    }

    fn to_markdown(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let fence = self.fence();
        let mut info = self.lang.clone().unwrap_or_default();
        if let Some(meta) = &self.meta {
            info.push(' ');
            info.push_str(meta);
        }
        if self.value.is_empty() {
            format!("{}{}\n{}", fence, info, fence)
        } else {
            format!("{}{}\n{}\n{}", fence, info, self.value, fence)
        }
    }
}

/// A titled callout block (`:::kind[title]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admonition {
    /// Admonition kind, e.g. `info` or `danger`.
    pub kind: String,
    /// Title shown in the callout header.
    pub title: String,
    /// Markdown body.
    pub body: String,
}

impl Admonition {
    /// Creates an admonition.
    pub fn new(kind: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Renders the admonition as markdown, followed by a blank line.
    pub fn to_markdown(&self) -> String {
        format!(
            ":::{}[{}]\n\n{}\n\n:::\n",
            self.kind,
            self.title,
            self.body.trim()
        )
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// YAML frontmatter content, without the `---` delimiters.
    Frontmatter(String),
    /// A run of prose lines, verbatim.
    Text(String),
    /// A block-level HTML/JSX element, verbatim.
    Html {
        value: String,
        location: TextLocation,
    },
    /// A fenced code block.
    Code(CodeNode),
    /// A callout block.
    Admonition(Admonition),
    /// A visible marker for a directive that could not be rendered.
    EmbedError(String),
}

impl Node {
    /// Renders this node as markdown.
    pub fn to_markdown(&self) -> String {
        match self {
            Node::Frontmatter(content) => format!("---\n{}\n---", content),
            Node::Text(text) => text.clone(),
            Node::Html { value, .. } => value.clone(),
            Node::Code(code) => code.to_markdown(),
            Node::Admonition(admonition) => admonition.to_markdown(),
            Node::EmbedError(message) => error_markup(message),
        }
    }

    /// Returns true if this node is an HTML/JSX element.
    pub fn is_html(&self) -> bool {
        matches!(self, Node::Html { .. })
    }
}

/// Markup shown in place of a directive that failed to render.
pub fn error_markup(message: &str) -> String {
    Admonition::new("danger", "Embed error", message).to_markdown()
}

/// A parsed documentation page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    /// Top-level block nodes in document order.
    pub children: Vec<Node>,
}

impl DocumentTree {
    /// Creates a tree from nodes.
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Returns `(index, node)` for every node satisfying `predicate`, in
    /// document order.
    pub fn visit<F>(&self, predicate: F) -> Vec<(usize, &Node)>
    where
        F: Fn(&Node) -> bool,
    {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, n)| predicate(n))
            .collect()
    }

    /// Replaces the node at `index` with `replacement`, in order.
    pub fn splice(&mut self, index: usize, replacement: Vec<Node>) {
        self.children.splice(index..=index, replacement);
    }

    /// Serializes the tree back to markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = self
            .children
            .iter()
            .map(Node::to_markdown)
            .collect::<Vec<_>>()
            .join("\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_code_node() {
        let node = CodeNode::new("python", "print('hi')");
        assert_eq!(node.to_markdown(), "```python\nprint('hi')\n```");
    }

    #[test]
    fn test_code_node_fence_grows() {
        let node = CodeNode::new("markdown", "```python\nx\n```");
        assert_eq!(node.to_markdown(), "````markdown\n```python\nx\n```\n````");
    }

    #[test]
    fn test_code_node_raw_preserved() {
        let mut node = CodeNode::new("python", "x");
        node.raw = Some("~~~ python title=\"x\"\nx\n~~~".to_string());
        assert_eq!(node.to_markdown(), "~~~ python title=\"x\"\nx\n~~~");
    }

    #[test]
    fn test_admonition() {
        let node = Admonition::new("info", "Design Rationale", "\nBecause.\n");
        assert_eq!(node.to_markdown(), ":::info[Design Rationale]\n\nBecause.\n\n:::\n");
    }

    #[test]
    fn test_splice_keeps_order() {
        let mut tree = DocumentTree::new(vec![
            Node::Text("a".to_string()),
            Node::Text("b".to_string()),
            Node::Text("c".to_string()),
        ]);
        tree.splice(
            1,
            vec![Node::Text("b1".to_string()), Node::Text("b2".to_string())],
        );

        assert_eq!(tree.to_markdown(), "a\nb1\nb2\nc\n");
    }

    #[test]
    fn test_visit_reports_indices() {
        let tree = DocumentTree::new(vec![
            Node::Text("a".to_string()),
            Node::Html {
                value: "<br/>".to_string(),
                location: TextLocation::line_only(2),
            },
        ]);
        let html = tree.visit(Node::is_html);
        assert_eq!(html.len(), 1);
        assert_eq!(html[0].0, 1);
    }
}
