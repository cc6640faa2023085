//! Markdown parsing into a block-level document tree.

use std::path::Path;

use crate::errors::Result;
use crate::io::FileCache;
use crate::model::{is_embed_block, CodeNode, DocumentTree, Node};
use crate::text_location::TextLocation;

use super::delimiters::{DelimitedToken, DelimitedTokenGetter, ExtractResult};

/// Accumulates consecutive prose lines and pending multi-line directives.
struct TreeBuilder<'p> {
    children: Vec<Node>,
    text: Vec<String>,
    pending_tag: Vec<String>,
    pending_location: TextLocation,
    source_path: Option<&'p Path>,
}

impl<'p> TreeBuilder<'p> {
    fn new(source_path: Option<&'p Path>) -> Self {
        Self {
            children: Vec::new(),
            text: Vec::new(),
            pending_tag: Vec::new(),
            pending_location: TextLocation::default(),
            source_path,
        }
    }

    fn locate(&self, location: TextLocation) -> TextLocation {
        match self.source_path {
            Some(path) => TextLocation::file_line(path.to_path_buf(), location.line),
            None => location,
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.children.push(Node::Text(self.text.join("\n")));
            self.text.clear();
        }
    }

    /// An unterminated tag is just prose.
    fn abandon_tag(&mut self) {
        self.text.append(&mut self.pending_tag);
    }

    fn push_html(&mut self, value: String, location: TextLocation) {
        self.flush_text();
        let location = self.locate(location);
        self.children.push(Node::Html { value, location });
    }

    fn push_line(&mut self, line: String, location: TextLocation) {
        if !self.pending_tag.is_empty() {
            let closes = line.contains("/>");
            self.pending_tag.push(line);
            if closes {
                let candidate = self.pending_tag.join("\n");
                if is_embed_block(&candidate) {
                    self.pending_tag.clear();
                    let location = self.pending_location.clone();
                    self.push_html(candidate, location);
                } else {
                    self.abandon_tag();
                }
            } else if self.pending_tag.last().is_some_and(|l| l.contains('>')) {
                self.abandon_tag();
            }
            return;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with("<Embed") {
            if is_embed_block(&line) {
                self.push_html(line, location);
                return;
            }
            if !line.contains('>') {
                self.pending_tag.push(line);
                self.pending_location = location;
                return;
            }
        }
        self.text.push(line);
    }

    fn push_code(&mut self, token: DelimitedToken) {
        self.abandon_tag();
        self.flush_text();

        let mut info = token.info.splitn(2, char::is_whitespace);
        let lang = info.next().filter(|l| !l.is_empty()).map(str::to_string);
        let meta = info
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        self.children.push(Node::Code(CodeNode {
            lang,
            meta,
            value: token.content,
            raw: Some(token.raw),
        }));
    }

    fn finish(mut self) -> DocumentTree {
        self.abandon_tag();
        self.flush_text();
        DocumentTree::new(self.children)
    }
}

/// Splits YAML frontmatter off the top of a document.
///
/// Returns the frontmatter content, the remaining text, and the number of
/// lines consumed.
fn split_frontmatter(input: &str) -> (Option<String>, &str, usize) {
    let Some(rest) = input
        .strip_prefix("---\n")
        .or_else(|| input.strip_prefix("---\r\n"))
    else {
        return (None, input, 0);
    };

    let mut offset = 0;
    for (i, line) in rest.split_inclusive('\n').enumerate() {
        if line.trim_end() == "---" {
            let content = rest[..offset].trim_end_matches(['\n', '\r']).to_string();
            return (Some(content), &rest[offset + line.len()..], i + 2);
        }
        offset += line.len();
    }

    (None, input, 0)
}

/// Parses a markdown document into a tree.
pub fn parse_document(input: &str, source_path: Option<&Path>) -> DocumentTree {
    let mut builder = TreeBuilder::new(source_path);

    let (frontmatter, body, consumed) = split_frontmatter(input);
    if let Some(content) = frontmatter {
        builder.children.push(Node::Frontmatter(content));
    }

    let mut getter = DelimitedTokenGetter::at_line(consumed + 1);
    let mut lines = body.lines().peekable();

    while lines.peek().is_some() {
        match getter.extract(&mut lines) {
            Some(ExtractResult::NotDelimited { line, location }) => builder.push_line(line, location),
            Some(ExtractResult::Token(token)) | Some(ExtractResult::Unclosed(token)) => {
                builder.push_code(token)
            }
            None => break,
        }
    }

    builder.finish()
}

/// Reads a markdown file and parses it.
pub fn read_document(path: &Path, files: &dyn FileCache) -> Result<DocumentTree> {
    let content = files.read(path)?;
    Ok(parse_document(&content, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::VirtualFS;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_roundtrip_untouched() {
        let input = "---\ntitle: Strategy\n---\n\n# Strategy\n\nSome text.\n\n```python title=\"x\"\nprint('x')\n```\n\n<Embed filePath=\"code_library/a.py\" />\n\nDone.\n";
        let tree = parse_document(input, None);
        assert_eq!(tree.to_markdown(), input);
    }

    #[test]
    fn test_nodes() {
        let input = "# T\n\n<Embed filePath=\"a.py\" />\n\n```rust\nfn main() {}\n```\n";
        let tree = parse_document(input, None);

        assert_eq!(tree.children.len(), 4);
        assert_eq!(tree.children[0], Node::Text("# T\n".to_string()));
        assert!(tree.children[1].is_html());
        assert_eq!(tree.children[2], Node::Text(String::new()));
        match &tree.children[3] {
            Node::Code(code) => {
                assert_eq!(code.lang.as_deref(), Some("rust"));
                assert_eq!(code.value, "fn main() {}");
            }
            other => panic!("Expected code, got {:?}", other),
        }
    }

    #[test]
    fn test_directive_location_after_frontmatter() {
        let input = "---\na: 1\n---\n<Embed filePath=\"a.py\" />\n";
        let tree = parse_document(input, Some(Path::new("docs/p.md")));

        let html = tree.visit(Node::is_html);
        match html[0].1 {
            Node::Html { location, .. } => {
                assert_eq!(location.line, 4);
                assert_eq!(location.filename, Some(PathBuf::from("docs/p.md")));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_multiline_directive() {
        let input = "<Embed\n  filePath=\"a.py\"\n  language=\"python\"\n/>\ntext\n";
        let tree = parse_document(input, None);

        assert!(tree.children[0].is_html());
        assert_eq!(tree.children[1], Node::Text("text".to_string()));
        assert_eq!(tree.to_markdown(), input);
    }

    #[test]
    fn test_unterminated_directive_is_text() {
        let input = "<Embed\n  filePath=\"a.py\"\n";
        let tree = parse_document(input, None);

        assert_eq!(tree.children.len(), 1);
        assert!(matches!(tree.children[0], Node::Text(_)));
        assert_eq!(tree.to_markdown(), input);
    }

    #[test]
    fn test_inline_directive_stays_in_text() {
        let input = "See <Embed filePath=\"a.py\" /> here.\n";
        let tree = parse_document(input, None);
        assert!(tree.visit(Node::is_html).is_empty());
    }

    #[test]
    fn test_directive_inside_fence_is_code() {
        let input = "```mdx\n<Embed filePath=\"a.py\" />\n```\n";
        let tree = parse_document(input, None);
        assert!(tree.visit(Node::is_html).is_empty());
    }

    #[test]
    fn test_unclosed_frontmatter_is_text() {
        let input = "---\nnot frontmatter\n";
        let tree = parse_document(input, None);
        assert!(!matches!(tree.children[0], Node::Frontmatter(_)));
    }

    #[test]
    fn test_read_document() {
        let mut vfs = VirtualFS::new();
        vfs.add_file("docs/a.md", "# A\n");

        let tree = read_document(Path::new("docs/a.md"), &vfs).unwrap();
        assert_eq!(tree.children, vec![Node::Text("# A".to_string())]);
        assert!(read_document(Path::new("docs/missing.md"), &vfs).is_err());
    }
}
