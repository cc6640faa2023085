//! The embedding transform: replaces embed directives with file contents.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::errors::{Result, SyncError};
use crate::io::FileCache;
use crate::model::{
    error_markup, is_embed_block, Admonition, CodeNode, DocumentTree, EmbedDirective, Node,
    EMBED_TAG,
};
use crate::paths::ProjectRootResolver;
use crate::readers::parse_document;
use crate::text_location::TextLocation;

use super::markup::render_markup;
use super::rationale::RationaleSplitter;

/// What the caller hands to the transform.
#[derive(Debug)]
pub enum RenderTarget<'t> {
    /// A parsed document; directives are replaced by nodes.
    Tree(&'t mut DocumentTree),
    /// Raw document text; directives are replaced by markup.
    Markup(&'t mut String),
}

/// Outcome of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    /// Directives replaced by embedded content.
    pub embedded: usize,
    /// Messages of directives replaced by an error marker.
    pub errors: Vec<String>,
}

impl TransformReport {
    /// Returns true if every directive rendered.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A loaded and split embed, ready to render.
#[derive(Debug, Clone)]
struct Embedded {
    rationale: Option<Admonition>,
    language: String,
    code: String,
}

impl Embedded {
    fn into_nodes(self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(2);
        if let Some(admonition) = self.rationale {
            nodes.push(Node::Admonition(admonition));
        }
        nodes.push(Node::Code(CodeNode::new(self.language, self.code)));
        nodes
    }

    fn to_markup(&self) -> String {
        render_markup(self.rationale.as_ref(), &self.language, &self.code)
    }
}

/// Byte ranges of the block-level directive tags in `text`.
///
/// Directives are found exactly as the tree reader finds them, so tags
/// inside fenced code or inline in prose are left alone.
fn block_directives(text: &str) -> Vec<(Range<usize>, TextLocation)> {
    let mut offset = 0;
    let lines: Vec<Range<usize>> = text
        .split_inclusive('\n')
        .map(|line| {
            let start = offset;
            offset += line.len();
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            start..start + content.len()
        })
        .collect();

    parse_document(text, None)
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Html { value, location } if is_embed_block(value) => {
                let first = location.line.checked_sub(1)?;
                let last = first + value.lines().count().max(1) - 1;
                let block = lines.get(first)?.start..lines.get(last)?.end;
                let tag = EMBED_TAG.find(&text[block.clone()])?;
                Some((
                    block.start + tag.start()..block.start + tag.end(),
                    TextLocation::line_only(location.line),
                ))
            }
            _ => None,
        })
        .collect()
}

/// Replaces `<Embed ... />` directives with the files they reference.
#[derive(Debug)]
pub struct EmbedTransform<'a> {
    config: &'a Config,
    files: &'a dyn FileCache,
    roots: &'a dyn ProjectRootResolver,
    cwd: PathBuf,
}

impl<'a> EmbedTransform<'a> {
    /// Creates a transform reading files through `files`; directive paths
    /// are relative to the project root found from `cwd`.
    pub fn new(
        config: &'a Config,
        files: &'a dyn FileCache,
        roots: &'a dyn ProjectRootResolver,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            files,
            roots,
            cwd: cwd.into(),
        }
    }

    /// Runs one render pass over `target`.
    pub fn run(&self, target: RenderTarget<'_>) -> Result<TransformReport> {
        let splitter = RationaleSplitter::new(&self.config.embed.rationale_labels)?;
        let root = self.roots.resolve(&self.cwd);

        match target {
            RenderTarget::Tree(tree) => Ok(self.run_tree(tree, &root, &splitter)),
            RenderTarget::Markup(text) => Ok(self.run_markup(text, &root, &splitter)),
        }
    }

    fn run_tree(
        &self,
        tree: &mut DocumentTree,
        root: &Path,
        splitter: &RationaleSplitter,
    ) -> TransformReport {
        let directives: Vec<(usize, String, TextLocation)> = tree
            .visit(Node::is_html)
            .into_iter()
            .filter_map(|(index, node)| match node {
                Node::Html { value, location } if is_embed_block(value) => {
                    Some((index, value.clone(), location.clone()))
                }
                _ => None,
            })
            .collect();

        let mut report = TransformReport::default();

        // Back to front so earlier indices stay valid.
        for (index, text, location) in directives.into_iter().rev() {
            let replacement = match self.load(&text, location, root, splitter) {
                Ok(embedded) => {
                    report.embedded += 1;
                    embedded.into_nodes()
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.errors.push(e.to_string());
                    vec![Node::EmbedError(e.to_string())]
                }
            };
            tree.splice(index, replacement);
        }

        report.errors.reverse();
        report
    }

    fn run_markup(&self, text: &mut String, root: &Path, splitter: &RationaleSplitter) -> TransformReport {
        let matches = block_directives(text);
        let mut report = TransformReport::default();

        for (range, location) in matches.into_iter().rev() {
            let replacement = match self.load(&text[range.clone()], location, root, splitter) {
                Ok(embedded) => {
                    report.embedded += 1;
                    embedded.to_markup()
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.errors.push(e.to_string());
                    error_markup(&e.to_string())
                }
            };
            text.replace_range(range, &replacement);
        }

        report.errors.reverse();
        report
    }

    fn load(
        &self,
        directive_text: &str,
        location: TextLocation,
        root: &Path,
        splitter: &RationaleSplitter,
    ) -> Result<Embedded> {
        let directive = EmbedDirective::parse(directive_text, location)?;

        let path = root.join(&directive.file_path);
        let raw = self.files.read(&path).map_err(|source| SyncError::ReadFile {
            path: PathBuf::from(&directive.file_path),
            source,
        })?;
        tracing::debug!("Embedding {} ({} bytes)", directive.file_path, raw.len());

        let split = splitter.split(&raw);
        let language = directive
            .language
            .clone()
            .unwrap_or_else(|| self.config.language_for_path(Path::new(&directive.file_path)));

        let rationale = split
            .rationale
            .filter(|_| directive.show_rationale)
            .map(|body| {
                Admonition::new(
                    &self.config.embed.admonition,
                    &self.config.embed.rationale_title,
                    body,
                )
            });

        Ok(Embedded {
            rationale,
            language,
            code: split.code,
        })
    }
}
