//! Core data structures for documents and embed directives.

mod directive;
mod tree;

pub use directive::{is_embed_block, EmbedDirective, EMBED_TAG};
pub use tree::{error_markup, Admonition, CodeNode, DocumentTree, Node};
