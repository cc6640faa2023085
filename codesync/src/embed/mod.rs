//! Embedding of code library files into documentation pages.
//!
//! Each `<Embed filePath="..." />` directive is replaced by the referenced
//! file: an admonition holding its design rationale (when present and
//! shown) followed by a code block with the rationale removed.

mod markup;
mod rationale;
mod transform;

pub use markup::{escape_html, render_markup};
pub use rationale::{split_rationale, RationaleSplitter, SplitSource};
pub use transform::{EmbedTransform, RenderTarget, TransformReport};
