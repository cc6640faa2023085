//! Readers for parsing documentation pages and directive attributes.

mod attributes;
mod delimiters;
mod markdown;

pub use attributes::Attributes;
pub use delimiters::{extract_all_tokens, DelimitedToken, DelimitedTokenGetter, ExtractResult};
pub use markdown::{parse_document, read_document};
