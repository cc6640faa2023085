//! Reverse-reference resolution from source files to documents.

pub mod matcher;
mod scanner;

pub use matcher::{matches, ReferenceMatcher};
pub use scanner::{AffectedDocumentSet, DocumentScanner};
