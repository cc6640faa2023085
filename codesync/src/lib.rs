//! codesync - Live code embedding for documentation sites
//!
//! This library keeps documentation pages in sync with a separate code
//! library. Pages embed source files by reference; edits to those files
//! propagate to the rendered documentation without a full rebuild.
//!
//! # Features
//!
//! - **Embed**: Replace `<Embed filePath="..." />` directives with the file's
//!   code and its separately displayed design rationale
//! - **Refs**: Find the documentation pages embedding a source file
//! - **Propagate**: Force the host build pipeline to re-render those pages
//! - **Watch**: Monitor the code library and propagate changes automatically
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use codesync::interface::Context;
//! use codesync::sync::{HostHandles, SyncSession};
//!
//! # async fn run() {
//! let ctx = Arc::new(Context::from_current_dir().unwrap());
//! if let Some(session) = SyncSession::start(ctx, HostHandles::none()) {
//!     // ... serve the documentation ...
//!     session.shutdown();
//! }
//! # }
//! ```

pub mod config;
pub mod embed;
pub mod errors;
pub mod index;
pub mod interface;
pub mod io;
pub mod model;
pub mod paths;
pub mod readers;
pub mod sync;
pub mod text_location;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use errors::{Result, SyncError};
pub use interface::Context;
pub use model::{DocumentTree, EmbedDirective, Node};
