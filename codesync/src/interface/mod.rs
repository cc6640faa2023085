//! High-level interface for codesync operations.

mod context;

pub use context::Context;
