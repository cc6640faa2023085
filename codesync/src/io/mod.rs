//! File system access.

mod file_cache;
mod write;

pub use file_cache::{FileCache, RealFileCache, VirtualFS};
pub use write::atomic_write;
