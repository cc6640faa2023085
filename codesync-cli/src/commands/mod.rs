//! CLI command implementations.

pub mod config;
pub mod refs;
pub mod render;
pub mod touch;
pub mod watch;

pub use config::config;
pub use refs::{refs, RefsOptions};
pub use render::{render, RenderOptions};
pub use touch::{touch, TouchOptions};
pub use watch::watch;
