//! Update propagation strategy identifiers.
//!
//! The propagator tries these in configured order for each affected document:
//! - `watch-registration`: ask the live-reload server to watch the document
//! - `module-invalidation`: mark the document's module stale in the dependency graph
//! - `change-event`: emit a synthetic "changed" event on the host watcher
//! - `timestamp`: rewrite the hidden timestamp marker in the document itself

use std::fmt;

use serde::{Deserialize, Serialize};

/// Update propagation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StrategyKind {
    /// Register the document path with the live-reload server.
    WatchRegistration,
    /// Invalidate the document's module in the host dependency graph.
    ModuleInvalidation,
    /// Emit a synthetic file-change event for the document.
    ChangeEvent,
    /// Touch the document by rewriting its timestamp marker.
    Timestamp,
}

impl StrategyKind {
    /// All strategies in their default order.
    pub fn all() -> &'static [StrategyKind] {
        &[
            StrategyKind::WatchRegistration,
            StrategyKind::ModuleInvalidation,
            StrategyKind::ChangeEvent,
            StrategyKind::Timestamp,
        ]
    }

    /// Returns the strategy name as a static string.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::WatchRegistration => "watch-registration",
            StrategyKind::ModuleInvalidation => "module-invalidation",
            StrategyKind::ChangeEvent => "change-event",
            StrategyKind::Timestamp => "timestamp",
        }
    }

    /// Returns true if this strategy needs a host pipeline handle.
    pub fn needs_host(&self) -> bool {
        !matches!(self, StrategyKind::Timestamp)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
