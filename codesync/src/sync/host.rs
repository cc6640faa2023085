//! Capabilities of the host documentation build pipeline.
//!
//! A host plugs its live-reload server and module dependency graph in
//! through these traits. Any of them may be absent; the standalone CLI runs
//! with none.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::errors::Result;

/// The host's live-reload server.
pub trait LiveReload: Send + Sync {
    /// Adds `path` to the set of files whose change triggers a rebuild.
    fn watch_path(&self, path: &Path) -> Result<()>;

    /// Emits a synthetic change event for `path`.
    fn emit_change(&self, path: &Path) -> Result<()>;
}

/// Identifier of a module in the host's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId(pub String);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The host's module dependency graph.
pub trait ModuleGraph: Send + Sync {
    /// Finds the module built from the file at `path`.
    fn module_by_path(&self, path: &Path) -> Option<ModuleId>;

    /// Finds the module serving `url`.
    fn module_by_url(&self, url: &str) -> Option<ModuleId>;

    /// Marks a module stale so the next request rebuilds it.
    fn invalidate(&self, module: &ModuleId) -> Result<()>;
}

/// The host capabilities available to a sync session.
#[derive(Clone, Default)]
pub struct HostHandles {
    /// Live-reload server, if the host runs one.
    pub live_reload: Option<Arc<dyn LiveReload>>,
    /// Module graph, if the host exposes one.
    pub module_graph: Option<Arc<dyn ModuleGraph>>,
}

impl fmt::Debug for HostHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandles")
            .field("live_reload", &self.live_reload.is_some())
            .field("module_graph", &self.module_graph.is_some())
            .finish()
    }
}

impl HostHandles {
    /// No host capabilities.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a live-reload server.
    pub fn with_live_reload(mut self, live_reload: Arc<dyn LiveReload>) -> Self {
        self.live_reload = Some(live_reload);
        self
    }

    /// Adds a module graph.
    pub fn with_module_graph(mut self, module_graph: Arc<dyn ModuleGraph>) -> Self {
        self.module_graph = Some(module_graph);
        self
    }

    /// Returns true if no capability is available.
    pub fn is_empty(&self) -> bool {
        self.live_reload.is_none() && self.module_graph.is_none()
    }
}
