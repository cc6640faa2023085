//! Shared test utilities.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{Result, SyncError};
use crate::sync::{JobRunner, LiveReload, ModuleGraph, ModuleId};

/// Live-reload server recording every call.
#[derive(Debug, Default)]
pub struct MockLiveReload {
    pub watched: Mutex<Vec<PathBuf>>,
    pub emitted: Mutex<Vec<PathBuf>>,
    /// When set, every call fails with this message.
    pub fail_with: Option<String>,
}

impl MockLiveReload {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(SyncError::Host(message.clone())),
            None => Ok(()),
        }
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().clone()
    }

    pub fn emitted(&self) -> Vec<PathBuf> {
        self.emitted.lock().unwrap().clone()
    }
}

impl LiveReload for MockLiveReload {
    fn watch_path(&self, path: &Path) -> Result<()> {
        self.check()?;
        self.watched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn emit_change(&self, path: &Path) -> Result<()> {
        self.check()?;
        self.emitted.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Module graph with fixed path and URL tables.
#[derive(Debug, Default)]
pub struct MockModuleGraph {
    pub by_path: HashMap<PathBuf, ModuleId>,
    pub by_url: HashMap<String, ModuleId>,
    pub invalidated: Mutex<Vec<ModuleId>>,
}

impl MockModuleGraph {
    pub fn with_path(mut self, path: impl Into<PathBuf>, id: &str) -> Self {
        self.by_path.insert(path.into(), ModuleId(id.to_string()));
        self
    }

    pub fn with_url(mut self, url: &str, id: &str) -> Self {
        self.by_url.insert(url.to_string(), ModuleId(id.to_string()));
        self
    }

    pub fn invalidated(&self) -> Vec<ModuleId> {
        self.invalidated.lock().unwrap().clone()
    }
}

impl ModuleGraph for MockModuleGraph {
    fn module_by_path(&self, path: &Path) -> Option<ModuleId> {
        self.by_path.get(path).cloned()
    }

    fn module_by_url(&self, url: &str) -> Option<ModuleId> {
        self.by_url.get(url).cloned()
    }

    fn invalidate(&self, module: &ModuleId) -> Result<()> {
        self.invalidated.lock().unwrap().push(module.clone());
        Ok(())
    }
}

/// Job runner recording the paths it was invoked with.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<PathBuf>>,
    /// When true, every job fails after being recorded.
    pub fail: bool,
}

impl RecordingRunner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl JobRunner for RecordingRunner {
    fn run(&self, source: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(source.to_path_buf());
        if self.fail {
            return Err(SyncError::Other(format!("job for {} failed", source.display())));
        }
        Ok(())
    }
}
