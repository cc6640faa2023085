//! Strategies forcing the host to re-render a document.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

use crate::config::{PropagationConfig, StrategyKind};
use crate::errors::Result;
use crate::io::atomic_write;

use super::host::{HostHandles, LiveReload, ModuleGraph};

/// A documentation file to re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedDocument {
    /// Path relative to the documentation project.
    pub relative: PathBuf,
    /// Absolute path on disk.
    pub absolute: PathBuf,
    /// URL path the host serves it under.
    pub url: String,
}

impl AffectedDocument {
    /// Describes the document at `relative` inside `docs_root`.
    pub fn new(docs_root: &Path, relative: PathBuf) -> Self {
        let url = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self {
            absolute: docs_root.join(&relative),
            url: format!("/{}", url),
            relative,
        }
    }
}

/// Result of applying one strategy to one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyOutcome {
    /// The host will re-render the document; stop here.
    Accepted,
    /// This strategy does not apply; try the next one.
    Declined,
}

/// One way of making the host re-render a document.
pub trait UpdateStrategy: Send + Sync {
    /// Returns the name of this strategy.
    fn name(&self) -> &str;

    /// Applies the strategy to a document.
    fn apply(&self, document: &AffectedDocument) -> Result<StrategyOutcome>;
}

/// Registers the document with the live-reload server's watch list.
pub struct WatchRegistration {
    live_reload: Arc<dyn LiveReload>,
}

impl WatchRegistration {
    pub fn new(live_reload: Arc<dyn LiveReload>) -> Self {
        Self { live_reload }
    }
}

impl UpdateStrategy for WatchRegistration {
    fn name(&self) -> &str {
        StrategyKind::WatchRegistration.name()
    }

    fn apply(&self, document: &AffectedDocument) -> Result<StrategyOutcome> {
        self.live_reload.watch_path(&document.absolute)?;
        Ok(StrategyOutcome::Accepted)
    }
}

/// Marks the document's module stale in the host's dependency graph.
pub struct ModuleInvalidation {
    graph: Arc<dyn ModuleGraph>,
}

impl ModuleInvalidation {
    pub fn new(graph: Arc<dyn ModuleGraph>) -> Self {
        Self { graph }
    }
}

impl UpdateStrategy for ModuleInvalidation {
    fn name(&self) -> &str {
        StrategyKind::ModuleInvalidation.name()
    }

    fn apply(&self, document: &AffectedDocument) -> Result<StrategyOutcome> {
        let module = self
            .graph
            .module_by_path(&document.absolute)
            .or_else(|| self.graph.module_by_url(&document.url));

        match module {
            Some(id) => {
                self.graph.invalidate(&id)?;
                tracing::debug!("Invalidated module {}", id);
                Ok(StrategyOutcome::Accepted)
            }
            None => Ok(StrategyOutcome::Declined),
        }
    }
}

/// Emits a synthetic change event through the live-reload server.
pub struct ChangeEvent {
    live_reload: Arc<dyn LiveReload>,
}

impl ChangeEvent {
    pub fn new(live_reload: Arc<dyn LiveReload>) -> Self {
        Self { live_reload }
    }
}

impl UpdateStrategy for ChangeEvent {
    fn name(&self) -> &str {
        StrategyKind::ChangeEvent.name()
    }

    fn apply(&self, document: &AffectedDocument) -> Result<StrategyOutcome> {
        self.live_reload.emit_change(&document.absolute)?;
        Ok(StrategyOutcome::Accepted)
    }
}

/// Rewrites a hidden `<!-- Code updated: ... -->` marker in the document so
/// any file watcher sees a content change.
pub struct TimestampMarker {
    label: String,
    pattern: Regex,
}

impl TimestampMarker {
    /// Creates the strategy for markers carrying `label`.
    pub fn new(label: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"<!--\s*{}:[^>]*?-->", regex::escape(label)))?;
        Ok(Self {
            label: label.to_string(),
            pattern,
        })
    }

    /// Returns `content` carrying exactly one marker with `timestamp`.
    ///
    /// The first existing marker is replaced in place and any others are
    /// removed; without one, the marker is appended on its own line.
    pub fn stamp(&self, content: &str, timestamp: &str) -> String {
        let marker = format!("<!-- {}: {} -->", self.label, timestamp);

        if !self.pattern.is_match(content) {
            let mut out = content.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&marker);
            out.push('\n');
            return out;
        }

        let mut first = true;
        self.pattern
            .replace_all(content, |_: &regex::Captures<'_>| {
                if std::mem::take(&mut first) {
                    marker.clone()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

impl UpdateStrategy for TimestampMarker {
    fn name(&self) -> &str {
        StrategyKind::Timestamp.name()
    }

    fn apply(&self, document: &AffectedDocument) -> Result<StrategyOutcome> {
        let content = fs::read_to_string(&document.absolute)?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let updated = self.stamp(&content, &timestamp);

        if updated != content {
            atomic_write(&document.absolute, &updated)?;
            tracing::debug!("Stamped {}", document.relative.display());
        }
        Ok(StrategyOutcome::Accepted)
    }
}

/// Outcome of propagating a change to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    /// Document path relative to the documentation project.
    pub document: PathBuf,
    /// Strategy that accepted the document, if any did.
    pub accepted_by: Option<String>,
    /// Errors raised by strategies tried before (or instead of) acceptance.
    pub failures: Vec<String>,
}

impl DocumentOutcome {
    /// Returns true if some strategy accepted the document.
    pub fn is_accepted(&self) -> bool {
        self.accepted_by.is_some()
    }
}

/// Ordered fallback chain of update strategies.
#[derive(Default)]
pub struct StrategyChain {
    strategies: Vec<Box<dyn UpdateStrategy>>,
}

impl fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyChain")
            .field("strategies", &self.names())
            .finish()
    }
}

impl StrategyChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Builds the configured chain, skipping strategies whose host
    /// capability is missing.
    pub fn from_config(config: &PropagationConfig, hosts: &HostHandles) -> Result<Self> {
        let mut chain = Self::new();

        for kind in &config.strategies {
            if kind.needs_host() && hosts.is_empty() {
                tracing::debug!("No host pipeline attached, skipping {}", kind);
                continue;
            }
            match (kind, &hosts.live_reload, &hosts.module_graph) {
                (StrategyKind::WatchRegistration, Some(live_reload), _) => {
                    chain.add(WatchRegistration::new(Arc::clone(live_reload)))
                }
                (StrategyKind::ModuleInvalidation, _, Some(graph)) => {
                    chain.add(ModuleInvalidation::new(Arc::clone(graph)))
                }
                (StrategyKind::ChangeEvent, Some(live_reload), _) => {
                    chain.add(ChangeEvent::new(Arc::clone(live_reload)))
                }
                (StrategyKind::Timestamp, _, _) => {
                    chain.add(TimestampMarker::new(&config.marker_label)?)
                }
                _ => tracing::debug!("Host offers no capability for {}, skipping", kind),
            }
        }

        Ok(chain)
    }

    /// Appends a strategy.
    pub fn add<S: UpdateStrategy + 'static>(&mut self, strategy: S) {
        self.strategies.push(Box::new(strategy));
    }

    /// Returns the names of the installed strategies, in order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of installed strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if no strategy is installed.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Tries each strategy in order until one accepts the document.
    pub fn apply(&self, document: &AffectedDocument) -> DocumentOutcome {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.apply(document) {
                Ok(StrategyOutcome::Accepted) => {
                    return DocumentOutcome {
                        document: document.relative.clone(),
                        accepted_by: Some(strategy.name().to_string()),
                        failures,
                    };
                }
                Ok(StrategyOutcome::Declined) => {
                    tracing::debug!(
                        "{} declined {}",
                        strategy.name(),
                        document.relative.display()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "{} failed for {}: {}",
                        strategy.name(),
                        document.relative.display(),
                        e
                    );
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        DocumentOutcome {
            document: document.relative.clone(),
            accepted_by: None,
            failures,
        }
    }
}
