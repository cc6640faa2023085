//! File system watcher on the code library.
//!
//! Events flow from the notify callback through a bounded channel into an
//! async loop. A path is forwarded to the debounce coordinator once it has
//! been quiet for the write-settle window, which absorbs editors flushing a
//! file in several writes.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::errors::{Result, SyncError};

use super::debounce::DebounceCoordinator;

/// Decides which paths under the library root are source changes.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    /// Canonical library root; backends may report resolved paths.
    library_root: PathBuf,
    /// The root as configured, possibly through a symlink.
    configured_root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl WatchFilter {
    /// Creates a filter from the watch settings in `config`.
    pub fn new(library_root: PathBuf, config: &Config) -> Result<Self> {
        let exclude = config
            .watch
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let canonical = library_root
            .canonicalize()
            .unwrap_or_else(|_| library_root.clone());

        Ok(Self {
            library_root: canonical,
            configured_root: library_root,
            extensions: config.source_extensions.clone(),
            exclude,
        })
    }

    /// Returns the watched library root.
    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    fn relative<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.strip_prefix(&self.library_root)
            .or_else(|_| path.strip_prefix(&self.configured_root))
            .ok()
    }

    /// Re-expresses `path` under the configured root, the form the
    /// propagator resolves against.
    pub fn rebase(&self, path: &Path) -> PathBuf {
        match self.relative(path) {
            Some(relative) => self.configured_root.join(relative),
            None => path.to_path_buf(),
        }
    }

    /// Returns true if a change to `path` should trigger propagation.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(relative) = self.relative(path) else {
            return false;
        };

        let hidden = relative.components().any(|c| match c {
            Component::Normal(name) => name.to_string_lossy().starts_with('.'),
            _ => false,
        });
        if hidden {
            return false;
        }

        let has_extension = relative
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|s| s == ext));
        if !has_extension {
            return false;
        }

        let rel_str = relative.to_string_lossy().replace('\\', "/");
        !self.exclude.iter().any(|p| p.matches(&rel_str))
    }
}

/// Returns true for events that may change file content.
fn is_content_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Receives raw notify events and forwards settled paths.
async fn event_loop(
    mut events: mpsc::Receiver<notify::Result<Event>>,
    filter: WatchFilter,
    settle: Duration,
    coordinator: Arc<DebounceCoordinator>,
) {
    let mut pending: HashMap<PathBuf, Instant> = HashMap::new();
    let tick = (settle / 2).clamp(Duration::from_millis(10), Duration::from_millis(100));

    // Fixed cadence, independent of incoming events.
    let mut flush = tokio::time::interval(tick);
    flush.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = events.recv() => {
                match received {
                    Some(Ok(event)) => {
                        if !is_content_event(&event.kind) {
                            continue;
                        }
                        for path in event.paths {
                            if filter.accepts(&path) {
                                tracing::debug!("Source changed: {}", path.display());
                                pending.insert(filter.rebase(&path), Instant::now());
                            }
                        }
                    }
                    Some(Err(e)) => tracing::warn!("Watch error: {}", e),
                    None => break,
                }
            }

            _ = flush.tick() => {
                let now = Instant::now();
                let mut settled: Vec<(PathBuf, Instant)> = Vec::new();

                pending.retain(|path, last_change| {
                    if now.duration_since(*last_change) >= settle {
                        settled.push((path.clone(), *last_change));
                        false
                    } else {
                        true
                    }
                });

                // Most recent last, so it wins the coordinator's slot.
                settled.sort_by_key(|(_, at)| *at);
                for (path, _) in settled {
                    coordinator.notify(path);
                }
            }
        }
    }

    tracing::debug!("Watcher event loop stopped");
}

/// A running recursive watch on the code library.
pub struct SourceWatcher {
    watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl SourceWatcher {
    /// Starts watching `filter`'s library root, feeding `coordinator`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        filter: WatchFilter,
        settle: Duration,
        coordinator: Arc<DebounceCoordinator>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SyncError::Watch(format!("watcher needs a tokio runtime: {}", e)))?;

        let (tx, rx) = mpsc::channel(100);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;
        watcher.watch(filter.library_root(), RecursiveMode::Recursive)?;

        let task = runtime.spawn(event_loop(rx, filter, settle, coordinator));
        Ok(Self { watcher, task })
    }

    /// Closes the subscription and stops the event loop.
    pub fn stop(self) {
        drop(self.watcher);
        self.task.abort();
    }
}
