//! A live sync session wiring watcher, coordinator and propagator.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{Result, SyncError};
use crate::interface::Context;

use super::debounce::DebounceCoordinator;
use super::host::HostHandles;
use super::propagate::Propagator;
use super::watcher::{SourceWatcher, WatchFilter};

/// Running live sync for one project.
///
/// Dropping the session without [`shutdown`](Self::shutdown) also stops
/// the watch.
#[derive(Debug)]
pub struct SyncSession {
    watcher: Option<SourceWatcher>,
    coordinator: Arc<DebounceCoordinator>,
    library_root: PathBuf,
}

impl SyncSession {
    /// Starts live sync, or logs why it cannot and returns `None`.
    ///
    /// Never fails the caller: a host keeps serving without live sync.
    pub fn start(ctx: Arc<Context>, hosts: HostHandles) -> Option<Self> {
        match Self::try_start(ctx, hosts) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::error!("Live code sync disabled: {}", e);
                None
            }
        }
    }

    /// Starts live sync. Must be called within a tokio runtime.
    pub fn try_start(ctx: Arc<Context>, hosts: HostHandles) -> Result<Self> {
        let library_root = ctx.library_root();
        if !library_root.is_dir() {
            return Err(SyncError::Config(format!(
                "code library {} does not exist",
                library_root.display()
            )));
        }

        let debounce = Duration::from_millis(ctx.config.watch.debounce_ms);
        let settle = Duration::from_millis(ctx.config.watch.settle_ms);
        let filter = WatchFilter::new(library_root.clone(), &ctx.config)?;

        let propagator = Arc::new(Propagator::new(Arc::clone(&ctx), &hosts)?);
        let coordinator = Arc::new(DebounceCoordinator::new(propagator, debounce)?);
        let watcher = SourceWatcher::spawn(filter, settle, Arc::clone(&coordinator))?;

        tracing::info!(
            "Watching {} (debounce {}ms, settle {}ms)",
            library_root.display(),
            coordinator.quiet_period().as_millis(),
            settle.as_millis()
        );

        Ok(Self {
            watcher: Some(watcher),
            coordinator,
            library_root,
        })
    }

    /// Returns the watched library root.
    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    /// Returns the debounce coordinator.
    pub fn coordinator(&self) -> &DebounceCoordinator {
        &self.coordinator
    }

    /// Stops scheduling, cancels the pending job and closes the watch.
    ///
    /// A job already running finishes on its own.
    pub fn shutdown(mut self) {
        self.stop();
        tracing::info!("Live code sync stopped");
    }

    fn stop(&mut self) {
        self.coordinator.shutdown();
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_library_disables_sync() {
        let dir = tempdir().unwrap();
        let ctx = Arc::new(Context::default_for_dir(dir.path().to_path_buf()));

        assert!(SyncSession::start(ctx, HostHandles::none()).is_none());
    }

    #[tokio::test]
    async fn test_invalid_exclude_disables_sync() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("code_library")).unwrap();

        let mut config = Config::default();
        config.watch.exclude = vec!["[".to_string()];
        let ctx = Arc::new(Context::new(config, dir.path().to_path_buf()));

        assert!(SyncSession::start(ctx, HostHandles::none()).is_none());
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("code_library")).unwrap();
        let ctx = Arc::new(Context::default_for_dir(dir.path().to_path_buf()));

        let session = SyncSession::start(ctx, HostHandles::none()).unwrap();
        assert_eq!(session.library_root(), dir.path().join("code_library"));
        assert!(!session.coordinator().is_shut_down());
        assert_eq!(session.coordinator().quiet_period(), Duration::from_millis(400));

        let coordinator = Arc::clone(&session.coordinator);
        session.shutdown();
        assert!(coordinator.is_shut_down());
        assert!(!coordinator.notify(dir.path().join("code_library/a.py")));
    }

    #[test]
    fn test_start_outside_runtime_disables_sync() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("code_library")).unwrap();
        let ctx = Arc::new(Context::default_for_dir(dir.path().to_path_buf()));

        assert!(SyncSession::start(ctx, HostHandles::none()).is_none());
    }
}
