//! Single-slot debounce coordination of propagation jobs.
//!
//! Bursts of change notifications collapse into one job per quiet period.
//! At most one job is pending; a new notification replaces it (last write
//! wins). The slot is cleared before the job runs, so a notification during
//! a running job schedules an independent one without interrupting it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::errors::{Result, SyncError};

/// Work performed once a quiet period elapses.
pub trait JobRunner: Send + Sync {
    /// Runs the job for the latest changed source file.
    fn run(&self, source: &Path) -> Result<()>;
}

/// The outstanding job and its timer.
#[derive(Debug)]
struct PendingJob {
    generation: u64,
    source: PathBuf,
    timer: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<PendingJob>,
    generation: u64,
    closed: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    runner: Arc<dyn JobRunner>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs the job scheduled as `generation`, unless it was replaced or
    /// cancelled in the meantime.
    async fn fire(&self, generation: u64) {
        let source = {
            let mut slot = self.lock();
            let current = slot
                .pending
                .as_ref()
                .is_some_and(|job| job.generation == generation);
            if !current || slot.closed {
                return;
            }
            match slot.pending.take() {
                Some(job) => job.source,
                None => return,
            }
        };

        tracing::debug!("Quiet period over, running job for {}", source.display());
        let runner = Arc::clone(&self.runner);
        let job = tokio::task::spawn_blocking(move || runner.run(&source).map_err(|e| (source, e)));

        match job.await {
            Ok(Ok(())) => {}
            Ok(Err((source, e))) => {
                tracing::error!("Propagation for {} failed: {}", source.display(), e)
            }
            Err(e) => tracing::error!("Propagation job aborted: {}", e),
        }
    }
}

/// Process-wide debounce coordinator owning the pending-job slot.
pub struct DebounceCoordinator {
    shared: Arc<Shared>,
    quiet: Duration,
    runtime: Handle,
}

impl std::fmt::Debug for DebounceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.shared.lock();
        f.debug_struct("DebounceCoordinator")
            .field("quiet", &self.quiet)
            .field("pending", &slot.pending.as_ref().map(|j| &j.source))
            .field("closed", &slot.closed)
            .finish()
    }
}

impl DebounceCoordinator {
    /// Creates a coordinator on the current tokio runtime.
    pub fn new(runner: Arc<dyn JobRunner>, quiet: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| SyncError::Other(format!("debounce needs a tokio runtime: {}", e)))?;
        Ok(Self::with_handle(runner, quiet, runtime))
    }

    /// Creates a coordinator spawning its timers on `runtime`.
    pub fn with_handle(runner: Arc<dyn JobRunner>, quiet: Duration, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                runner,
            }),
            quiet,
            runtime,
        }
    }

    /// Returns the quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Schedules a job for `source` after the quiet period, replacing any
    /// pending one.
    ///
    /// Returns false once the coordinator has been shut down.
    pub fn notify(&self, source: impl Into<PathBuf>) -> bool {
        let source = source.into();
        let mut slot = self.shared.lock();

        if slot.closed {
            tracing::debug!("Ignoring change to {} after shutdown", source.display());
            return false;
        }

        if let Some(previous) = slot.pending.take() {
            previous.timer.abort();
        }

        slot.generation += 1;
        let generation = slot.generation;
        let shared = Arc::clone(&self.shared);
        let quiet = self.quiet;
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(quiet).await;
            shared.fire(generation).await;
        });

        tracing::debug!("Scheduled job for {}", source.display());
        slot.pending = Some(PendingJob {
            generation,
            source,
            timer,
        });
        true
    }

    /// Drops the pending job, if any. A running job is not interrupted.
    ///
    /// Returns true if a job was pending.
    pub fn cancel(&self) -> bool {
        match self.shared.lock().pending.take() {
            Some(job) => {
                job.timer.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels the pending job and refuses all later scheduling.
    pub fn shutdown(&self) {
        self.cancel();
        self.shared.lock().closed = true;
    }

    /// Returns true if a job is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().pending.is_some()
    }

    /// Returns true once [`shutdown`](Self::shutdown) was called.
    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().closed
    }
}

impl Drop for DebounceCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;
    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    const QUIET: Duration = Duration::from_millis(100);

    fn coordinator(runner: &Arc<RecordingRunner>) -> DebounceCoordinator {
        DebounceCoordinator::new(runner.clone(), QUIET).unwrap()
    }

    #[tokio::test]
    async fn test_burst_runs_once_with_last_path() {
        let runner = Arc::new(RecordingRunner::default());
        let coordinator = coordinator(&runner);

        for i in 0..5 {
            assert!(coordinator.notify(format!("/lib/{}.py", i)));
            sleep(Duration::from_millis(10)).await;
        }
        assert!(coordinator.is_pending());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(runner.calls(), vec![PathBuf::from("/lib/4.py")]);
        assert!(!coordinator.is_pending());
    }

    #[tokio::test]
    async fn test_separate_bursts_run_separately() {
        let runner = Arc::new(RecordingRunner::default());
        let coordinator = coordinator(&runner);

        coordinator.notify("/lib/a.py");
        sleep(Duration::from_millis(250)).await;
        coordinator.notify("/lib/b.py");
        sleep(Duration::from_millis(250)).await;

        assert_eq!(
            runner.calls(),
            vec![PathBuf::from("/lib/a.py"), PathBuf::from("/lib/b.py")]
        );
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_job() {
        let runner = Arc::new(RecordingRunner::default());
        let coordinator = coordinator(&runner);

        coordinator.notify("/lib/a.py");
        assert!(coordinator.cancel());
        assert!(!coordinator.cancel());

        sleep(Duration::from_millis(250)).await;
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_refuses_scheduling() {
        let runner = Arc::new(RecordingRunner::default());
        let coordinator = coordinator(&runner);

        coordinator.notify("/lib/a.py");
        coordinator.shutdown();
        assert!(coordinator.is_shut_down());
        assert!(!coordinator.notify("/lib/b.py"));

        sleep(Duration::from_millis(250)).await;
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_job_does_not_block_later_jobs() {
        let runner = Arc::new(RecordingRunner::failing());
        let coordinator = coordinator(&runner);

        coordinator.notify("/lib/a.py");
        sleep(Duration::from_millis(250)).await;
        coordinator.notify("/lib/b.py");
        sleep(Duration::from_millis(250)).await;

        assert_eq!(runner.calls().len(), 2);
    }

    /// Records the start and end of each job; jobs take a while.
    #[derive(Default)]
    struct SlowRunner {
        events: Mutex<Vec<String>>,
    }

    impl JobRunner for SlowRunner {
        fn run(&self, source: &Path) -> Result<()> {
            let name = source.display().to_string();
            self.events.lock().unwrap().push(format!("start {}", name));
            std::thread::sleep(Duration::from_millis(200));
            self.events.lock().unwrap().push(format!("end {}", name));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_notify_during_running_job_schedules_independently() {
        let runner = Arc::new(SlowRunner::default());
        let coordinator = DebounceCoordinator::new(runner.clone(), QUIET).unwrap();

        coordinator.notify("a");
        // The first job starts at ~100ms and runs until ~300ms.
        sleep(Duration::from_millis(150)).await;
        assert!(!coordinator.is_pending());
        coordinator.notify("b");

        sleep(Duration::from_millis(600)).await;
        let events = runner.events.lock().unwrap().clone();
        assert_eq!(events.len(), 4);
        assert!(events.contains(&"end a".to_string()));
        assert!(events.contains(&"end b".to_string()));
        assert_eq!(events[0], "start a");
    }
}
