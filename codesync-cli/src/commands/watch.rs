//! Watch command implementation.

use std::sync::Arc;

use codesync::errors::{Result, SyncError};
use codesync::interface::Context;
use codesync::sync::{HostHandles, SyncSession};

/// Executes the watch command.
///
/// Runs a live sync session with no host pipeline attached, so changes
/// propagate through the timestamp marker, until Ctrl+C.
pub fn watch(ctx: Arc<Context>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async move {
        let debounce = ctx.config.watch.debounce_ms;
        let session = SyncSession::try_start(ctx, HostHandles::none())?;

        println!(
            "Watching {} for changes (debounce: {}ms)...",
            session.library_root().display(),
            debounce
        );
        println!("Press Ctrl+C to stop.");

        tokio::signal::ctrl_c().await?;
        session.shutdown();
        Ok::<(), SyncError>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_watch_requires_library() {
        let dir = tempdir().unwrap();
        let ctx = Arc::new(Context::default_for_dir(dir.path().to_path_buf()));
        assert!(watch(ctx).is_err());
    }
}
