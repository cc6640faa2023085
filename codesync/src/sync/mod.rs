//! Live synchronization of the code library with the documentation.
//!
//! Control flow: the [`SourceWatcher`] forwards settled source changes to
//! the [`DebounceCoordinator`], whose job runs the [`Propagator`]: it finds
//! the documents embedding the changed file and pushes each through the
//! [`StrategyChain`] until the host accepts it.

mod debounce;
mod host;
mod propagate;
mod strategies;
mod session;
mod watcher;

pub use debounce::{DebounceCoordinator, JobRunner};
pub use host::{HostHandles, LiveReload, ModuleGraph, ModuleId};
pub use propagate::{PropagationReport, Propagator};
pub use session::SyncSession;
pub use strategies::{
    AffectedDocument, ChangeEvent, DocumentOutcome, ModuleInvalidation, StrategyChain,
    StrategyOutcome, TimestampMarker, UpdateStrategy, WatchRegistration,
};
pub use watcher::{SourceWatcher, WatchFilter};
