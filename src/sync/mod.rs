// Bulk city sync
pub mod orchestrator;
pub mod state;

use thiserror::Error;

pub use orchestrator::{CitySyncApi, SyncOptions, SyncOrchestrator};
pub use state::{Settled, SyncDispatch, SyncProgress, SyncQueueState, DEFAULT_MAX_RETRIES};

/// Errors returned by sync control operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("a sync run is already in progress")]
    AlreadyRunning,

    #[error("no cities to sync")]
    NoTargets,

    #[error("cannot clear results while a sync run is in progress")]
    Busy,
}
