use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::SyncResult;
use crate::services::ApiError;
use crate::sync::state::{Settled, SyncProgress, SyncQueueState, DEFAULT_MAX_RETRIES};
use crate::sync::SyncError;

/// The upstream call that refreshes one city's pharmacy data
#[async_trait]
pub trait CitySyncApi: Send + Sync + 'static {
    async fn sync_city(&self, city_slug: &str) -> Result<SyncResult, ApiError>;
}

/// Pacing and retry settings for a run
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub max_retries: u32,
    /// Pause before the first dispatch
    pub start_delay: Duration,
    /// Pause after each settled call, before the next dispatch
    pub item_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            start_delay: Duration::from_millis(500),
            item_delay: Duration::from_millis(1000),
        }
    }
}

/// Walks a list of cities one at a time against the upstream sync endpoint.
///
/// Exactly one call is in flight per run. `stop` prevents the next dispatch
/// and makes the driver drop the in-flight result when it arrives.
pub struct SyncOrchestrator<A: CitySyncApi> {
    api: Arc<A>,
    state: Arc<Mutex<SyncQueueState>>,
    options: SyncOptions,
}

impl<A: CitySyncApi> SyncOrchestrator<A> {
    pub fn new(api: Arc<A>, options: SyncOptions) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(SyncQueueState::new())),
            options,
        }
    }

    /// Start a run over `city_slugs` and spawn its driver.
    ///
    /// The returned handle resolves when the driver exits (drained, stopped,
    /// or superseded); callers are free to drop it.
    pub async fn start(&self, city_slugs: Vec<String>) -> Result<JoinHandle<()>, SyncError> {
        let count = city_slugs.len();
        let epoch = self
            .state
            .lock()
            .await
            .start(city_slugs, self.options.max_retries)?;

        info!("Starting bulk sync run {} for {} cities", epoch, count);

        let driver = drive(self.api.clone(), self.state.clone(), self.options, epoch);
        Ok(tokio::spawn(driver))
    }

    /// Stop the active run. Returns false when nothing was running.
    pub async fn stop(&self) -> bool {
        let stopped = self.state.lock().await.stop();
        if stopped {
            info!("Bulk sync stopped by user");
        }
        stopped
    }

    pub async fn clear_results(&self) -> Result<(), SyncError> {
        self.state.lock().await.clear_results()
    }

    pub async fn snapshot(&self) -> SyncProgress {
        self.state.lock().await.snapshot()
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.in_progress()
    }
}

async fn drive<A: CitySyncApi>(
    api: Arc<A>,
    state: Arc<Mutex<SyncQueueState>>,
    options: SyncOptions,
    epoch: u64,
) {
    tokio::time::sleep(options.start_delay).await;

    loop {
        let dispatch = state.lock().await.advance(epoch);
        let Some(dispatch) = dispatch else {
            break;
        };

        debug!("Syncing city {} (run {})", dispatch.city_slug, epoch);

        let outcome = api
            .sync_city(&dispatch.city_slug)
            .await
            .map_err(|e| e.to_string());

        if let Err(e) = &outcome {
            warn!("Sync failed for {}: {}", dispatch.city_slug, e);
        }

        let settled = state.lock().await.settle(dispatch.epoch, outcome);
        match settled {
            Settled::Completed => debug!("City {} synced", dispatch.city_slug),
            Settled::Requeued => debug!("City {} requeued for retry", dispatch.city_slug),
            Settled::Failed => warn!("City {} failed after all retries", dispatch.city_slug),
            Settled::Discarded => {
                debug!("Discarding result for {}: run {} no longer active", dispatch.city_slug, epoch);
                return;
            }
        }

        tokio::time::sleep(options.item_delay).await;
    }

    let snapshot = state.lock().await.snapshot();
    if !snapshot.in_progress {
        info!("Bulk sync run {} finished: {}", epoch, snapshot.summary());
    }
}
