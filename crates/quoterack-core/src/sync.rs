// Periodic reconciliation against the remote collection
//
// The merge here is deliberately additive: remote records missing locally
// get appended, and that is all. Nothing local is ever overwritten or
// removed, so a same-text record under a different category is simply a
// different quote. This mirrors the original behavior and is a documented
// limitation, not an oversight.
use crate::events::{EventBus, StoreEvent};
use crate::models::{QuoteCollection, QuoteRecord};
use crate::store::QuoteStore;
use async_trait::async_trait;
use quoterack_api::{RemoteClient, RemoteError, RemoteItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Category tag applied to every record projected from the remote
pub const SERVER_CATEGORY: &str = "server";

/// Seam over the remote endpoint - makes testing easier and keeps things
/// flexible
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteQuotes: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RemoteItem>, RemoteError>;
    async fn push(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError>;
}

#[async_trait]
impl RemoteQuotes for RemoteClient {
    async fn fetch(&self) -> Result<Vec<RemoteItem>, RemoteError> {
        self.fetch_items().await
    }

    async fn push(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError> {
        self.push_items(quotes).await
    }
}

/// Fixed projection from the remote shape into a quote
fn remote_to_quote(item: RemoteItem) -> QuoteRecord {
    QuoteRecord::new(item.title, SERVER_CATEGORY)
}

/// Additive merge of remote records into the local collection
///
/// Appends each remote record no existing local record is identical to
/// (exact text, case-insensitive category). Returns how many were appended;
/// zero means nothing changed. Idempotent: a second merge of the same batch
/// appends nothing.
pub fn merge(local: &mut QuoteCollection, remote: &[QuoteRecord]) -> usize {
    let mut added = 0;
    for record in remote {
        if !local.contains(record) {
            local.push(record.clone());
            added += 1;
        }
    }
    added
}

/// Reconciles local state with the remote collection
///
/// Shares the store's event bus so merge notifications and soft failures
/// land on the same channel the presentation layer already subscribes to.
pub struct SyncCoordinator {
    remote: Box<dyn RemoteQuotes>,
    events: EventBus,
}

impl SyncCoordinator {
    pub fn new(remote: Box<dyn RemoteQuotes>, events: EventBus) -> Self {
        Self { remote, events }
    }

    /// Fetch and project the remote collection
    ///
    /// Failure is reported, never raised: the scheduled tick that called us
    /// carries on with an empty batch and tries again next time.
    pub async fn pull(&self) -> Vec<QuoteRecord> {
        match self.remote.fetch().await {
            Ok(items) => {
                debug!("pulled {} remote items", items.len());
                items.into_iter().map(remote_to_quote).collect()
            }
            Err(e) => {
                warn!("sync pull failed: {}", e);
                self.events.emit(StoreEvent::SyncFailed(e.to_string()));
                Vec::new()
            }
        }
    }

    /// Best-effort upload of the full local collection
    ///
    /// No automatic retry; the next manual trigger is the retry.
    pub async fn push(&self, local: &QuoteCollection) -> crate::Result<()> {
        self.remote
            .push(local.as_slice())
            .await
            .map_err(|e| crate::Error::Sync(e.to_string()))
    }

    /// Scheduled tick: pull then merge, notifying when anything changed
    pub async fn tick(&self, store: &mut QuoteStore) -> usize {
        let remote = self.pull().await;
        let added = store.apply_remote(&remote);
        if added > 0 {
            info!("sync merged {} new quotes", added);
            self.events.emit(StoreEvent::SyncMerged(added));
        }
        store.record_sync_time();
        added
    }

    /// Manual trigger: pull, merge, then push
    pub async fn sync_once(&self, store: &mut QuoteStore) -> usize {
        let added = self.tick(store).await;
        if let Err(e) = self.push(store.quotes()).await {
            warn!("sync push failed: {}", e);
            self.events.emit(StoreEvent::SyncFailed(e.to_string()));
        }
        added
    }

    /// Start the periodic pull-and-merge loop
    ///
    /// The returned handle owns the loop; dropping it detaches the task, so
    /// call `stop` at shutdown for a clean exit. In-flight requests are not
    /// canceled mid-request; the loop exits after the current tick.
    pub fn spawn(self, store: Arc<Mutex<QuoteStore>>, every: Duration) -> SyncHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut store = store.lock().await;
                        self.tick(&mut store).await;
                    }
                    _ = stop_rx.changed() => {
                        debug!("sync loop stopping");
                        break;
                    }
                }
            }
        });
        SyncHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Lifecycle handle for the periodic sync loop
pub struct SyncHandle {
    stop: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the loop and wait for any in-flight tick to finish
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
