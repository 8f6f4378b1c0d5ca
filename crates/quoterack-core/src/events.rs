use crate::models::QuoteRecord;
use tokio::sync::broadcast;

/// Change notifications presentation layers can subscribe to
///
/// The core never renders anything itself; it announces what changed and
/// lets whoever is listening decide what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A quote passed validation and was appended
    QuoteAdded(QuoteRecord),
    /// A bulk import appended this many records
    Imported(usize),
    /// A sync merge appended this many records from the remote
    SyncMerged(usize),
    /// A pull or push failed; carries the error text for soft display
    SyncFailed(String),
}

/// Broadcast fan-out for store events
///
/// Cloned between the store and the sync coordinator so both publish onto
/// the same channel. Sending with no subscribers is fine.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
