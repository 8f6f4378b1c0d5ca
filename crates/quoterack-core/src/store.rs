// The quote store - owns the collection and mediates all reads and writes
use crate::events::{EventBus, StoreEvent};
use crate::models::{seed_quotes, QuoteCollection, QuoteRecord};
use crate::random::{RandomSource, ThreadRngSource};
use crate::{Error, Result};
use quoterack_storage::{KvStore, SessionStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Persisted key holding the full collection as JSON text
pub const QUOTES_KEY: &str = "quotes";
/// Persisted key remembering the last-selected category filter
pub const FILTER_KEY: &str = "selected_category";
/// Session key holding the index of the last displayed quote
pub const LAST_QUOTE_KEY: &str = "last_quote";
/// Persisted key holding the RFC 3339 time of the last completed sync
pub const SYNC_TIME_KEY: &str = "last_synced_at";

/// Owns the quote collection and every mutation of it
///
/// All writes go through here: explicit add, bulk import, and sync merge.
/// Each successful mutation persists the full collection synchronously and
/// announces itself on the event bus.
pub struct QuoteStore {
    quotes: QuoteCollection,
    kv: KvStore,
    session: SessionStore,
    rng: Box<dyn RandomSource>,
    events: EventBus,
}

impl QuoteStore {
    /// Restore from persisted state, falling back to the seed collection
    ///
    /// Missing or malformed persisted JSON is a soft failure: we log it and
    /// start from the seed. Nothing here is fatal to the caller.
    pub fn open(kv: KvStore) -> Self {
        Self::with_random_source(kv, Box::new(ThreadRngSource))
    }

    pub fn with_random_source(kv: KvStore, rng: Box<dyn RandomSource>) -> Self {
        let quotes = Self::load(&kv);
        Self {
            quotes,
            kv,
            session: SessionStore::new(),
            rng,
            events: EventBus::new(),
        }
    }

    fn load(kv: &KvStore) -> QuoteCollection {
        match kv.get(QUOTES_KEY) {
            Ok(Some(raw)) => match QuoteCollection::from_json(&raw) {
                Ok(quotes) => {
                    debug!("restored {} quotes from storage", quotes.len());
                    quotes
                }
                Err(e) => {
                    warn!("persisted quotes unreadable, falling back to seed: {}", e);
                    seed_quotes()
                }
            },
            Ok(None) => {
                debug!("no persisted quotes, starting from seed");
                seed_quotes()
            }
            Err(e) => {
                warn!("storage unreadable, falling back to seed: {}", e);
                seed_quotes()
            }
        }
    }

    pub fn quotes(&self) -> &QuoteCollection {
        &self.quotes
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Hand the bus to a sync coordinator so it publishes on the same channel
    pub fn event_bus(&self) -> EventBus {
        self.events.clone()
    }

    /// Validate and append one quote
    ///
    /// Both fields are trimmed; either being empty afterwards fails with a
    /// validation error and leaves the collection untouched.
    pub fn add(&mut self, text: &str, category: &str) -> Result<QuoteRecord> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() || category.is_empty() {
            return Err(Error::Validation(
                "quote text and category are both required".into(),
            ));
        }

        let record = QuoteRecord::new(text, category);
        self.quotes.push(record.clone());
        self.persist();
        self.events.emit(StoreEvent::QuoteAdded(record.clone()));
        Ok(record)
    }

    /// Append every record from a JSON payload
    ///
    /// Only the top-level shape is validated: the payload must parse as a
    /// JSON array or the whole import is rejected with the collection
    /// unchanged. Array elements are appended as-is; missing fields come
    /// through as empty strings.
    pub fn import_bulk(&mut self, payload: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| Error::Validation(format!("import payload is not valid JSON: {}", e)))?;

        let serde_json::Value::Array(items) = value else {
            return Err(Error::Validation(
                "import payload must be a JSON array of quotes".into(),
            ));
        };

        // Convert everything up front so a bad element can't leave a
        // half-applied import behind.
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let record: QuoteRecord = serde_json::from_value(item)
                .map_err(|e| Error::Validation(format!("unreadable import record: {}", e)))?;
            records.push(record);
        }

        let count = records.len();
        for record in records {
            self.quotes.push(record);
        }
        self.persist();
        info!("imported {} quotes", count);
        self.events.emit(StoreEvent::Imported(count));
        Ok(count)
    }

    /// The full collection as pretty JSON, round-trippable through
    /// `import_bulk`
    pub fn export_json(&self) -> Result<String> {
        Ok(self.quotes.to_pretty_json()?)
    }

    /// Filter by category, remembering the choice for the next session
    pub fn filter_by_category(&self, name: &str) -> Vec<QuoteRecord> {
        if let Err(e) = self.kv.set(FILTER_KEY, name) {
            warn!("failed to remember category filter: {}", e);
        }
        self.quotes.filter_by_category(name)
    }

    /// The remembered category filter, if any
    pub fn last_filter(&self) -> Option<String> {
        self.kv.get(FILTER_KEY).ok().flatten()
    }

    /// Uniformly random pick from a slice of quotes
    ///
    /// Remembers the picked index in session storage so the last view can be
    /// restored within the same process.
    pub fn pick_random<'a>(&mut self, from: &'a [QuoteRecord]) -> Option<&'a QuoteRecord> {
        if from.is_empty() {
            return None;
        }
        let index = self.rng.pick_index(from.len());
        self.session.set(LAST_QUOTE_KEY, &index.to_string());
        Some(&from[index])
    }

    /// Index of the last displayed quote, ephemeral per session
    pub fn last_viewed_index(&self) -> Option<usize> {
        self.session.get(LAST_QUOTE_KEY).and_then(|s| s.parse().ok())
    }

    /// Known categories with the synthetic `"all"` entry first
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![crate::models::ALL_CATEGORIES.to_string()];
        categories.extend(self.quotes.distinct_categories());
        categories
    }

    /// When the last sync completed, if one ever has
    pub fn last_synced_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.kv
            .get(SYNC_TIME_KEY)
            .ok()
            .flatten()
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }

    pub(crate) fn record_sync_time(&self) {
        if let Err(e) = self.kv.set(SYNC_TIME_KEY, &chrono::Utc::now().to_rfc3339()) {
            warn!("failed to record sync time: {}", e);
        }
    }

    /// Merge remote records into the collection, returning how many appended
    ///
    /// Additive only: nothing local is ever overwritten or removed.
    pub(crate) fn apply_remote(&mut self, remote: &[QuoteRecord]) -> usize {
        let added = crate::sync::merge(&mut self.quotes, remote);
        if added > 0 {
            self.persist();
        }
        added
    }

    /// Write the full collection to storage
    ///
    /// A failed write is logged, not raised: persistence trouble must never
    /// block an otherwise valid mutation.
    fn persist(&self) {
        match self.quotes.to_json() {
            Ok(json) => {
                if let Err(e) = self.kv.set(QUOTES_KEY, &json) {
                    warn!("failed to persist quotes: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize quotes for persistence: {}", e),
        }
    }
}
