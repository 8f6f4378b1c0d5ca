// End-to-end walk through the store + sync contract, from seed data to a
// merged remote batch.
use async_trait::async_trait;
use quoterack_api::{RemoteError, RemoteItem};
use quoterack_core::models::seed_quotes;
use quoterack_core::random::FixedSource;
use quoterack_core::sync::RemoteQuotes;
use quoterack_core::{QuoteRecord, QuoteStore, StoreEvent, SyncCoordinator};
use quoterack_storage::KvStore;

/// Remote stub serving a fixed list of items and recording nothing
struct StubRemote {
    items: Vec<RemoteItem>,
}

#[async_trait]
impl RemoteQuotes for StubRemote {
    async fn fetch(&self) -> Result<Vec<RemoteItem>, RemoteError> {
        Ok(self.items.clone())
    }

    async fn push(&self, _quotes: &[QuoteRecord]) -> Result<(), RemoteError> {
        Ok(())
    }
}

fn item(id: u64, title: &str) -> RemoteItem {
    RemoteItem {
        id,
        title: title.to_string(),
        body: String::new(),
    }
}

fn test_store() -> QuoteStore {
    QuoteStore::with_random_source(
        KvStore::in_memory().unwrap(),
        Box::new(FixedSource::new(vec![0])),
    )
}

#[tokio::test]
async fn seed_add_import_merge_scenario() {
    let mut store = test_store();
    let mut events = store.subscribe();

    // Starts from the 3 built-in seed quotes
    assert_eq!(store.quotes().len(), 3);
    assert_eq!(store.quotes(), &seed_quotes());

    // Adding a quote grows the collection by one and makes it filterable
    store.add("Test", "QA").unwrap();
    assert_eq!(store.quotes().len(), 4);
    assert_eq!(
        store.filter_by_category("QA"),
        vec![QuoteRecord::new("Test", "QA")]
    );

    // A non-array import is rejected and changes nothing
    let err = store.import_bulk(r#""not an array""#).unwrap_err();
    assert!(matches!(err, quoterack_core::Error::Validation(_)));
    assert_eq!(store.quotes().len(), 4);

    // A remote batch containing one record we already have and one we don't
    // appends only the missing one
    let mut local = store.quotes().clone();
    let batch = vec![
        QuoteRecord::new("Test", "QA"),
        QuoteRecord::new("New", "server"),
    ];
    let added = quoterack_core::sync::merge(&mut local, &batch);
    assert_eq!(added, 1);
    assert_eq!(local.len(), 5);
    assert!(local.contains(&QuoteRecord::new("New", "server")));

    // The same reconciliation through the coordinator: remote titles come
    // in under the fixed server category, so only "New" is actually new
    // once the server copy of "Test" exists locally
    store
        .import_bulk(r#"[{"text":"Test","category":"server"}]"#)
        .unwrap();
    let remote = StubRemote {
        items: vec![item(1, "Test"), item(2, "New")],
    };
    let sync = SyncCoordinator::new(Box::new(remote), store.event_bus());
    let added = sync.sync_once(&mut store).await;

    assert_eq!(added, 1);
    assert_eq!(store.quotes().len(), 6);
    assert!(store.quotes().contains(&QuoteRecord::new("New", "server")));

    // The event stream saw the add, the import, and the merge, in order
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::QuoteAdded(QuoteRecord::new("Test", "QA"))
    );
    assert_eq!(events.recv().await.unwrap(), StoreEvent::Imported(1));
    assert_eq!(events.recv().await.unwrap(), StoreEvent::SyncMerged(1));
}

#[tokio::test]
async fn export_survives_a_full_round_trip_through_a_second_store() {
    let mut original = test_store();
    original.add("Carried", "luggage").unwrap();
    let exported = original.export_json().unwrap();

    let mut copy = test_store();
    let before = copy.quotes().len();
    let imported = copy.import_bulk(&exported).unwrap();

    assert_eq!(imported, 4);
    assert_eq!(copy.quotes().len(), before + 4);
    assert!(copy.quotes().contains(&QuoteRecord::new("Carried", "luggage")));
}

#[tokio::test]
async fn repeated_sync_is_idempotent_end_to_end() {
    let mut store = test_store();
    let remote = StubRemote {
        items: vec![item(1, "Settle down")],
    };
    let sync = SyncCoordinator::new(Box::new(remote), store.event_bus());

    assert_eq!(sync.sync_once(&mut store).await, 1);
    let after_first = store.quotes().clone();

    assert_eq!(sync.sync_once(&mut store).await, 0);
    assert_eq!(store.quotes(), &after_first);
}
