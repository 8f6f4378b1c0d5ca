// Core business logic lives here - the brain of the operation
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod random;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::Error;
pub use events::StoreEvent;
pub use models::{QuoteCollection, QuoteRecord, ALL_CATEGORIES};
pub use store::QuoteStore;
pub use sync::{SyncCoordinator, SyncHandle};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
