use quoterack_storage::StorageError;
use thiserror::Error;

/// All the ways things can go wrong in QuoteRack
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
///
/// Everything here is recoverable: unreadable persisted state falls back to
/// the seed collection, sync failures are logged and skipped until the next
/// tick, and only validation errors are meant to reach a user.
#[derive(Error, Debug)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("sync failed: {0}")]
    Sync(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
