// Key-value persistence layer
// One durable store for quotes and preferences, one in-process store
// for per-session state that should not survive a restart.

pub mod kv;
pub mod session;

pub use kv::{KvStore, StorageError};
pub use session::SessionStore;
