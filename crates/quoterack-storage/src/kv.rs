use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database operation failed: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable key-value store backed by SQLite
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Atomic single-row upserts, no partial writes to worry about
/// - Battle-tested and reliable
/// - Doesn't require a separate process
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// In-memory store, mainly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (unixepoch())
            )",
            [],
        )?;
        Ok(())
    }

    /// Fetch a value by key. `None` when the key has never been written.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a value, replacing any previous one under the same key.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, unixepoch())
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            [key, value],
        )?;
        debug!("persisted key {}", key);
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let store = KvStore::in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = KvStore::in_memory().unwrap();
        store.set("quotes", "[]").unwrap();
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let store = KvStore::in_memory().unwrap();
        store.set("selected_category", "all").unwrap();
        store.set("selected_category", "wisdom").unwrap();
        assert_eq!(
            store.get("selected_category").unwrap().as_deref(),
            Some("wisdom")
        );
    }

    #[test]
    fn delete_removes_key() {
        let store = KvStore::in_memory().unwrap();
        store.set("k", "v").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
