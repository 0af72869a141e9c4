//! FactCheck Storage Layer
//!
//! Implements the `SlotStorage` trait and the two fixed slots the client
//! persists: the latest verification result and the authentication token.
//!
//! # Architecture
//!
//! - SQLite for durable slots (one row per key)
//! - An in-memory map for tests and ephemeral sessions
//! - `VerificationResultStore` and `TokenStore` on top of any `SlotStorage`
//!
//! # Examples
//!
//! ```no_run
//! use factcheck_store::{SqliteSlots, VerificationResultStore};
//!
//! let slots = SqliteSlots::new("factcheck.db").unwrap();
//! let results = VerificationResultStore::new(slots);
//! assert!(results.read().is_none());
//! ```

#![warn(missing_docs)]

mod memory;
mod result_store;
mod token_store;

use factcheck_domain::traits::SlotStorage;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub use memory::MemorySlots;
pub use result_store::VerificationResultStore;
pub use token_store::{TokenStore, LEGACY_TOKEN_SLOT};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reported by an arbitrary slot backend
    #[error("Slot storage error: {0}")]
    Slot(String),

    /// Another thread panicked while holding the connection
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// SQLite-backed slot storage
///
/// The connection sits behind a mutex so slots can be written through a
/// shared reference from any task.
pub struct SqliteSlots {
    conn: Mutex<Connection>,
}

impl SqliteSlots {
    /// Open (or create) slot storage at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let slots = Self {
            conn: Mutex::new(conn),
        };
        slots.initialize_schema()?;
        Ok(slots)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .execute_batch(schema)?;
        Ok(())
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl SlotStorage for SqliteSlots {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Self::now()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let slots = SqliteSlots::new(":memory:").unwrap();

        assert_eq!(slots.get("k").unwrap(), None);
        slots.set("k", "v1").unwrap();
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("v1"));

        slots.set("k", "v2").unwrap();
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("v2"));

        slots.remove("k").unwrap();
        assert_eq!(slots.get("k").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let slots = SqliteSlots::new(":memory:").unwrap();
        assert!(slots.remove("missing").is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let slots = SqliteSlots::new(":memory:").unwrap();
        slots.set("a", "1").unwrap();
        slots.set("b", "2").unwrap();
        assert_eq!(slots.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(slots.get("b").unwrap().as_deref(), Some("2"));
    }
}
