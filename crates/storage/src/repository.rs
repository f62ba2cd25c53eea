use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value blob contract consumed by the progress store.
///
/// The core treats persistence as an opaque string-blob store: a missing key
/// reads back as `None`, and a write replaces the previous value. Content
/// interpretation (JSON schemas, corruption handling) lives with the caller.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures; an absent key is
    /// `Ok(None)`.
    async fn read_key(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn write_key(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKvStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a key before handing the store to the code under test.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("kv lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    /// Snapshot of all stored entries, for assertions in tests.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> HashMap<String, String> {
        self.entries.lock().expect("kv lock poisoned").clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn read_key(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_key(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let kv = InMemoryKvStore::new();
        assert_eq!(kv.read_key("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_replaces_previous_value() {
        let kv = InMemoryKvStore::new();
        kv.write_key("k", "first").await.unwrap();
        kv.write_key("k", "second").await.unwrap();
        assert_eq!(kv.read_key("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let kv = InMemoryKvStore::new();
        let other = kv.clone();
        kv.write_key("k", "v").await.unwrap();
        assert_eq!(other.read_key("k").await.unwrap().as_deref(), Some("v"));
    }
}
