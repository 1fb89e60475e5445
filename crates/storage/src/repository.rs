use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("quota exceeded: {len} bytes")]
    QuotaExceeded { len: usize },
}

/// Durable string key-value store.
///
/// Writes replace any previous value; removing a missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing key is `Ok(None)`.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// List `(key, value)` pairs whose key starts with `prefix`, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn items_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError>;
}

/// Simple in-memory store for testing and `sqlite::memory:`-style runs.
///
/// An optional byte quota makes writes fail once the store is full.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    items: Arc<Mutex<BTreeMap<String, String>>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes once keys plus values would exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(BTreeMap::new())),
            quota: Some(bytes),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if let Some(quota) = self.quota {
            let used: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let len = used + key.len() + value.len();
            if len > quota {
                return Err(StorageError::QuotaExceeded { len });
            }
        }

        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    async fn items_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Aggregates the storage backend behind a trait object for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { kv }
    }

    #[must_use]
    pub fn from_store(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }
}
