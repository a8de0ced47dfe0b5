//! Key-value storage backends.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage exists but refuses access (disabled, private mode, revoked).
    #[error("storage is unavailable")]
    Unavailable,

    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded { limit: usize, requested: usize },

    /// The key cannot be used by this backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A string key-value store, shaped like browser local storage.
///
/// All methods take `&self`; implementations use interior mutability so one
/// backend can be shared by the cart and wishlist stores.
pub trait KeyValueStorage: Send + Sync + Debug {
    /// Read the value under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage backend.
///
/// Can simulate the failure modes of a browser store: a byte quota shared by
/// all keys, and an unavailable switch that makes every call fail.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl Default for MemoryInner {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            quota: None,
            available: true,
        }
    }
}

impl MemoryStorage {
    /// Create an empty, unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `bytes` of keys and values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.lock().quota = Some(bytes);
        storage
    }

    /// Make every subsequent call succeed (`true`) or fail with
    /// [`StorageError::Unavailable`] (`false`).
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.lock();
        if !inner.available {
            return Err(StorageError::Unavailable);
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if !inner.available {
            return Err(StorageError::Unavailable);
        }

        if let Some(limit) = inner.quota {
            let others: usize = inner
                .entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > limit {
                return Err(StorageError::QuotaExceeded { limit, requested });
            }
        }

        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if !inner.available {
            return Err(StorageError::Unavailable);
        }
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("nexis_cart").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "[1,2]").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_set_replaces() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "a").unwrap();
        storage.set_item("k", "b").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove_item("nope").is_ok());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "1234").unwrap();
        let err = storage.set_item("k2", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                limit: 8,
                requested: 12
            }
        ));
        // Replacing a key does not count its old value
        assert!(storage.set_item("k", "1234567").is_ok());
    }

    #[test]
    fn test_unavailable() {
        let storage = MemoryStorage::new();
        storage.set_available(false);
        assert!(matches!(
            storage.get_item("k"),
            Err(StorageError::Unavailable)
        ));
        assert!(matches!(
            storage.set_item("k", "v"),
            Err(StorageError::Unavailable)
        ));
        storage.set_available(true);
        assert!(storage.set_item("k", "v").is_ok());
    }
}
