//! Generic "array under a key" snapshot adapter.

use std::sync::Arc;

use nexis_core::ProductIdError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use super::PersistenceError;
use super::storage::{KeyValueStorage, StorageError};

/// Why a single stored element was rejected during hydration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidElement {
    #[error("expected an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{0}` is out of range")]
    OutOfRange(&'static str),
    #[error("invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),
}

/// An element type that can be validated out of a stored JSON array.
pub trait SnapshotElement: Serialize + Sized {
    /// Validate and convert one array element.
    ///
    /// # Errors
    ///
    /// Returns the reason the element cannot be used; the adapter drops it
    /// and keeps its siblings.
    fn from_snapshot_value(value: Value) -> Result<Self, InvalidElement>;
}

/// The result of a successful load.
#[derive(Debug)]
pub struct Hydrated<T> {
    /// Elements that passed validation, in stored order.
    pub items: Vec<T>,
    /// One `PersistenceError::ElementInvalid` per dropped element.
    pub rejected: Vec<PersistenceError>,
}

impl<T> Hydrated<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Hydration state of a store.
///
/// Writes are only allowed once the store is `Ready`, so a default empty
/// state can never overwrite a snapshot that has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Pending,
    Ready,
}

impl Lifecycle {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Loads and saves one JSON array under a fixed key.
///
/// Knows nothing about carts or wishlists beyond the element type's
/// validation predicate.
#[derive(Debug, Clone)]
pub struct SnapshotAdapter {
    storage: Option<Arc<dyn KeyValueStorage>>,
    key: String,
}

impl SnapshotAdapter {
    /// Create an adapter over a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage: Some(storage),
            key: key.into(),
        }
    }

    /// Create an adapter with no backend: loads report
    /// [`PersistenceError::StorageUnavailable`] and nothing is ever written.
    #[must_use]
    pub fn memory_only(key: impl Into<String>) -> Self {
        Self {
            storage: None,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a storage backend is attached.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.storage.is_some()
    }

    /// Drop the storage backend for the rest of the session.
    ///
    /// Called when a load finds storage unavailable: the snapshot was never
    /// read, so it must never be written either.
    pub fn detach(&mut self) {
        if self.storage.take().is_some() {
            tracing::debug!(key = %self.key, "Detached from storage");
        }
    }

    /// Load and validate the stored array.
    ///
    /// A missing key loads as empty. Invalid elements are logged and
    /// reported in [`Hydrated::rejected`] without failing the load.
    ///
    /// # Errors
    ///
    /// - `StorageUnavailable` if there is no usable backend
    /// - `CorruptPayload` if the value is not a JSON array
    /// - `Storage` for any other backend failure
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load<T: SnapshotElement>(&self) -> Result<Hydrated<T>, PersistenceError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or(PersistenceError::StorageUnavailable)?;

        let raw = match storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No saved snapshot found");
                return Ok(Hydrated::empty());
            }
            Err(StorageError::Unavailable) => return Err(PersistenceError::StorageUnavailable),
            Err(e) => return Err(e.into()),
        };

        let elements = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(elements)) => elements,
            Ok(other) => {
                return Err(self.corrupt(format!("expected an array, found {}", kind_of(&other))));
            }
            Err(e) => return Err(self.corrupt(e.to_string())),
        };

        let mut hydrated = Hydrated::empty();
        for (index, element) in elements.into_iter().enumerate() {
            match T::from_snapshot_value(element) {
                Ok(item) => hydrated.items.push(item),
                Err(reason) => {
                    tracing::warn!(index, %reason, "Dropping invalid snapshot element");
                    hydrated
                        .rejected
                        .push(PersistenceError::ElementInvalid { index, reason });
                }
            }
        }

        tracing::debug!(
            loaded = hydrated.items.len(),
            rejected = hydrated.rejected.len(),
            "Loaded snapshot"
        );
        Ok(hydrated)
    }

    /// Write the full array, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// - `StorageUnavailable` if there is no usable backend
    /// - `Encode` if the items cannot be serialized
    /// - `Storage` if the backend rejects the write (e.g. quota exceeded)
    #[instrument(skip(self, items), fields(key = %self.key, len = items.len()))]
    pub fn save<T: Serialize>(&self, items: &[T]) -> Result<(), PersistenceError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or(PersistenceError::StorageUnavailable)?;
        let payload = serde_json::to_string(items)?;
        match storage.set_item(&self.key, &payload) {
            Ok(()) => Ok(()),
            Err(StorageError::Unavailable) => Err(PersistenceError::StorageUnavailable),
            Err(e) => Err(e.into()),
        }
    }

    fn corrupt(&self, reason: String) -> PersistenceError {
        PersistenceError::CorruptPayload {
            key: self.key.clone(),
            reason,
        }
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    /// Accepts positive integers only.
    #[derive(Debug, PartialEq, Serialize)]
    struct Positive(u64);

    impl SnapshotElement for Positive {
        fn from_snapshot_value(value: Value) -> Result<Self, InvalidElement> {
            match value.as_u64() {
                Some(n) if n > 0 => Ok(Self(n)),
                Some(_) => Err(InvalidElement::OutOfRange("value")),
                None => Err(InvalidElement::WrongType {
                    field: "value",
                    expected: "a positive integer",
                }),
            }
        }
    }

    fn adapter_with(raw: Option<&str>) -> SnapshotAdapter {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(raw) = raw {
            storage.set_item("k", raw).unwrap();
        }
        SnapshotAdapter::new(storage, "k")
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let hydrated = adapter_with(None).load::<Positive>().unwrap();
        assert!(hydrated.items.is_empty());
        assert!(hydrated.rejected.is_empty());
    }

    #[test]
    fn test_invalid_elements_dropped_siblings_kept() {
        let hydrated = adapter_with(Some(r#"[1, "two", 3, 0]"#))
            .load::<Positive>()
            .unwrap();
        assert_eq!(hydrated.items, vec![Positive(1), Positive(3)]);
        assert_eq!(hydrated.rejected.len(), 2);
        assert!(matches!(
            hydrated.rejected[0],
            PersistenceError::ElementInvalid { index: 1, .. }
        ));
        assert!(matches!(
            hydrated.rejected[1],
            PersistenceError::ElementInvalid {
                index: 3,
                reason: InvalidElement::OutOfRange("value")
            }
        ));
    }

    #[test]
    fn test_not_json_is_corrupt() {
        let err = adapter_with(Some("{not json")).load::<Positive>().unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptPayload { .. }));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let err = adapter_with(Some(r#"{"a": 1}"#))
            .load::<Positive>()
            .unwrap_err();
        match err {
            PersistenceError::CorruptPayload { key, reason } => {
                assert_eq!(key, "k");
                assert!(reason.contains("an object"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_memory_only_is_unavailable() {
        let adapter = SnapshotAdapter::memory_only("k");
        assert!(!adapter.is_durable());
        assert!(matches!(
            adapter.load::<Positive>(),
            Err(PersistenceError::StorageUnavailable)
        ));
        assert!(matches!(
            adapter.save(&[Positive(1)]),
            Err(PersistenceError::StorageUnavailable)
        ));
    }

    #[test]
    fn test_save_writes_full_array() {
        let storage = Arc::new(MemoryStorage::new());
        let adapter = SnapshotAdapter::new(storage.clone(), "k");
        adapter.save(&[Positive(4), Positive(5)]).unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("[4,5]"));

        let hydrated = adapter.load::<Positive>().unwrap();
        assert_eq!(hydrated.items, vec![Positive(4), Positive(5)]);
    }

    #[test]
    fn test_unavailable_backend_maps_to_storage_unavailable() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_available(false);
        let adapter = SnapshotAdapter::new(storage, "k");
        assert!(matches!(
            adapter.load::<Positive>(),
            Err(PersistenceError::StorageUnavailable)
        ));
    }

    #[test]
    fn test_quota_failure_surfaces_as_storage_error() {
        let adapter = SnapshotAdapter::new(Arc::new(MemoryStorage::with_quota(4)), "k");
        assert!(matches!(
            adapter.save(&[Positive(1), Positive(2), Positive(3)]),
            Err(PersistenceError::Storage(StorageError::QuotaExceeded { .. }))
        ));
    }

    #[test]
    fn test_detach_stops_writes() {
        let storage = Arc::new(MemoryStorage::new());
        let mut adapter = SnapshotAdapter::new(storage.clone(), "k");
        adapter.detach();

        assert!(!adapter.is_durable());
        assert!(matches!(
            adapter.save(&[Positive(1)]),
            Err(PersistenceError::StorageUnavailable)
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_lifecycle_default_pending() {
        assert!(!Lifecycle::default().is_ready());
        assert!(Lifecycle::Ready.is_ready());
    }
}
