//! Wishlist store.
//!
//! A set of favorited product IDs. Each ID is either present or absent and
//! only [`WishlistStore::toggle_wishlist_item`] moves it between the two.
//! Full product records are never stored; consumers resolve IDs against the
//! catalog (see [`crate::catalog`]).

use std::collections::BTreeSet;
use std::sync::Arc;

use nexis_core::{ProductId, RawProductId};
use serde_json::Value;
use tracing::instrument;

use crate::notify::WishlistObserver;
use crate::persistence::{
    InvalidElement, Lifecycle, PersistenceError, SnapshotAdapter, SnapshotElement,
};

/// A committed wishlist change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { id: ProductId },
    Removed { id: ProductId },
    /// The snapshot write failed; memory still holds the change.
    PersistFailed { reason: String },
}

impl SnapshotElement for ProductId {
    fn from_snapshot_value(value: Value) -> Result<Self, InvalidElement> {
        let raw = match value {
            Value::String(s) => RawProductId::Text(s),
            Value::Number(n) => RawProductId::Number(n),
            _ => {
                return Err(InvalidElement::WrongType {
                    field: "id",
                    expected: "a number or string",
                });
            }
        };
        Ok(Self::canonicalize(raw)?)
    }
}

/// In-memory wishlist with snapshot persistence.
pub struct WishlistStore {
    ids: BTreeSet<ProductId>,
    snapshot: SnapshotAdapter,
    lifecycle: Lifecycle,
    observers: Vec<Arc<dyn WishlistObserver>>,
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("ids", &self.ids)
            .field("snapshot", &self.snapshot)
            .field("lifecycle", &self.lifecycle)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl WishlistStore {
    /// Create an empty store that has not read its snapshot yet.
    #[must_use]
    pub const fn new(snapshot: SnapshotAdapter) -> Self {
        Self {
            ids: BTreeSet::new(),
            snapshot,
            lifecycle: Lifecycle::Pending,
            observers: Vec::new(),
        }
    }

    /// Create a store and hydrate it immediately.
    #[must_use]
    pub fn open(snapshot: SnapshotAdapter) -> Self {
        let mut store = Self::new(snapshot);
        store.hydrate();
        store
    }

    pub fn subscribe(&mut self, observer: Arc<dyn WishlistObserver>) {
        self.observers.push(observer);
    }

    /// Whether changes are being written to storage.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.snapshot.is_durable()
    }

    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// Load the persisted wishlist, once per store lifetime.
    ///
    /// Returns `false` if the store was already hydrated.
    #[instrument(skip(self), fields(key = %self.snapshot.key()))]
    pub fn hydrate(&mut self) -> bool {
        if self.lifecycle.is_ready() {
            return false;
        }

        match self.snapshot.load::<ProductId>() {
            Ok(hydrated) => {
                self.ids = hydrated.items.into_iter().collect();
                tracing::info!(
                    ids = self.ids.len(),
                    rejected = hydrated.rejected.len(),
                    "Loaded wishlist from storage"
                );
            }
            Err(PersistenceError::StorageUnavailable) => {
                tracing::warn!("Storage unavailable, wishlist is memory-only for this session");
                self.snapshot.detach();
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading wishlist, starting empty");
            }
        }

        self.lifecycle = Lifecycle::Ready;
        true
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Membership is checked before the toggle, so the emitted event names
    /// the branch actually taken. Invalid IDs are ignored.
    #[instrument(skip(self, id))]
    pub fn toggle_wishlist_item(&mut self, id: impl Into<RawProductId>) {
        self.hydrate();

        let id = match ProductId::canonicalize(id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring wishlist toggle with invalid id");
                return;
            }
        };

        let event = if self.ids.remove(&id) {
            tracing::debug!(%id, "Removed from wishlist");
            WishlistEvent::Removed { id }
        } else {
            tracing::debug!(%id, "Added to wishlist");
            self.ids.insert(id.clone());
            WishlistEvent::Added { id }
        };

        let persist_result = self.persist();
        self.notify(&event);
        if let Err(e) = persist_result {
            self.notify(&WishlistEvent::PersistFailed {
                reason: e.to_string(),
            });
        }
    }

    /// Whether the product is in the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, id: impl Into<RawProductId>) -> bool {
        ProductId::canonicalize(id).is_ok_and(|id| self.ids.contains(&id))
    }

    /// The raw set of canonical IDs.
    #[must_use]
    pub const fn wishlist(&self) -> &BTreeSet<ProductId> {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if !self.lifecycle.is_ready() || !self.snapshot.is_durable() {
            return Ok(());
        }
        let ids: Vec<&ProductId> = self.ids.iter().collect();
        self.snapshot.save(&ids).inspect_err(|e| {
            tracing::error!(error = %e, "Error saving wishlist to storage");
        })
    }

    fn notify(&self, event: &WishlistEvent) {
        for observer in &self.observers {
            observer.on_wishlist_event(event);
        }
    }
}
