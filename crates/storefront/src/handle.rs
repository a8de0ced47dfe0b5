//! Consumer-facing handles to the shared stores.
//!
//! Every page element that shows or changes the cart holds a [`CartHandle`];
//! clones share one store, so the header badge, the cart page and checkout
//! always agree. The method names mirror what storefront pages call
//! (`add_to_cart`, `remove_from_cart`, `get_cart_total`, ...).
//!
//! Observers run while the store is locked and must not call back into the
//! same handle.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nexis_core::{CartLineItem, CartProduct, ProductId, RawProductId};
use rust_decimal::Decimal;

use crate::cart::{CartError, CartEvent, CartStore};
use crate::notify::{CartObserver, WishlistObserver};
use crate::persistence::SnapshotAdapter;
use crate::wishlist::WishlistStore;

/// Shared handle to the cart store.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Arc<Mutex<CartStore>>,
}

impl CartHandle {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Open and hydrate a store over `snapshot`.
    #[must_use]
    pub fn open(snapshot: SnapshotAdapter) -> Self {
        Self::new(CartStore::open(snapshot))
    }

    /// Hydrate the store if it has not been hydrated yet.
    pub fn hydrate(&self) -> bool {
        self.lock().hydrate()
    }

    pub fn subscribe(&self, observer: Arc<dyn CartObserver>) {
        self.lock().subscribe(observer);
    }

    /// Add one unit of a product. See [`CartStore::add_item`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if the product ID is unusable.
    pub fn add_item(&self, product: &CartProduct) -> Result<CartEvent, CartError> {
        self.lock().add_item(product)
    }

    /// Same as [`add_item`](Self::add_item).
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if the product ID is unusable.
    pub fn add_to_cart(&self, product: &CartProduct) -> Result<CartEvent, CartError> {
        self.add_item(product)
    }

    /// Remove one unit of a product. See [`CartStore::remove_from_cart`].
    pub fn remove_from_cart(&self, id: impl Into<RawProductId>) -> Option<CartEvent> {
        self.lock().remove_from_cart(id)
    }

    /// Same as [`remove_from_cart`](Self::remove_from_cart).
    pub fn remove_item(&self, id: impl Into<RawProductId>) -> Option<CartEvent> {
        self.remove_from_cart(id)
    }

    /// Set a line's quantity, clamped to at least 1.
    pub fn update_item_quantity(&self, id: impl Into<RawProductId>, quantity: i64) -> Option<CartEvent> {
        self.lock().update_item_quantity(id, quantity)
    }

    pub fn clear_cart(&self) -> CartEvent {
        self.lock().clear_cart()
    }

    /// Remove and return every line under a single lock.
    pub fn take_lines(&self) -> Vec<CartLineItem> {
        self.lock().take_lines()
    }

    /// A copy of the current lines.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().items().to_vec()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lock().item_count()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lock().total()
    }

    /// Same as [`item_count`](Self::item_count).
    #[must_use]
    pub fn get_item_count(&self) -> u64 {
        self.item_count()
    }

    /// Same as [`total`](Self::total).
    #[must_use]
    pub fn get_cart_total(&self) -> Decimal {
        self.total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether changes are being written to storage.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.lock().is_durable()
    }

    fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared handle to the wishlist store.
#[derive(Debug, Clone)]
pub struct WishlistHandle {
    store: Arc<Mutex<WishlistStore>>,
}

impl WishlistHandle {
    #[must_use]
    pub fn new(store: WishlistStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    #[must_use]
    pub fn open(snapshot: SnapshotAdapter) -> Self {
        Self::new(WishlistStore::open(snapshot))
    }

    pub fn hydrate(&self) -> bool {
        self.lock().hydrate()
    }

    pub fn subscribe(&self, observer: Arc<dyn WishlistObserver>) {
        self.lock().subscribe(observer);
    }

    pub fn toggle_wishlist_item(&self, id: impl Into<RawProductId>) {
        self.lock().toggle_wishlist_item(id);
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: impl Into<RawProductId>) -> bool {
        self.lock().is_in_wishlist(id)
    }

    /// A copy of the current set of IDs.
    #[must_use]
    pub fn wishlist(&self) -> BTreeSet<ProductId> {
        self.lock().wishlist().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether changes are being written to storage.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.lock().is_durable()
    }

    fn lock(&self) -> MutexGuard<'_, WishlistStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
