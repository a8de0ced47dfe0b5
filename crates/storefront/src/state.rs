//! Storefront state shared across every consumer.

use std::sync::Arc;

use crate::checkout::PricingConfig;
use crate::config::StorefrontConfig;
use crate::handle::{CartHandle, WishlistHandle};
use crate::persistence::{FileStorage, KeyValueStorage, SnapshotAdapter};

/// Storefront state, built once at startup and passed to whatever needs it.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees the same cart
/// and wishlist. Separate `StorefrontState` instances over the same storage
/// are independent: whichever writes last wins.
#[derive(Debug, Clone)]
pub struct StorefrontState {
    inner: Arc<StorefrontStateInner>,
}

#[derive(Debug)]
struct StorefrontStateInner {
    cart: CartHandle,
    wishlist: WishlistHandle,
    pricing: PricingConfig,
}

impl StorefrontState {
    /// Create state over a storage backend (or none, for memory-only).
    ///
    /// The stores are created unhydrated; call [`hydrate`](Self::hydrate)
    /// once the consumer is ready, or let the first mutation do it.
    #[must_use]
    pub fn new(
        storage: Option<Arc<dyn KeyValueStorage>>,
        cart_key: &str,
        wishlist_key: &str,
        pricing: PricingConfig,
    ) -> Self {
        let adapter = |key: &str| match &storage {
            Some(storage) => SnapshotAdapter::new(Arc::clone(storage), key),
            None => SnapshotAdapter::memory_only(key),
        };

        Self {
            inner: Arc::new(StorefrontStateInner {
                cart: CartHandle::new(crate::cart::CartStore::new(adapter(cart_key))),
                wishlist: WishlistHandle::new(crate::wishlist::WishlistStore::new(adapter(
                    wishlist_key,
                ))),
                pricing,
            }),
        }
    }

    /// Create state from configuration, backed by a [`FileStorage`] profile.
    ///
    /// If the profile directory cannot be opened the state degrades to
    /// memory-only operation instead of failing.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let storage: Option<Arc<dyn KeyValueStorage>> = match &config.storage_dir {
            Some(dir) => match FileStorage::open(dir) {
                Ok(storage) => Some(Arc::new(storage)),
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Storage unavailable, running memory-only"
                    );
                    None
                }
            },
            None => None,
        };

        Self::new(storage, &config.cart_key, &config.wishlist_key, config.pricing)
    }

    /// Hydrate both stores. Safe to call any number of times.
    pub fn hydrate(&self) {
        self.inner.cart.hydrate();
        self.inner.wishlist.hydrate();
    }

    #[must_use]
    pub fn cart(&self) -> &CartHandle {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistHandle {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn pricing(&self) -> &PricingConfig {
        &self.inner.pricing
    }

    /// Whether state survives past this session.
    ///
    /// Becomes `false` if hydration finds storage unavailable.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.inner.cart.is_durable() && self.inner.wishlist.is_durable()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nexis_core::CartProduct;
    use rust_decimal::Decimal;

    use super::*;
    use crate::persistence::MemoryStorage;

    fn state_over(storage: &Arc<MemoryStorage>) -> StorefrontState {
        StorefrontState::new(
            Some(storage.clone()),
            "nexis_cart",
            "nexis_wishlist",
            PricingConfig::default(),
        )
    }

    #[test]
    fn test_clones_share_stores() {
        let state = StorefrontState::new(None, "c", "w", PricingConfig::default());
        let other = state.clone();

        state
            .cart()
            .add_item(&CartProduct::new(1, "Mug", Decimal::ONE, ""))
            .unwrap();
        other.wishlist().toggle_wishlist_item(1);

        assert_eq!(other.cart().item_count(), 1);
        assert!(state.wishlist().is_in_wishlist(1));
        assert!(!state.is_durable());
    }

    #[test]
    fn test_hydrate_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let state = state_over(&storage);
        state.hydrate();
        state
            .cart()
            .add_item(&CartProduct::new(1, "Mug", Decimal::ONE, ""))
            .unwrap();
        state.hydrate();
        assert_eq!(state.cart().item_count(), 1);
    }

    #[test]
    fn test_new_state_sees_persisted_data() {
        let storage = Arc::new(MemoryStorage::new());
        let first = state_over(&storage);
        first
            .cart()
            .add_item(&CartProduct::new(1, "Mug", Decimal::ONE, ""))
            .unwrap();
        first.wishlist().toggle_wishlist_item("9");

        let second = state_over(&storage);
        second.hydrate();
        assert_eq!(second.cart().item_count(), 1);
        assert!(second.wishlist().is_in_wishlist(9));
        assert!(second.is_durable());
    }

    #[test]
    fn test_unavailable_storage_is_not_durable() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_available(false);
        let state = state_over(&storage);
        assert!(state.is_durable());

        state.hydrate();
        assert!(!state.is_durable());
    }

    #[test]
    fn test_from_config_memory_only() {
        let config = StorefrontConfig {
            storage_dir: None,
            ..StorefrontConfig::default()
        };
        let state = StorefrontState::from_config(&config);
        assert!(!state.is_durable());
        assert_eq!(state.pricing(), &PricingConfig::default());
    }
}
