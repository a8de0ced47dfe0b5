//! Cart store.
//!
//! Holds the authoritative list of line items for one storefront session.
//! Every public operation canonicalizes product IDs at entry, so the cart
//! never holds two lines for the same product.
//!
//! # Persistence
//!
//! After each successful mutation the full line list is written through the
//! [`SnapshotAdapter`]. A failed write is logged and reported to observers as
//! [`CartEvent::PersistFailed`]; the in-memory change stands.

mod snapshot;

use std::sync::Arc;

use nexis_core::{CartLineItem, CartProduct, ProductId, ProductIdError, RawProductId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use crate::notify::CartObserver;
use crate::persistence::{Lifecycle, PersistenceError, SnapshotAdapter};

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no usable ID; the cart was not changed.
    #[error("cannot add invalid product to cart: {0}")]
    InvalidProduct(#[from] ProductIdError),
    /// Prices must not be negative; the cart was not changed.
    #[error("cannot add product with negative price {0}")]
    NegativePrice(Decimal),
}

/// A state change (or refusal) emitted by the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A unit was added; `quantity` is the line's new quantity (1 for a new line).
    ItemAdded {
        id: ProductId,
        name: String,
        quantity: u32,
    },
    /// One unit was removed from a line that still has `quantity` units.
    ItemDecremented { id: ProductId, quantity: u32 },
    /// The line's last unit was removed.
    ItemRemoved { id: ProductId },
    /// The line's quantity was set directly (after clamping).
    QuantityUpdated { id: ProductId, quantity: u32 },
    /// All lines were removed.
    Cleared { removed_lines: usize },
    /// An add was refused; nothing changed.
    AddRejected { reason: CartError },
    /// The snapshot write after a mutation failed; memory still holds the change.
    PersistFailed { reason: String },
}

/// In-memory cart state with snapshot persistence.
pub struct CartStore {
    lines: Vec<CartLineItem>,
    snapshot: SnapshotAdapter,
    lifecycle: Lifecycle,
    observers: Vec<Arc<dyn CartObserver>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("snapshot", &self.snapshot)
            .field("lifecycle", &self.lifecycle)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty store that has not read its snapshot yet.
    ///
    /// The snapshot is read on the first call to [`hydrate`](Self::hydrate)
    /// or the first mutation, whichever comes first.
    #[must_use]
    pub const fn new(snapshot: SnapshotAdapter) -> Self {
        Self {
            lines: Vec::new(),
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

    /// Register an observer for every subsequent event.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Whether changes are being written to storage.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.snapshot.is_durable()
    }

    /// Whether the snapshot has been read.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// Load the persisted cart, once per store lifetime.
    ///
    /// Returns `false` if the store was already hydrated. Storage failures and
    /// corrupt payloads leave the cart empty; invalid lines are dropped
    /// individually.
    #[instrument(skip(self), fields(key = %self.snapshot.key()))]
    pub fn hydrate(&mut self) -> bool {
        if self.lifecycle.is_ready() {
            return false;
        }

        match self.snapshot.load::<CartLineItem>() {
            Ok(hydrated) => {
                self.lines = snapshot::merge_duplicate_lines(hydrated.items);
                tracing::info!(
                    lines = self.lines.len(),
                    rejected = hydrated.rejected.len(),
                    "Loaded cart from storage"
                );
            }
            Err(PersistenceError::StorageUnavailable) => {
                tracing::warn!("Storage unavailable, cart is memory-only for this session");
                self.snapshot.detach();
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading cart, starting empty");
            }
        }

        self.lifecycle = Lifecycle::Ready;
        true
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same canonical ID gains a unit and keeps its
    /// original name, price and image. Otherwise a new line with quantity 1 is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if the product ID is empty or zero,
    /// or `CartError::NegativePrice` if the price is below zero. The cart is
    /// left unchanged and observers receive [`CartEvent::AddRejected`].
    #[instrument(skip(self, product), fields(id = ?product.id, name = %product.name))]
    pub fn add_item(&mut self, product: &CartProduct) -> Result<CartEvent, CartError> {
        self.hydrate();

        let id = match validate_product(product) {
            Ok(id) => id,
            Err(reason) => {
                tracing::error!(error = %reason, "Invalid product");
                self.notify(&CartEvent::AddRejected {
                    reason: reason.clone(),
                });
                return Err(reason);
            }
        };

        let event = if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = line.quantity.saturating_add(1);
            CartEvent::ItemAdded {
                id,
                name: line.name.clone(),
                quantity: line.quantity,
            }
        } else {
            self.lines.push(CartLineItem {
                id: id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: 1,
            });
            CartEvent::ItemAdded {
                id,
                name: product.name.clone(),
                quantity: 1,
            }
        };

        Ok(self.commit(event))
    }

    /// Remove one unit of a product.
    ///
    /// Decrements the line when it has more than one unit, otherwise removes
    /// the line. Returns `None` if no line matches.
    #[instrument(skip(self, id))]
    pub fn remove_from_cart(&mut self, id: impl Into<RawProductId>) -> Option<CartEvent> {
        self.hydrate();

        let id = canonical_or_log(id)?;
        let index = self.lines.iter().position(|l| l.id == id)?;
        let line = self.lines.get_mut(index)?;

        let event = if line.quantity > 1 {
            line.quantity -= 1;
            CartEvent::ItemDecremented {
                id,
                quantity: line.quantity,
            }
        } else {
            self.lines.remove(index);
            CartEvent::ItemRemoved { id }
        };

        Some(self.commit(event))
    }

    /// Set a line's quantity directly, clamped to at least 1.
    ///
    /// Never removes a line. Returns `None` if no line matches.
    #[instrument(skip(self, id))]
    pub fn update_item_quantity(
        &mut self,
        id: impl Into<RawProductId>,
        quantity: i64,
    ) -> Option<CartEvent> {
        self.hydrate();

        let id = canonical_or_log(id)?;
        let line = self.lines.iter_mut().find(|l| l.id == id)?;
        line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        let event = CartEvent::QuantityUpdated {
            id,
            quantity: line.quantity,
        };
        Some(self.commit(event))
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> CartEvent {
        self.hydrate();

        let removed_lines = self.lines.len();
        self.lines.clear();
        self.commit(CartEvent::Cleared { removed_lines })
    }

    /// Remove and return every line in one step.
    ///
    /// Persists and emits [`CartEvent::Cleared`] like [`clear_cart`](Self::clear_cart).
    /// An empty cart is left alone and nothing is emitted.
    #[instrument(skip(self))]
    pub fn take_lines(&mut self) -> Vec<CartLineItem> {
        self.hydrate();

        if self.lines.is_empty() {
            return Vec::new();
        }
        let lines = std::mem::take(&mut self.lines);
        self.commit(CartEvent::Cleared {
            removed_lines: lines.len(),
        });
        lines
    }

    /// Current lines, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, id: impl Into<RawProductId>) -> Option<&CartLineItem> {
        let id = ProductId::canonicalize(id).ok()?;
        self.lines.iter().find(|l| l.id == id)
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn commit(&mut self, event: CartEvent) -> CartEvent {
        tracing::debug!(?event, item_count = self.item_count(), total = %self.total(), "Cart updated");
        let persist_result = self.persist();
        self.notify(&event);
        if let Err(e) = persist_result {
            self.notify(&CartEvent::PersistFailed {
                reason: e.to_string(),
            });
        }
        event
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if !self.lifecycle.is_ready() || !self.snapshot.is_durable() {
            return Ok(());
        }
        self.snapshot.save(&self.lines).inspect_err(|e| {
            tracing::error!(error = %e, "Error saving cart to storage");
        })
    }

    fn notify(&self, event: &CartEvent) {
        for observer in &self.observers {
            observer.on_cart_event(event);
        }
    }
}

/// The checks a line must pass to be reloaded later, applied up front.
fn validate_product(product: &CartProduct) -> Result<ProductId, CartError> {
    let id = ProductId::canonicalize(product.id.clone())?;
    if product.price < Decimal::ZERO {
        return Err(CartError::NegativePrice(product.price));
    }
    Ok(id)
}

fn canonical_or_log(id: impl Into<RawProductId>) -> Option<ProductId> {
    ProductId::canonicalize(id)
        .inspect_err(|e| tracing::debug!(error = %e, "Ignoring cart operation with invalid id"))
        .ok()
}
