//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One row in the cart: a single product and how many units of it.
///
/// `name`, `price` and `image` are captured when the product is first added
/// and never re-synced from the catalog. `quantity` is at least 1; a line
/// that would reach zero is removed instead.
///
/// Serializes as `{"id": "7", "name": "Mug", "price": 12.5, "image": "/m.jpg", "quantity": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    /// Stored as a JSON number, so it passes through `f64` on the way to disk.
    /// Prices keep their value up to about 15 significant digits; anything
    /// more precise is rounded on reload.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
