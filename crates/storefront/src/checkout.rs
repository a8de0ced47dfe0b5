//! Order summary and checkout.
//!
//! Payment capture is out of scope; placing an order validates the shipping
//! details, snapshots the cart into a confirmation, and clears the cart.

use chrono::{DateTime, Utc};
use nexis_core::{CartLineItem, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::handle::CartHandle;

/// Tax and shipping rules applied to the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax (0.08 = 8%).
    pub tax_rate: Decimal,
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged below the threshold.
    pub standard_shipping: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            free_shipping_threshold: Decimal::new(50, 0),
            standard_shipping: Decimal::ZERO,
        }
    }
}

/// Money breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the breakdown for a set of lines.
    ///
    /// Tax is rounded to whole cents. An empty cart costs nothing, including
    /// shipping.
    #[must_use]
    pub fn from_lines(lines: &[CartLineItem], pricing: &PricingConfig) -> Self {
        let subtotal: Decimal = lines.iter().map(CartLineItem::line_total).sum();
        let item_count = lines.iter().map(|l| u64::from(l.quantity)).sum();

        let shipping = if lines.is_empty() || subtotal >= pricing.free_shipping_threshold {
            Decimal::ZERO
        } else {
            pricing.standard_shipping
        };
        let tax = Price::round_to_cents(subtotal * pricing.tax_rate);

        Self {
            item_count,
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Whether shipping is free for this order.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Where the order goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Country used when the shopper does not pick one.
pub const DEFAULT_COUNTRY: &str = "United States";

impl ShippingDetails {
    /// Check that every required field is filled in and the email is plausible.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ShippingError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ShippingError::MissingField(field));
            }
        }

        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(())
            }
            _ => Err(ShippingError::InvalidEmail(self.email.clone())),
        }
    }
}

/// Problems with shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShippingError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Errors that stop an order from being placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error("invalid shipping details: {0}")]
    InvalidShipping(#[from] ShippingError),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_number: Uuid,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLineItem>,
    pub summary: OrderSummary,
    pub shipping: ShippingDetails,
}

/// Place an order for everything in the cart, emptying the cart.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if there is nothing to order, or
/// `CheckoutError::InvalidShipping` if the shipping details are incomplete.
/// The cart is untouched on error.
pub fn place_order(
    cart: &CartHandle,
    pricing: &PricingConfig,
    shipping: ShippingDetails,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    shipping.validate()?;

    // Lines are taken and cleared together so a concurrent add either makes
    // it into this order or stays in the cart.
    let lines = cart.take_lines();
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = OrderSummary::from_lines(&lines, pricing);
    let confirmation = OrderConfirmation {
        order_number: Uuid::new_v4(),
        placed_at: Utc::now(),
        lines,
        summary,
        shipping,
    };

    tracing::info!(
        order_number = %confirmation.order_number,
        item_count = summary.item_count,
        total = %summary.total,
        "Order placed"
    );

    Ok(confirmation)
}
