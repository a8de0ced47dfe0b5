//! Unified error type for storefront operations.
//!
//! Store mutations never fail because of storage, so storage errors stay in
//! [`crate::persistence`]. These are the failures a consumer acting on the
//! storefront can run into.

use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// A cart operation was refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// An order could not be placed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Requested product is not in the cart.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A catalog export could not be used.
    #[error("Failed to read catalog {path}: {reason}")]
    Catalog { path: String, reason: String },

    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
