//! Nexis Storefront library.
//!
//! Client-side state for the storefront: the cart, the wishlist, and their
//! persistence to a local key-value store.
//!
//! # Data flow
//!
//! Consumer call → store mutation → state committed → snapshot written →
//! observers notified. Hydration runs the other way, once, before the first
//! write.
//!
//! # Modules
//!
//! - [`persistence`] - Storage backends and the snapshot adapter
//! - [`cart`] / [`wishlist`] - The two stores
//! - [`handle`] - Shared handles consumers call into
//! - [`notify`] - Observers that turn events into toasts and logs
//! - [`checkout`] - Order summary and order placement
//! - [`catalog`] - Resolving wishlist IDs into catalog products
//! - [`state`] - The context object built once at startup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handle;
pub mod notify;
pub mod persistence;
pub mod state;
pub mod wishlist;

pub use error::{Result, StorefrontError};
pub use handle::{CartHandle, WishlistHandle};
pub use state::StorefrontState;
