//! Nexis Core - Shared domain types for the storefront cart.
//!
//! This crate provides the types used by every Nexis component:
//! - `storefront` - Cart and wishlist stores with local persistence
//! - `cli` - Command-line consumer of the stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Canonical product IDs, prices, cart line items, and catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
