//! Core types for Nexis.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError, RawProductId};
pub use line_item::CartLineItem;
pub use price::{CurrencyCode, Price};
pub use product::{CartProduct, CatalogProduct};
