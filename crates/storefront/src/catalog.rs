//! Resolving wishlist IDs against the product catalog.
//!
//! The catalog itself lives in an external service; callers fetch it and pass
//! the products in, or point [`load_catalog`] at an export of it.

use std::collections::BTreeSet;
use std::path::Path;

use nexis_core::{CatalogProduct, ProductId};

use crate::error::{Result, StorefrontError};

/// Read a catalog export: a JSON array of products.
///
/// # Errors
///
/// Returns `StorefrontError::Catalog` naming the path if the file cannot be
/// read or is not a product array.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogProduct>> {
    let catalog_error = |reason: String| StorefrontError::Catalog {
        path: path.display().to_string(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| catalog_error(e.to_string()))?;
    let products: Vec<CatalogProduct> =
        serde_json::from_str(&raw).map_err(|e| catalog_error(e.to_string()))?;

    tracing::debug!(path = %path.display(), products = products.len(), "Loaded catalog");
    Ok(products)
}

/// Catalog products whose ID is in the wishlist, in catalog order.
#[must_use]
pub fn resolve_wishlist<'a>(
    wishlist: &BTreeSet<ProductId>,
    catalog: &'a [CatalogProduct],
) -> Vec<&'a CatalogProduct> {
    catalog
        .iter()
        .filter(|product| wishlist.contains(&product.id))
        .collect()
}

/// Wishlist IDs that no catalog product matches (discontinued or unknown).
#[must_use]
pub fn missing_from_catalog<'a>(
    wishlist: &'a BTreeSet<ProductId>,
    catalog: &[CatalogProduct],
) -> Vec<&'a ProductId> {
    let known: BTreeSet<&ProductId> = catalog.iter().map(|p| &p.id).collect();
    wishlist.iter().filter(|id| !known.contains(id)).collect()
}
