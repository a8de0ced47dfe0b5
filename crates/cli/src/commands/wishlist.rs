//! Wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! nexis wishlist toggle 7
//! nexis wishlist check 7
//! nexis wishlist show
//! nexis wishlist show --catalog catalog.json
//! ```
//!
//! The catalog file is a JSON array of products
//! (`{"id", "name", "price", "image", "category"}`), as exported by the
//! catalog service.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use nexis_core::{CatalogProduct, Price};
use nexis_storefront::catalog::{load_catalog, missing_from_catalog, resolve_wishlist};
use nexis_storefront::{Result, StorefrontState};

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List the wishlist
    Show {
        /// Resolve IDs against this catalog export
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        /// Product ID
        id: String,
    },
    /// Report whether a product is in the wishlist
    Check {
        /// Product ID
        id: String,
    },
}

/// Run a wishlist command against the shared state.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or stdout is closed.
pub fn run(state: &StorefrontState, action: WishlistAction) -> Result<()> {
    let wishlist = state.wishlist();
    let mut out = std::io::stdout().lock();

    match action {
        WishlistAction::Show { catalog: None } => {
            let ids = wishlist.wishlist();
            if ids.is_empty() {
                writeln!(out, "Your wishlist is empty")?;
            }
            for id in ids {
                writeln!(out, "{id}")?;
            }
        }
        WishlistAction::Show {
            catalog: Some(path),
        } => {
            let catalog = load_catalog(&path)?;
            write_resolved(&mut out, &wishlist.wishlist(), &catalog)?;
        }
        WishlistAction::Toggle { id } => {
            wishlist.toggle_wishlist_item(id.as_str());
            let membership = if wishlist.is_in_wishlist(id.as_str()) {
                "in"
            } else {
                "not in"
            };
            writeln!(out, "{} is {membership} the wishlist", id.trim())?;
        }
        WishlistAction::Check { id } => {
            let found = wishlist.is_in_wishlist(id.as_str());
            writeln!(out, "{found}")?;
        }
    }
    Ok(())
}

/// Render wishlisted products in catalog order, then any IDs the catalog lacks.
fn write_resolved(
    out: &mut impl Write,
    ids: &std::collections::BTreeSet<nexis_core::ProductId>,
    catalog: &[CatalogProduct],
) -> std::io::Result<()> {
    if ids.is_empty() {
        return writeln!(out, "Your wishlist is empty");
    }

    for product in resolve_wishlist(ids, catalog) {
        writeln!(
            out,
            "{:>8}  {:<32} {:>10}",
            product.id,
            product.name,
            Price::from_amount(product.price),
        )?;
    }
    for id in missing_from_catalog(ids, catalog) {
        writeln!(out, "{id:>8}  (no longer available)")?;
    }
    Ok(())
}
