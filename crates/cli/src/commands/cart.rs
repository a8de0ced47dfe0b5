//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! nexis cart show
//! nexis cart add 7 "Mug" 12.50 --image /img/mug.jpg
//! nexis cart remove 7        # one unit
//! nexis cart set 7 3
//! nexis cart clear
//! ```

use std::io::Write;

use clap::Subcommand;
use nexis_core::{CartLineItem, CartProduct, Price};
use nexis_storefront::{Result, StorefrontError, StorefrontState};
use rust_decimal::Decimal;

#[derive(Subcommand)]
pub enum CartAction {
    /// List the cart lines and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
        /// Product name
        name: String,
        /// Unit price
        price: Decimal,
        /// Product image URL
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove one unit of a product (the line goes when it reaches zero)
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (values below 1 become 1)
    Set {
        /// Product ID
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

/// Run a cart command against the shared state.
///
/// # Errors
///
/// Returns an error if the product is invalid or missing, or stdout is closed.
pub fn run(state: &StorefrontState, action: CartAction) -> Result<()> {
    let cart = state.cart();
    match action {
        CartAction::Show => {}
        CartAction::Add {
            id,
            name,
            price,
            image,
        } => {
            cart.add_to_cart(&CartProduct::new(id.as_str(), name, price, image))?;
        }
        CartAction::Remove { id } => {
            cart.remove_from_cart(id.as_str())
                .ok_or_else(|| StorefrontError::NotFound(format!("product {id} in cart")))?;
        }
        CartAction::Set { id, quantity } => {
            cart.update_item_quantity(id.as_str(), quantity)
                .ok_or_else(|| StorefrontError::NotFound(format!("product {id} in cart")))?;
        }
        CartAction::Clear => {
            cart.clear_cart();
        }
    }

    let mut out = std::io::stdout().lock();
    write_cart(&mut out, &cart.items(), cart.get_item_count(), cart.get_cart_total())?;
    Ok(())
}

/// Render the cart as a plain-text table.
pub fn write_cart(
    out: &mut impl Write,
    lines: &[CartLineItem],
    item_count: u64,
    total: Decimal,
) -> std::io::Result<()> {
    if lines.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    for line in lines {
        writeln!(
            out,
            "{:>8}  {:<32} {:>4} x {:>10} = {:>10}",
            line.id,
            line.name,
            line.quantity,
            Price::from_amount(line.price),
            Price::from_amount(line.line_total()),
        )?;
    }
    writeln!(out, "{item_count} item(s), total {}", Price::from_amount(total))
}
