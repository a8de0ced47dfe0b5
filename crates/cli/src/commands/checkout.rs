//! Checkout commands.
//!
//! # Usage
//!
//! ```bash
//! nexis checkout summary
//! nexis checkout place --first-name Ada --last-name Lovelace \
//!     --email ada@example.com --address "12 Analytical Way" \
//!     --city London --state LDN --zip-code N1 [--json]
//! ```

use std::io::Write;

use clap::{Args, Subcommand};
use nexis_core::Price;
use nexis_storefront::{Result, StorefrontState};
use nexis_storefront::checkout::{
    DEFAULT_COUNTRY, OrderConfirmation, OrderSummary, ShippingDetails, place_order,
};

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// Show subtotal, shipping, tax and total for the cart
    Summary,
    /// Place an order for everything in the cart
    Place {
        #[command(flatten)]
        shipping: ShippingArgs,
        /// Print the confirmation as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Shipping details collected on the checkout form.
#[derive(Args)]
pub struct ShippingArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip_code: String,
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,
}

impl From<ShippingArgs> for ShippingDetails {
    fn from(args: ShippingArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        }
    }
}

/// Run a checkout command against the shared state.
///
/// # Errors
///
/// Returns an error if the order cannot be placed or stdout is closed.
pub fn run(state: &StorefrontState, action: CheckoutAction) -> Result<()> {
    let mut out = std::io::stdout().lock();

    match action {
        CheckoutAction::Summary => {
            let summary = OrderSummary::from_lines(&state.cart().items(), state.pricing());
            write_summary(&mut out, &summary)?;
        }
        CheckoutAction::Place { shipping, json } => {
            let confirmation = place_order(state.cart(), state.pricing(), shipping.into())?;
            if json {
                serde_json::to_writer_pretty(&mut out, &confirmation)?;
                writeln!(out)?;
            } else {
                write_confirmation(&mut out, &confirmation)?;
            }
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &OrderSummary) -> std::io::Result<()> {
    let shipping = if summary.ships_free() {
        "Free".to_string()
    } else {
        Price::from_amount(summary.shipping).to_string()
    };

    writeln!(out, "Items:     {}", summary.item_count)?;
    writeln!(out, "Subtotal:  {}", Price::from_amount(summary.subtotal))?;
    writeln!(out, "Shipping:  {shipping}")?;
    writeln!(out, "Tax:       {}", Price::from_amount(summary.tax))?;
    writeln!(out, "Total:     {}", Price::from_amount(summary.total))
}

fn write_confirmation(out: &mut impl Write, confirmation: &OrderConfirmation) -> std::io::Result<()> {
    writeln!(out, "Order {} placed", confirmation.order_number)?;
    writeln!(out, "Placed at: {}", confirmation.placed_at.to_rfc3339())?;
    writeln!(
        out,
        "Ship to:   {} {}, {}, {}",
        confirmation.shipping.first_name,
        confirmation.shipping.last_name,
        confirmation.shipping.city,
        confirmation.shipping.country,
    )?;
    write_summary(out, &confirmation.summary)
}
