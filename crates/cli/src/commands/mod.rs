//! CLI subcommands.
//!
//! Each command writes its result to stdout; toasts raised by the stores are
//! reported through `tracing` once the command finishes.

pub mod cart;
pub mod checkout;
pub mod wishlist;

use nexis_storefront::notify::{ToastLevel, ToastQueue};

pub use cart::CartAction;
pub use checkout::CheckoutAction;
pub use wishlist::WishlistAction;

/// Log every pending toast, oldest first.
pub fn report_toasts(toasts: &ToastQueue) {
    for toast in toasts.drain() {
        let action = toast
            .action
            .map(|a| format!(" [{}: {}]", a.label, a.href))
            .unwrap_or_default();
        match toast.level {
            ToastLevel::Success => tracing::info!("{}{action}", toast.message),
            ToastLevel::Error => tracing::warn!("{}{action}", toast.message),
        }
    }
}
