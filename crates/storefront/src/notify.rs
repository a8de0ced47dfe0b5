//! Observer layer between the stores and the shopper.
//!
//! Stores only emit events. Whether an event becomes a toast, a log line, or
//! nothing at all is decided here, so store logic can be tested without any
//! UI feedback attached.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cart::CartEvent;
use crate::wishlist::WishlistEvent;

/// Receives every cart event after the state change is committed.
pub trait CartObserver: Send + Sync {
    fn on_cart_event(&self, event: &CartEvent);
}

/// Receives every wishlist event after the state change is committed.
pub trait WishlistObserver: Send + Sync {
    fn on_wishlist_event(&self, event: &WishlistEvent);
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A link shown alongside a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub label: String,
    pub href: String,
}

/// A transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub action: Option<ToastAction>,
}

impl Toast {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
            action: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
            action: None,
        }
    }

    fn with_action(mut self, label: &str, href: &str) -> Self {
        self.action = Some(ToastAction {
            label: label.to_string(),
            href: href.to_string(),
        });
        self
    }
}

/// Collects toasts for the consumer surface to display.
///
/// Only user-facing outcomes produce toasts: successful adds, refused adds,
/// failed saves, and wishlist membership changes. Decrements, quantity edits
/// and clears are silent.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all pending toasts, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of pending toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, toast: Toast) {
        self.lock().push(toast);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartObserver for ToastQueue {
    fn on_cart_event(&self, event: &CartEvent) {
        match event {
            CartEvent::ItemAdded { name, .. } => {
                self.push(
                    Toast::success(format!("{name} added to cart!")).with_action("View Cart", "/cart"),
                );
            }
            CartEvent::AddRejected { .. } => {
                self.push(Toast::error("Cannot add invalid product to cart"));
            }
            CartEvent::PersistFailed { .. } => self.push(Toast::error("Failed to save cart")),
            CartEvent::ItemDecremented { .. }
            | CartEvent::ItemRemoved { .. }
            | CartEvent::QuantityUpdated { .. }
            | CartEvent::Cleared { .. } => {}
        }
    }
}

impl WishlistObserver for ToastQueue {
    fn on_wishlist_event(&self, event: &WishlistEvent) {
        match event {
            WishlistEvent::Added { .. } => self.push(Toast::success("Added to wishlist")),
            WishlistEvent::Removed { .. } => self.push(Toast::success("Removed from wishlist")),
            WishlistEvent::PersistFailed { .. } => {
                self.push(Toast::error("Failed to save wishlist"));
            }
        }
    }
}

/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_cart_event(&self, event: &CartEvent) {
        tracing::debug!(?event, "cart event");
    }
}

impl WishlistObserver for TracingObserver {
    fn on_wishlist_event(&self, event: &WishlistEvent) {
        tracing::debug!(?event, "wishlist event");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nexis_core::{ProductId, ProductIdError};

    use super::*;
    use crate::cart::CartError;

    fn id(raw: i64) -> ProductId {
        ProductId::canonicalize(raw).unwrap()
    }

    #[test]
    fn test_add_success_toast_has_view_cart_action() {
        let queue = ToastQueue::new();
        queue.on_cart_event(&CartEvent::ItemAdded {
            id: id(7),
            name: "Mug".to_string(),
            quantity: 1,
        });

        let toasts = queue.drain();
        assert_eq!(
            toasts,
            vec![Toast {
                level: ToastLevel::Success,
                message: "Mug added to cart!".to_string(),
                action: Some(ToastAction {
                    label: "View Cart".to_string(),
                    href: "/cart".to_string(),
                }),
            }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rejected_and_persist_failures_are_errors() {
        let queue = ToastQueue::new();
        queue.on_cart_event(&CartEvent::AddRejected {
            reason: CartError::InvalidProduct(ProductIdError::Empty),
        });
        queue.on_cart_event(&CartEvent::PersistFailed {
            reason: "quota".to_string(),
        });

        let toasts = queue.drain();
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| t.level == ToastLevel::Error));
        assert_eq!(toasts[0].message, "Cannot add invalid product to cart");
        assert_eq!(toasts[1].message, "Failed to save cart");
    }

    #[test]
    fn test_quiet_cart_events() {
        let queue = ToastQueue::new();
        queue.on_cart_event(&CartEvent::ItemRemoved { id: id(1) });
        queue.on_cart_event(&CartEvent::QuantityUpdated {
            id: id(1),
            quantity: 3,
        });
        queue.on_cart_event(&CartEvent::Cleared { removed_lines: 2 });
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_wishlist_toasts() {
        let queue = ToastQueue::new();
        queue.on_wishlist_event(&WishlistEvent::Added { id: id(3) });
        queue.on_wishlist_event(&WishlistEvent::Removed { id: id(3) });

        let messages: Vec<_> = queue.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Added to wishlist", "Removed from wishlist"]);
    }
}
