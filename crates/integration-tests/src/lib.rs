//! Integration tests for Nexis.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nexis-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart snapshots on disk across restarts
//! - `wishlist_persistence` - Wishlist snapshots and catalog resolution
//! - `multi_instance` - Several states over one profile, memory-only fallback
//!
//! Each test gets its own [`TestProfile`], backed by a `tempfile` scratch
//! directory that is removed when the profile is dropped.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use nexis_core::CartProduct;
use nexis_storefront::StorefrontState;
use nexis_storefront::checkout::{DEFAULT_COUNTRY, ShippingDetails};
use nexis_storefront::config::StorefrontConfig;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// A scratch profile directory.
///
/// The profile itself is a not yet created subdirectory of a [`TempDir`], so
/// tests can observe whether the storefront creates it.
#[derive(Debug)]
pub struct TestProfile {
    scratch: TempDir,
    dir: PathBuf,
}

impl TestProfile {
    /// Reserve a fresh profile directory.
    ///
    /// # Panics
    ///
    /// Panics if no temporary directory can be created.
    #[must_use]
    pub fn new() -> Self {
        let scratch = tempfile::tempdir().expect("create scratch dir");
        let dir = scratch.path().join("profile");
        Self { scratch, dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The directory holding the profile, for fixtures placed beside it.
    #[must_use]
    pub fn scratch(&self) -> &Path {
        self.scratch.path()
    }

    /// Configuration pointing at this profile.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            storage_dir: Some(self.dir.clone()),
            ..StorefrontConfig::default()
        }
    }

    /// A new, unhydrated state over this profile, as a fresh session would see it.
    #[must_use]
    pub fn session(&self) -> StorefrontState {
        StorefrontState::from_config(&self.config())
    }

    /// Path of the snapshot file for `key`.
    #[must_use]
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Parsed contents of the snapshot file for `key`, if present.
    #[must_use]
    pub fn read_snapshot(&self, key: &str) -> Option<serde_json::Value> {
        let raw = std::fs::read_to_string(self.snapshot_path(key)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Write a raw snapshot file, as an older build or another tab might have.
    ///
    /// # Panics
    ///
    /// Panics if the profile directory cannot be written.
    pub fn write_snapshot(&self, key: &str, contents: &str) {
        std::fs::create_dir_all(&self.dir).expect("create profile dir");
        std::fs::write(self.snapshot_path(key), contents).expect("write snapshot");
    }
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// The coffee mug used throughout the cart tests ($12.50).
#[must_use]
pub fn mug() -> CartProduct {
    CartProduct::new(7, "Mug", Decimal::new(125, 1), "/img/mug.jpg")
}

/// A desk lamp ($40.00), identified by a string ID.
#[must_use]
pub fn lamp() -> CartProduct {
    CartProduct::new("lamp-2", "Desk Lamp", Decimal::new(4000, 2), "/img/lamp.jpg")
}

/// Complete shipping details.
#[must_use]
pub fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        address: "12 Analytical Way".to_string(),
        city: "London".to_string(),
        state: "LDN".to_string(),
        zip_code: "N1".to_string(),
        country: DEFAULT_COUNTRY.to_string(),
    }
}
