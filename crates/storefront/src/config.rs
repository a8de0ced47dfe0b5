//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `NEXIS_STORAGE_DIR` - Profile directory for persisted state (default: `.nexis`,
//!   `none` to keep state in memory only)
//! - `NEXIS_CART_KEY` - Storage key for the cart (default: `nexis_cart`)
//! - `NEXIS_WISHLIST_KEY` - Storage key for the wishlist (default: `nexis_wishlist`)
//! - `NEXIS_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.08)
//! - `NEXIS_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 50.00)
//! - `NEXIS_STANDARD_SHIPPING` - Shipping below the threshold (default: 0.00)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::PricingConfig;

const DEFAULT_STORAGE_DIR: &str = ".nexis";
const MEMORY_ONLY: &str = "none";

/// Default storage key for the cart.
pub const DEFAULT_CART_KEY: &str = "nexis_cart";
/// Default storage key for the wishlist.
pub const DEFAULT_WISHLIST_KEY: &str = "nexis_wishlist";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid storage key in {0}: {1}")]
    InvalidKey(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding persisted snapshots; `None` runs memory-only
    pub storage_dir: Option<PathBuf>,
    /// Storage key for the cart snapshot
    pub cart_key: String,
    /// Storage key for the wishlist snapshot
    pub wishlist_key: String,
    /// Tax and shipping rules
    pub pricing: PricingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: Some(PathBuf::from(DEFAULT_STORAGE_DIR)),
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            pricing: PricingConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = match lookup("NEXIS_STORAGE_DIR") {
            Some(dir) if dir.trim().eq_ignore_ascii_case(MEMORY_ONLY) => None,
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "NEXIS_STORAGE_DIR".to_string(),
                    "cannot be empty".to_string(),
                ));
            }
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(PathBuf::from(DEFAULT_STORAGE_DIR)),
        };

        let cart_key = get_key(&lookup, "NEXIS_CART_KEY", DEFAULT_CART_KEY)?;
        let wishlist_key = get_key(&lookup, "NEXIS_WISHLIST_KEY", DEFAULT_WISHLIST_KEY)?;
        if cart_key == wishlist_key {
            return Err(ConfigError::InvalidKey(
                "NEXIS_WISHLIST_KEY".to_string(),
                "must differ from NEXIS_CART_KEY".to_string(),
            ));
        }

        let defaults = PricingConfig::default();
        let tax_rate = get_decimal(&lookup, "NEXIS_TAX_RATE", defaults.tax_rate)?;
        if tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "NEXIS_TAX_RATE".to_string(),
                "must be between 0 and 1".to_string(),
            ));
        }
        let pricing = PricingConfig {
            tax_rate,
            free_shipping_threshold: get_decimal(
                &lookup,
                "NEXIS_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            standard_shipping: get_decimal(
                &lookup,
                "NEXIS_STANDARD_SHIPPING",
                defaults.standard_shipping,
            )?,
        };

        Ok(Self {
            storage_dir,
            cart_key,
            wishlist_key,
            pricing,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a storage key, validating that it is usable as a file name.
fn get_key(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let key = lookup(var).unwrap_or_else(|| default.to_string());
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(ConfigError::InvalidKey(
            var.to_string(),
            format!("{key:?} may only contain letters, digits, '_', '-' and '.'"),
        ));
    }
    Ok(key)
}

/// Get a non-negative decimal with a default value.
fn get_decimal(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let value = Decimal::from_str(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))?;
    if value.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(value)
}
