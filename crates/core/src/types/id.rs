//! Canonical product identifiers.
//!
//! Product IDs reach the storefront in two shapes: numbers from catalog and
//! mock data, strings from links and manual entry points. [`ProductId`] is the
//! one canonical form; every store operation converts its input with
//! [`ProductId::canonicalize`] before comparing or storing, so `7` and `"7"`
//! always name the same product.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when canonicalizing a product ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The ID is an empty (or whitespace-only) string.
    #[error("product id cannot be empty")]
    Empty,
    /// The ID is numeric zero, which storefront inputs treat as "no id".
    #[error("product id cannot be zero")]
    Falsy,
}

/// A product ID exactly as a caller or a stored payload supplied it.
///
/// Deserializes from either a JSON number or a JSON string.
///
/// ```
/// use nexis_core::RawProductId;
///
/// let from_number: RawProductId = serde_json::from_str("7").unwrap();
/// let from_text: RawProductId = serde_json::from_str("\"7\"").unwrap();
/// assert_ne!(from_number, from_text);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawProductId {
    /// A numeric ID.
    Number(serde_json::Number),
    /// A textual ID.
    Text(String),
}

macro_rules! raw_id_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawProductId {
                fn from(id: $ty) -> Self {
                    Self::Number(serde_json::Number::from(id))
                }
            }
        )*
    };
}

raw_id_from_int!(i32, i64, u32, u64);

impl From<&str> for RawProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for RawProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<ProductId> for RawProductId {
    fn from(id: ProductId) -> Self {
        Self::Text(id.0)
    }
}

impl From<&ProductId> for RawProductId {
    fn from(id: &ProductId) -> Self {
        Self::Text(id.0.clone())
    }
}

/// A canonical product ID.
///
/// ## Canonical form
///
/// - Strings are trimmed; an empty result is rejected
/// - Integers render in base 10 (`7` becomes `"7"`)
/// - Integral floats drop their fraction (`7.0` becomes `"7"`)
/// - Numeric zero is rejected
///
/// Always serializes as a JSON string, and deserializes from either a number
/// or a string.
///
/// ## Examples
///
/// ```
/// use nexis_core::ProductId;
///
/// let a = ProductId::canonicalize(7).unwrap();
/// let b = ProductId::canonicalize("7").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "7");
///
/// assert!(ProductId::canonicalize("").is_err());
/// assert!(ProductId::canonicalize(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProductId", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Canonicalize any supported ID representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty or numeric zero.
    pub fn canonicalize(raw: impl Into<RawProductId>) -> Result<Self, ProductIdError> {
        match raw.into() {
            RawProductId::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ProductIdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }
            RawProductId::Number(number) => canonical_number(&number).map(Self),
        }
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn canonical_number(number: &serde_json::Number) -> Result<String, ProductIdError> {
    if let Some(unsigned) = number.as_u64() {
        if unsigned == 0 {
            return Err(ProductIdError::Falsy);
        }
        return Ok(unsigned.to_string());
    }
    if let Some(signed) = number.as_i64() {
        if signed == 0 {
            return Err(ProductIdError::Falsy);
        }
        return Ok(signed.to_string());
    }
    match number.as_f64() {
        Some(float) if float.abs() < f64::EPSILON => Err(ProductIdError::Falsy),
        // f64 Display never uses exponent notation and omits a zero fraction
        Some(float) => Ok(format!("{float}")),
        None => Ok(number.to_string()),
    }
}

impl TryFrom<RawProductId> for ProductId {
    type Error = ProductIdError;

    fn try_from(raw: RawProductId) -> Result<Self, Self::Error> {
        Self::canonicalize(raw)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::canonicalize(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
