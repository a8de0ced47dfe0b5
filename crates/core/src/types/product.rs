//! Product payloads handed to the cart and supplied by the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, RawProductId};

/// The product data captured when a shopper adds something to the cart.
///
/// The ID is kept raw; the cart canonicalizes it on entry and rejects the
/// whole add if it is missing or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: RawProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
}

impl CartProduct {
    /// Create a product payload.
    #[must_use]
    pub fn new(
        id: impl Into<RawProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// A product record from the external catalog.
///
/// The wishlist only stores IDs; catalog products are how those IDs become
/// something displayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&CatalogProduct> for CartProduct {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            id: RawProductId::from(&product.id),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_product_numeric_id() {
        let json = r#"{"id": 3, "name": "Lamp", "price": 45.99, "image": "/lamp.jpg"}"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "3");
        assert_eq!(product.price, Decimal::new(4599, 2));
        assert_eq!(product.category, None);
    }

    #[test]
    fn test_cart_product_from_catalog() {
        let catalog = CatalogProduct {
            id: ProductId::canonicalize(9).unwrap(),
            name: "Desk".to_string(),
            price: Decimal::new(120, 0),
            image: "/desk.jpg".to_string(),
            category: Some("home".to_string()),
        };
        let product = CartProduct::from(&catalog);
        assert_eq!(product.id, RawProductId::Text("9".to_string()));
        assert_eq!(product.name, "Desk");
    }
}
