//! Product catalog entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Default low-stock threshold applied when a product does not declare its
/// own [`Product::min_stock_level`].
pub const DEFAULT_MIN_STOCK_LEVEL: u32 = 10;

/// A catalog product.
///
/// This is the one canonical product shape. Historic payloads used
/// `stockQuantity` and `categoryId` for the same data; those are accepted as
/// serde aliases here so no downstream consumer ever needs a fallback
/// expression like `stockQuantity || stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, stable identifier assigned by the catalog store.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Description shown on product cards.
    pub description: String,
    /// Unit price. Non-negative by convention; the store never produces a
    /// negative price.
    pub price: Decimal,
    /// On-hand stock. Unsigned, so non-negativity holds by construction.
    #[serde(alias = "stockQuantity")]
    pub stock: u32,
    /// Stock-keeping code. Uniqueness is not enforced by the store.
    pub sku: String,
    /// Category label.
    #[serde(alias = "categoryId")]
    pub category: String,
    /// Optional image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional per-product low-stock threshold. Falls back to
    /// [`DEFAULT_MIN_STOCK_LEVEL`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<u32>,
}

impl Product {
    /// The low-stock threshold in effect for this product.
    #[must_use]
    pub fn low_stock_threshold(&self) -> u32 {
        self.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL)
    }

    /// Value of the on-hand stock (price x stock).
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock)
    }
}

/// Caller-supplied fields for creating a product.
///
/// The id is assigned by the catalog store at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Description shown on product cards.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Initial on-hand stock.
    #[serde(alias = "stockQuantity")]
    pub stock: u32,
    /// Stock-keeping code.
    pub sku: String,
    /// Category label.
    #[serde(alias = "categoryId")]
    pub category: String,
    /// Optional image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional per-product low-stock threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<u32>,
}

impl NewProduct {
    /// Attach an id, producing the canonical [`Product`].
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            sku: self.sku,
            category: self.category,
            image_url: self.image_url,
            min_stock_level: self.min_stock_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headphones() -> Product {
        Product {
            id: ProductId::new(5),
            name: "Wireless Headphones".to_string(),
            description: "Noise-cancelling over-ear headphones".to_string(),
            price: Decimal::new(29999, 2),
            stock: 3,
            sku: "AUDIO-WH-001".to_string(),
            category: "Audio".to_string(),
            image_url: None,
            min_stock_level: None,
        }
    }

    #[test]
    fn test_legacy_stock_quantity_alias() {
        let json = r#"{
            "id": 9,
            "name": "Legacy Widget",
            "description": "from an older payload",
            "price": 19.5,
            "stockQuantity": 4,
            "sku": "LEG-001",
            "categoryId": "Widgets"
        }"#;
        let product: Product = serde_json::from_str(json).expect("deserialize legacy shape");
        assert_eq!(product.stock, 4);
        assert_eq!(product.category, "Widgets");
        assert_eq!(product.min_stock_level, None);
    }

    #[test]
    fn test_canonical_shape_roundtrip() {
        let product = headphones();
        let json = serde_json::to_string(&product).expect("serialize");
        let back: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, product);
    }

    #[test]
    fn test_low_stock_threshold_default_and_override() {
        let mut product = headphones();
        assert_eq!(product.low_stock_threshold(), DEFAULT_MIN_STOCK_LEVEL);
        product.min_stock_level = Some(25);
        assert_eq!(product.low_stock_threshold(), 25);
    }

    #[test]
    fn test_inventory_value() {
        let product = headphones();
        assert_eq!(product.inventory_value(), Decimal::new(89997, 2));
    }

    #[test]
    fn test_new_product_into_product() {
        let input = NewProduct {
            name: "Desk Lamp".to_string(),
            description: "Adjustable LED lamp".to_string(),
            price: Decimal::new(3499, 2),
            stock: 12,
            sku: "HOME-DL-001".to_string(),
            category: "Home".to_string(),
            image_url: None,
            min_stock_level: Some(5),
        };
        let product = input.into_product(ProductId::new(77));
        assert_eq!(product.id, ProductId::new(77));
        assert_eq!(product.stock, 12);
        assert_eq!(product.min_stock_level, Some(5));
    }
}
