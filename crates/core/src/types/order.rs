//! Order entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};
use super::status::OrderStatus;

/// A customer order.
///
/// `total` is stored (denormalized) rather than derived from the line items.
/// [`Order::total_drift`] exposes any divergence so loaders can log it; the
/// stored value is never silently rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Customer display name.
    pub customer_name: String,
    /// Denormalized order total.
    pub total: Decimal,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Creation date/time.
    pub date: DateTime<Utc>,
    /// Ordered line items with name/price snapshots taken at order time.
    pub items: Vec<OrderItem>,
}

/// A line item within an order.
///
/// Name and price are snapshots: deleting the product later must not change
/// what the customer ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product reference. Historic payloads called this field `id`.
    #[serde(alias = "id")]
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Decimal,
}

impl OrderItem {
    /// Line subtotal (price x quantity).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl Order {
    /// Recompute the total from the line items.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// Difference between the stored total and the item sum.
    ///
    /// Zero for a consistent order; non-zero indicates denormalization drift.
    #[must_use]
    pub fn total_drift(&self) -> Decimal {
        self.total - self.items_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(total: Decimal) -> Order {
        Order {
            id: OrderId::new(1),
            customer_name: "Dana Whitfield".to_string(),
            total,
            status: OrderStatus::Pending,
            date: DateTime::from_timestamp(1_705_314_600, 0).unwrap_or_default(),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(1),
                    name: "Laptop".to_string(),
                    quantity: 1,
                    price: Decimal::new(129_999, 2),
                },
                OrderItem {
                    product_id: ProductId::new(4),
                    name: "Keyboard".to_string(),
                    quantity: 2,
                    price: Decimal::new(12_999, 2),
                },
            ],
        }
    }

    #[test]
    fn test_items_total() {
        let order = order(Decimal::ZERO);
        assert_eq!(order.items_total(), Decimal::new(155_997, 2));
    }

    #[test]
    fn test_total_drift_zero_when_consistent() {
        let order = order(Decimal::new(155_997, 2));
        assert_eq!(order.total_drift(), Decimal::ZERO);
    }

    #[test]
    fn test_total_drift_detects_divergence() {
        let order = order(Decimal::new(150_000, 2));
        assert_eq!(order.total_drift(), Decimal::new(-5_997, 2));
    }

    #[test]
    fn test_legacy_item_id_alias() {
        let json = r#"{
            "id": 3,
            "customerName": "Sam Ortiz",
            "total": "399.99",
            "status": "shipped",
            "date": "2024-01-17T09:15:00Z",
            "items": [
                { "id": 3, "name": "Monitor", "quantity": 1, "price": 399.99 }
            ]
        }"#;
        let order: Order = serde_json::from_str(json).expect("deserialize legacy shape");
        let first = order.items.first().expect("one item");
        assert_eq!(first.product_id, ProductId::new(3));
        assert_eq!(order.total_drift(), Decimal::ZERO);
    }
}
