//! Seed data used when no persisted state exists.
//!
//! The fixed sample catalog and order list give a fresh session something to
//! render; they are replaced wholesale by the persisted projection when one
//! is present and parseable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tamarind_core::{
    NewProduct, Order, OrderId, OrderItem, OrderStatus, Product, ProductId, User, UserId, UserRole,
};

use crate::catalog::AppState;

fn product(id: u64, input: NewProduct) -> Product {
    input.into_product(ProductId::new(id))
}

fn date(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default()
}

/// The fixed sample catalog.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product(
            1,
            NewProduct {
                name: "Dell XPS 13 Laptop".to_string(),
                description: "Ultralight laptop with an Intel i7 and 16GB RAM".to_string(),
                price: Decimal::new(129_999, 2),
                stock: 15,
                sku: "DELL-XPS13-001".to_string(),
                category: "Laptops".to_string(),
                image_url: Some("https://images.example.com/xps13.jpg".to_string()),
                min_stock_level: None,
            },
        ),
        product(
            2,
            NewProduct {
                name: "iPhone 14 Pro".to_string(),
                description: "Apple smartphone with an advanced camera and A16 chip".to_string(),
                price: Decimal::new(99_999, 2),
                stock: 8,
                sku: "APPLE-IP14P-001".to_string(),
                category: "Smartphones".to_string(),
                image_url: Some("https://images.example.com/iphone14pro.jpg".to_string()),
                min_stock_level: None,
            },
        ),
        product(
            3,
            NewProduct {
                name: "Samsung 27\" Monitor".to_string(),
                description: "4K UHD monitor with an IPS panel at 144Hz".to_string(),
                price: Decimal::new(39_999, 2),
                stock: 22,
                sku: "SAM-MON27-001".to_string(),
                category: "Monitors".to_string(),
                image_url: Some("https://images.example.com/monitor27.jpg".to_string()),
                min_stock_level: None,
            },
        ),
        product(
            4,
            NewProduct {
                name: "Mechanical RGB Keyboard".to_string(),
                description: "Gaming keyboard with Cherry MX Blue switches".to_string(),
                price: Decimal::new(12_999, 2),
                stock: 45,
                sku: "MECH-KB-RGB-001".to_string(),
                category: "Accessories".to_string(),
                image_url: Some("https://images.example.com/keyboard-rgb.jpg".to_string()),
                min_stock_level: None,
            },
        ),
        product(
            5,
            NewProduct {
                name: "Sony WH-1000XM4 Headphones".to_string(),
                description: "Wireless headphones with noise cancellation".to_string(),
                price: Decimal::new(29_999, 2),
                stock: 3,
                sku: "SONY-WH1000-001".to_string(),
                category: "Audio".to_string(),
                image_url: Some("https://images.example.com/wh1000xm4.jpg".to_string()),
                min_stock_level: None,
            },
        ),
    ]
}

/// The fixed sample order list.
#[must_use]
pub fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::new(1),
            customer_name: "Joan Peterson".to_string(),
            total: Decimal::new(142_998, 2),
            status: OrderStatus::Delivered,
            // 2024-01-15T10:30:00Z
            date: date(1_705_314_600),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(1),
                    name: "Dell XPS 13 Laptop".to_string(),
                    quantity: 1,
                    price: Decimal::new(129_999, 2),
                },
                OrderItem {
                    product_id: ProductId::new(4),
                    name: "Mechanical RGB Keyboard".to_string(),
                    quantity: 1,
                    price: Decimal::new(12_999, 2),
                },
            ],
        },
        Order {
            id: OrderId::new(2),
            customer_name: "Maria Garner".to_string(),
            total: Decimal::new(99_999, 2),
            status: OrderStatus::Processing,
            // 2024-01-16T14:20:00Z
            date: date(1_705_414_800),
            items: vec![OrderItem {
                product_id: ProductId::new(2),
                name: "iPhone 14 Pro".to_string(),
                quantity: 1,
                price: Decimal::new(99_999, 2),
            }],
        },
        Order {
            id: OrderId::new(3),
            customer_name: "Carl Lowell".to_string(),
            total: Decimal::new(69_998, 2),
            status: OrderStatus::Shipped,
            // 2024-01-17T09:15:00Z
            date: date(1_705_482_900),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(3),
                    name: "Samsung 27\" Monitor".to_string(),
                    quantity: 1,
                    price: Decimal::new(39_999, 2),
                },
                OrderItem {
                    product_id: ProductId::new(5),
                    name: "Sony WH-1000XM4 Headphones".to_string(),
                    quantity: 1,
                    price: Decimal::new(29_999, 2),
                },
            ],
        },
        Order {
            id: OrderId::new(4),
            customer_name: "Anna Martel".to_string(),
            total: Decimal::new(12_999, 2),
            status: OrderStatus::Pending,
            // 2024-01-18T16:45:00Z
            date: date(1_705_596_300),
            items: vec![OrderItem {
                product_id: ProductId::new(4),
                name: "Mechanical RGB Keyboard".to_string(),
                quantity: 1,
                price: Decimal::new(12_999, 2),
            }],
        },
    ]
}

/// The sample admin session user.
#[must_use]
pub fn sample_user() -> User {
    User {
        id: UserId::new(1),
        name: "Administrator".to_string(),
        email: "admin@tamarind.example".to_string(),
        role: UserRole::Admin,
    }
}

/// Full seed state: sample catalog, sample orders, sample admin session.
#[must_use]
pub fn sample_state() -> AppState {
    AppState {
        products: sample_products(),
        orders: sample_orders(),
        user: Some(sample_user()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_order_totals_are_consistent() {
        for order in sample_orders() {
            assert_eq!(
                order.total_drift(),
                Decimal::ZERO,
                "seed order {} drifts",
                order.id
            );
        }
    }

    #[test]
    fn test_sample_product_ids_are_unique() {
        let products = sample_products();
        let mut ids: Vec<_> = products.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }
}
