//! End-to-end flows across the catalog, cart, and derived views.

use std::sync::Arc;

use rust_decimal::Decimal;

use tamarind_core::ProductId;
use tamarind_store::{
    CartError, CartStore, CatalogStore, DashboardStats, StockStatus, seed, stock_status,
};

fn stores() -> (Arc<CatalogStore>, Arc<CartStore>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let catalog = CatalogStore::with_state(seed::sample_state());
    let cart = CartStore::new(Arc::clone(&catalog));
    (catalog, cart)
}

#[test]
fn cart_respects_stock_through_checkout() {
    let (catalog, cart) = stores();
    // Seeded headphones: stock 3 at 299.99.
    let id = ProductId::new(5);

    for _ in 0..3 {
        cart.add_to_cart(id).expect("stock allows three units");
    }
    let rejected = cart.add_to_cart(id);
    assert!(matches!(
        rejected,
        Err(CartError::InsufficientStock {
            requested: 4,
            available: 3,
            ..
        })
    ));
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), Decimal::new(89_997, 2));

    let receipt = cart.checkout().expect("validated lines commit");
    assert_eq!(receipt.total, Decimal::new(89_997, 2));
    assert_eq!(receipt.lines.len(), 1);

    // Stock fully consumed, cart emptied, further adds rejected.
    let product = catalog.product(id).expect("product survives checkout");
    assert_eq!(product.stock, 0);
    assert!(cart.lines().is_empty());
    assert!(matches!(
        cart.add_to_cart(id),
        Err(CartError::OutOfStock { .. })
    ));
}

#[test]
fn failed_checkout_leaves_every_store_untouched() {
    let (catalog, cart) = stores();
    cart.add_to_cart(ProductId::new(4)).expect("keyboard");
    cart.add_to_cart(ProductId::new(5)).expect("headphones");

    // Headphones sell out between add and checkout.
    catalog.update_product_stock(ProductId::new(5), 3);

    let rejected = cart.checkout();
    assert!(matches!(
        rejected,
        Err(CartError::InsufficientStock { product_id, .. })
            if product_id == ProductId::new(5)
    ));

    // No partial deduction anywhere, cart preserved for correction.
    assert_eq!(catalog.product(ProductId::new(4)).expect("p4").stock, 45);
    assert_eq!(cart.lines().len(), 2);
}

#[test]
fn checkout_moves_dashboard_stock_classification() {
    let (catalog, cart) = stores();
    let before = DashboardStats::compute(&catalog.state());
    // Seeded catalog: phone (8) and headphones (3) sit at or under the
    // threshold of 10; nothing is out of stock yet.
    assert_eq!(before.low_stock_products, 2);
    assert_eq!(before.out_of_stock_products, 0);

    let id = ProductId::new(5);
    for _ in 0..3 {
        cart.add_to_cart(id).expect("add");
    }
    cart.checkout().expect("commit");

    let after_state = catalog.state();
    let after = DashboardStats::compute(&after_state);
    assert_eq!(after.low_stock_products, 1);
    assert_eq!(after.out_of_stock_products, 1);

    let sold_out = after_state
        .products
        .iter()
        .find(|p| p.id == id)
        .expect("p5");
    assert_eq!(stock_status(sold_out), StockStatus::OutOfStock);
}

#[test]
fn cart_totals_follow_live_catalog_prices() {
    let (catalog, cart) = stores();
    let id = ProductId::new(4);
    cart.add_to_cart(id).expect("add");
    cart.update_quantity(id, 2).expect("within stock");
    assert_eq!(cart.total(), Decimal::new(25_998, 2));

    // Admin reprices the product; the cart total follows the live catalog.
    let mut product = catalog.product(id).expect("p4");
    product.price = Decimal::new(9_999, 2);
    catalog.update_product(product);
    assert_eq!(cart.total(), Decimal::new(19_998, 2));
}
