//! Durability of the catalog across process restarts.

use std::sync::Arc;

use rust_decimal::Decimal;

use tamarind_core::{NewProduct, OrderId, OrderStatus, ProductId};
use tamarind_store::{CatalogStore, JsonFileBackend, MemoryBackend, StorageBackend, StoreConfig};

fn config_for(dir: &std::path::Path) -> StoreConfig {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    StoreConfig {
        data_dir: dir.to_path_buf(),
        ..StoreConfig::default()
    }
}

fn new_product(sku: &str) -> NewProduct {
    NewProduct {
        name: "USB Hub".to_string(),
        description: "7-port powered hub".to_string(),
        price: Decimal::new(4_499, 2),
        stock: 30,
        sku: sku.to_string(),
        category: "Accessories".to_string(),
        image_url: None,
        min_stock_level: None,
    }
}

#[test]
fn mutations_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(dir.path());

    {
        let store = CatalogStore::open(&config, Arc::new(JsonFileBackend::new(dir.path())));
        let created = store.add_product(new_product("HUB-001"));
        assert_eq!(created.id, ProductId::new(6));
        store.update_product_stock(ProductId::new(1), 5);
        store.update_order_status(OrderId::new(4), OrderStatus::Shipped);
    }

    // Fresh store, same directory: the projection restores.
    let reopened = CatalogStore::open(&config, Arc::new(JsonFileBackend::new(dir.path())));
    let state = reopened.state();
    assert_eq!(state.products.len(), 6);
    assert_eq!(reopened.product(ProductId::new(1)).expect("p1").stock, 10);
    let order = state.orders.iter().find(|o| o.id == OrderId::new(4));
    assert_eq!(order.map(|o| o.status), Some(OrderStatus::Shipped));

    // Id allocation continues past the restored maximum.
    let next = reopened.add_product(new_product("HUB-002"));
    assert_eq!(next.id, ProductId::new(7));
}

#[test]
fn malformed_document_falls_back_to_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(dir.path());
    let path = dir.path().join(format!("{}.json", config.storage_key));
    std::fs::write(&path, "{ not json").expect("write garbage");

    let store = CatalogStore::open(&config, Arc::new(JsonFileBackend::new(dir.path())));
    assert_eq!(store.state().products.len(), 5);

    // The next commit overwrites the broken document with a valid one.
    store.add_product(new_product("HUB-003"));
    let raw = std::fs::read_to_string(&path).expect("rewritten");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(
        parsed
            .get("products")
            .and_then(|p| p.as_array())
            .map(Vec::len),
        Some(6)
    );
}

#[test]
fn legacy_field_names_restore() {
    // A document written by an older build used stockQuantity/categoryId.
    let config = StoreConfig::default();
    let backend = MemoryBackend::with_entry(
        &config.storage_key,
        r#"{
            "products": [{
                "id": 1,
                "name": "Legacy Widget",
                "description": "carried over",
                "price": "19.50",
                "stockQuantity": 4,
                "sku": "LEG-001",
                "categoryId": "Widgets"
            }],
            "orders": []
        }"#,
    );

    let store = CatalogStore::open(&config, Arc::new(backend));
    let state = store.state();
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.orders.len(), 0);
    let widget = store.product(ProductId::new(1)).expect("restored");
    assert_eq!(widget.stock, 4);
    assert_eq!(widget.category, "Widgets");
}

#[test]
fn failing_backend_never_blocks_mutations() {
    let config = StoreConfig::default();
    let store = CatalogStore::open(&config, Arc::new(MemoryBackend::failing()));

    // Saves fail and are logged; in-memory state still advances.
    let created = store.add_product(new_product("HUB-004"));
    assert_eq!(created.id, ProductId::new(6));
    assert_eq!(store.state().products.len(), 6);
}

#[test]
fn session_user_is_not_persisted() {
    let config = StoreConfig::default();
    let backend = Arc::new(MemoryBackend::new());
    let store = CatalogStore::open(&config, Arc::clone(&backend) as Arc<dyn StorageBackend>);
    store.set_user(tamarind_store::seed::sample_user());

    let raw = backend.raw(&config.storage_key).expect("projection written");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert!(parsed.get("user").is_none());
    assert_eq!(
        parsed
            .get("products")
            .and_then(|p| p.as_array())
            .map(Vec::len),
        Some(5)
    );
}
