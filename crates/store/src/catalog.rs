//! Domain store for the product catalog, orders, and session user.
//!
//! `CatalogStore` owns the canonical collections and exposes the mutation
//! operations the admin and storefront surfaces dispatch. Every operation is
//! a total function over the current snapshot: mutating a missing id is a
//! silent no-op rather than an error, so UI retries stay idempotent.
//!
//! The persisted projection covers exactly the product and order
//! collections. The session user and the cart are ephemeral.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tamarind_core::{NewProduct, Order, OrderId, OrderStatus, Product, ProductId, User};

use crate::config::StoreConfig;
use crate::engine::{Persistence, StateEngine, Subscription};
use crate::persist::{StorageBackend, load_projection};
use crate::seed;

/// The full application state held by the catalog store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Product catalog.
    pub products: Vec<Product>,
    /// Order history.
    pub orders: Vec<Order>,
    /// Signed-in user, for session display. Not persisted.
    pub user: Option<User>,
}

/// The durable projection of [`AppState`]: products and orders only.
///
/// Fields default individually so a projection written by an older build
/// (e.g. one without orders) still restores cleanly over the seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Persisted product catalog.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Persisted order history.
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl PersistedState {
    fn project(state: &AppState) -> Self {
        Self {
            products: state.products.clone(),
            orders: state.orders.clone(),
        }
    }

    /// Merge this projection over `seed`, keeping seeded values for anything
    /// the projection does not carry (the session user, future fields).
    fn restore_over(self, mut seed: AppState) -> AppState {
        seed.products = self.products;
        seed.orders = self.orders;
        seed
    }
}

/// The domain store. Construct via [`CatalogStore::open`] for a persisted
/// session or [`CatalogStore::with_state`] for an isolated instance.
pub struct CatalogStore {
    engine: Arc<StateEngine<AppState>>,
    next_product_id: AtomicU64,
}

impl CatalogStore {
    /// Open the store: restore the persisted projection over the seed
    /// defaults, then persist every subsequent commit through `backend`.
    ///
    /// A missing or malformed persisted document falls back to the seed -
    /// this path never fails.
    #[must_use]
    pub fn open(config: &StoreConfig, backend: Arc<dyn StorageBackend>) -> Arc<Self> {
        let seed = seed::sample_state();
        let state = match load_projection::<PersistedState>(backend.as_ref(), &config.storage_key)
        {
            Some(projection) => {
                info!(
                    key = %config.storage_key,
                    products = projection.products.len(),
                    orders = projection.orders.len(),
                    "Restored persisted state"
                );
                projection.restore_over(seed)
            }
            None => {
                info!(key = %config.storage_key, "No persisted state, seeding defaults");
                seed
            }
        };
        warn_on_total_drift(&state.orders);

        let persistence = Persistence::new(
            backend,
            config.storage_key.clone(),
            PersistedState::project,
        );
        Self::build(state, Some(persistence))
    }

    /// Build an isolated, unpersisted store around `state`. Intended for
    /// tests and embedders that manage durability themselves.
    #[must_use]
    pub fn with_state(state: AppState) -> Arc<Self> {
        Self::build(state, None)
    }

    fn build(state: AppState, persistence: Option<Persistence<AppState>>) -> Arc<Self> {
        let next_product_id = state
            .products
            .iter()
            .map(|p| p.id.as_u64())
            .max()
            .unwrap_or(0)
            + 1;
        let engine = StateEngine::new(state, persistence);
        Arc::new(Self {
            engine,
            next_product_id: AtomicU64::new(next_product_id),
        })
    }

    /// Clone of the current snapshot.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.engine.get_state()
    }

    /// Look up a product by id in the current snapshot.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.engine
            .with_state(|s| s.products.iter().find(|p| p.id == id).cloned())
    }

    /// Register a listener invoked with each new snapshot.
    pub fn subscribe(
        &self,
        listener: impl Fn(&AppState) + Send + Sync + 'static,
    ) -> Subscription<AppState> {
        self.engine.subscribe(listener)
    }

    /// Append a product, assigning the next monotonic id.
    ///
    /// SKU uniqueness is deliberately not validated here; callers that care
    /// check before dispatching.
    pub fn add_product(&self, input: NewProduct) -> Product {
        let id = ProductId::new(self.next_product_id.fetch_add(1, Ordering::Relaxed));
        let product = input.into_product(id);
        let created = product.clone();
        info!(product = %id, sku = %created.sku, "Adding product");
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            next.products.push(product);
            next
        });
        created
    }

    /// Replace the product with a matching id. No-op when absent.
    pub fn update_product(&self, updated: Product) {
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            match next.products.iter_mut().find(|p| p.id == updated.id) {
                Some(slot) => *slot = updated,
                None => debug!(product = %updated.id, "update_product target missing, no-op"),
            }
            next
        });
    }

    /// Remove the product with a matching id. No-op when absent.
    ///
    /// Does not cascade: cart lines referencing the product are skipped at
    /// compute time, and order items keep their name/price snapshots.
    pub fn delete_product(&self, id: ProductId) {
        info!(product = %id, "Deleting product");
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            next.products.retain(|p| p.id != id);
            next
        });
    }

    /// Decrease a product's stock by `delta`, floored at zero. No-op when
    /// the id is absent. This is checkout's commit path.
    pub fn update_product_stock(&self, id: ProductId, delta: u32) {
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            match next.products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    product.stock = product.stock.saturating_sub(delta);
                    debug!(product = %id, delta, stock = product.stock, "Deducted stock");
                }
                None => debug!(product = %id, "update_product_stock target missing, no-op"),
            }
            next
        });
    }

    /// Set the status of the matching order. No-op when absent.
    ///
    /// Any of the four statuses may be assigned from any other; no
    /// transition table is enforced.
    pub fn update_order_status(&self, id: OrderId, status: OrderStatus) {
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            match next.orders.iter_mut().find(|o| o.id == id) {
                Some(order) => {
                    debug!(order = %id, from = %order.status, to = %status, "Updating order status");
                    order.status = status;
                }
                None => debug!(order = %id, "update_order_status target missing, no-op"),
            }
            next
        });
    }

    /// Set the session user. Not persisted.
    pub fn set_user(&self, user: User) {
        self.engine.set_state(move |state| {
            let mut next = state.clone();
            next.user = Some(user);
            next
        });
    }

    /// Clear the session user.
    pub fn clear_user(&self) {
        self.engine.set_state(|state| {
            let mut next = state.clone();
            next.user = None;
            next
        });
    }
}

fn warn_on_total_drift(orders: &[Order]) {
    for order in orders {
        let drift = order.total_drift();
        if !drift.is_zero() {
            warn!(order = %order.id, %drift, "Stored order total diverges from item sum");
        }
    }
}
