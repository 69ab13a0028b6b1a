//! Reactive state stores for an e-commerce application.
//!
//! The crate centers on a small subscription engine ([`engine::StateEngine`])
//! that snapshots state, notifies listeners after every committed update, and
//! optionally persists a projection of the state through a pluggable backend.
//! On top of it sit the domain stores:
//!
//! - [`catalog::CatalogStore`] - products, orders, and the active user, with
//!   persistence across restarts
//! - [`cart::CartStore`] - the shopping cart, with stock-bounded mutations
//!   and an all-or-nothing checkout
//! - [`auth::AuthStore`] - the session, never persisted
//!
//! Derived read models (stock classification, dashboard stats, filtering,
//! sorting, pagination) live in [`views`], and [`debounce`] provides the
//! quiet-period search input used to drive them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod persist;
pub mod seed;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthState, AuthStore};
pub use cart::{CartError, CartLine, CartState, CartStore, CheckoutReceipt, ReceiptLine};
pub use catalog::{AppState, CatalogStore, PersistedState};
pub use config::{ConfigError, StoreConfig};
pub use debounce::{DebouncedSearch, DEFAULT_DEBOUNCE};
pub use engine::{Persistence, StateEngine, Subscription};
pub use persist::{JsonFileBackend, MemoryBackend, PersistError, StorageBackend};
pub use views::{
    filter_orders, filter_products, recent_orders, sort_orders, stock_status, DashboardStats,
    OrderFilter, OrderSortKey, Pager, ProductFilter, SortDirection, StockStatus,
    RECENT_ORDERS_LIMIT,
};
