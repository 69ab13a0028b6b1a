//! Tamarind Core - Shared entity types.
//!
//! This crate provides the canonical domain types used across all Tamarind
//! components:
//! - `store` - The reactive state store (catalog, cart, derived views)
//! - Any embedding UI or service that consumes store snapshots
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP. Entity
//! shapes are canonical here: legacy payload variants (e.g. `stockQuantity`
//! for `stock`) are resolved once at the serde boundary instead of per-view.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, products, orders, statuses, and users

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
