//! Core types for Tamarind.
//!
//! This module provides the canonical domain entities and type-safe ID
//! wrappers shared across the workspace.

pub mod id;
pub mod order;
pub mod product;
pub mod status;
pub mod user;

pub use id::*;
pub use order::{Order, OrderItem};
pub use product::{DEFAULT_MIN_STOCK_LEVEL, NewProduct, Product};
pub use status::{OrderStatus, UserRole};
pub use user::User;
