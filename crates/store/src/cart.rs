//! Cart subsystem: the shopper's pending selection, bounds-checked against
//! live catalog stock.
//!
//! The cart holds only product ids and quantities. Prices and names are
//! looked up against the live catalog at compute time so a price edit is
//! reflected immediately; the one place stock matters, the cart reads a
//! fresh value rather than trusting anything cached.
//!
//! Rejections are ordinary `Err` values, never panics: a declined add or
//! checkout leaves every piece of state exactly as it was.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use tamarind_core::ProductId;

use crate::catalog::CatalogStore;
use crate::engine::{StateEngine, Subscription};

/// A pending purchase line: product reference plus requested quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested quantity. Always >= 1; a zero quantity removes the line.
    pub quantity: u32,
}

/// Cart snapshot held by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Pending lines, in insertion order.
    pub lines: Vec<CartLine>,
}

/// A declined cart operation, surfaced to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The referenced product does not exist in the live catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The product has no stock at all.
    #[error("\"{name}\" is out of stock")]
    OutOfStock {
        /// Referenced product.
        product_id: ProductId,
        /// Product name for display.
        name: String,
    },

    /// The requested quantity exceeds live stock.
    #[error("insufficient stock for \"{name}\": requested {requested}, available {available}")]
    InsufficientStock {
        /// Referenced product.
        product_id: ProductId,
        /// Product name for display.
        name: String,
        /// Quantity the operation would have resulted in.
        requested: u32,
        /// Live stock at the time of the check.
        available: u32,
    },

    /// Checkout was invoked on an empty cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// One settled line of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Purchased product.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Purchased quantity.
    pub quantity: u32,
    /// Unit price at checkout time.
    pub unit_price: Decimal,
}

impl ReceiptLine {
    /// Line subtotal (unit price x quantity).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Settled lines with price snapshots.
    pub lines: Vec<ReceiptLine>,
    /// Sum of line subtotals.
    pub total: Decimal,
}

/// The cart store. Logically separate from the catalog; holds a handle to
/// it for live stock and price reads.
pub struct CartStore {
    engine: Arc<StateEngine<CartState>>,
    catalog: Arc<CatalogStore>,
}

impl CartStore {
    /// Create an empty cart bound to `catalog`. The cart is ephemeral and
    /// never persisted.
    #[must_use]
    pub fn new(catalog: Arc<CatalogStore>) -> Arc<Self> {
        Arc::new(Self {
            engine: StateEngine::new(CartState::default(), None),
            catalog,
        })
    }

    /// Clone of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.engine.with_state(|s| s.lines.clone())
    }

    /// Register a listener invoked with each new cart snapshot.
    pub fn subscribe(
        &self,
        listener: impl Fn(&CartState) + Send + Sync + 'static,
    ) -> Subscription<CartState> {
        self.engine.subscribe(listener)
    }

    /// Add one unit of `product_id` to the cart.
    ///
    /// Incrementing an existing line is bounded by the product's live stock;
    /// a first add requires stock > 0.
    ///
    /// # Errors
    ///
    /// [`CartError::ProductNotFound`], [`CartError::OutOfStock`], or
    /// [`CartError::InsufficientStock`]. State is unchanged on error.
    pub fn add_to_cart(&self, product_id: ProductId) -> Result<(), CartError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;
        self.engine.try_set_state(|state| {
            let mut next = state.clone();
            if let Some(line) = next.lines.iter_mut().find(|l| l.product_id == product_id) {
                let requested = line.quantity + 1;
                if requested > product.stock {
                    return Err(CartError::InsufficientStock {
                        product_id,
                        name: product.name.clone(),
                        requested,
                        available: product.stock,
                    });
                }
                line.quantity = requested;
            } else {
                if product.stock == 0 {
                    return Err(CartError::OutOfStock {
                        product_id,
                        name: product.name.clone(),
                    });
                }
                next.lines.push(CartLine {
                    product_id,
                    quantity: 1,
                });
            }
            Ok((next, ()))
        })
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Otherwise the new quantity is
    /// checked against a fresh read of the product's stock. A missing line
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// [`CartError::ProductNotFound`] or [`CartError::InsufficientStock`].
    /// State is unchanged on error.
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_from_cart(product_id);
            return Ok(());
        }
        let product = self
            .catalog
            .product(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;
        if quantity > product.stock {
            return Err(CartError::InsufficientStock {
                product_id,
                name: product.name,
                requested: quantity,
                available: product.stock,
            });
        }
        self.engine.set_state(|state| {
            let mut next = state.clone();
            match next.lines.iter_mut().find(|l| l.product_id == product_id) {
                Some(line) => line.quantity = quantity,
                None => debug!(product = %product_id, "update_quantity line missing, no-op"),
            }
            next
        });
        Ok(())
    }

    /// Remove the line for `product_id` unconditionally.
    pub fn remove_from_cart(&self, product_id: ProductId) {
        self.engine.set_state(|state| {
            let mut next = state.clone();
            next.lines.retain(|l| l.product_id != product_id);
            next
        });
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.engine.set_state(|_| CartState::default());
    }

    /// Sum over lines of live price x quantity.
    ///
    /// A line whose product has been deleted from the catalog contributes
    /// zero; it is defensively skipped rather than treated as an error.
    #[must_use]
    pub fn total(&self) -> Decimal {
        let catalog = self.catalog.state();
        self.engine.with_state(|state| {
            state
                .lines
                .iter()
                .filter_map(|line| {
                    catalog
                        .products
                        .iter()
                        .find(|p| p.id == line.product_id)
                        .map(|p| p.price * Decimal::from(line.quantity))
                })
                .sum()
        })
    }

    /// Total number of units across all lines (cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.engine
            .with_state(|state| state.lines.iter().map(|l| l.quantity).sum())
    }

    /// Two-phase checkout: validate every line against live stock, then
    /// commit the deductions and clear the cart.
    ///
    /// Phase 1 walks all lines first so a single under-stocked item aborts
    /// the whole checkout with no stock deducted anywhere. Phase 2 only runs
    /// once every line has passed.
    ///
    /// # Errors
    ///
    /// [`CartError::EmptyCart`], [`CartError::ProductNotFound`], or
    /// [`CartError::InsufficientStock`] naming the failing line. Neither the
    /// catalog nor the cart is mutated on error.
    pub fn checkout(&self) -> Result<CheckoutReceipt, CartError> {
        let lines = self.lines();
        if lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        // Phase 1: validate against one consistent catalog snapshot.
        let catalog = self.catalog.state();
        let mut receipt_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = catalog
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(CartError::ProductNotFound(line.product_id))?;
            if product.stock < line.quantity {
                return Err(CartError::InsufficientStock {
                    product_id: line.product_id,
                    name: product.name.clone(),
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            receipt_lines.push(ReceiptLine {
                product_id: line.product_id,
                name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        // Phase 2: commit. Every line validated, so no deduction can floor.
        for line in &lines {
            self.catalog.update_product_stock(line.product_id, line.quantity);
        }
        self.clear();

        let total = receipt_lines.iter().map(ReceiptLine::subtotal).sum();
        info!(lines = receipt_lines.len(), %total, "Checkout committed");
        Ok(CheckoutReceipt {
            lines: receipt_lines,
            total,
        })
    }
}
