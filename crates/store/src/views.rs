//! Derived-view helpers: pure computations over store snapshots.
//!
//! Every aggregate the dashboard, inventory, and storefront views render is
//! computed here from a snapshot - nothing in this module mutates. The
//! stock classification in particular is implemented exactly once and shared
//! by every consumer.

use rust_decimal::Decimal;
use serde::Serialize;

use tamarind_core::{Order, OrderStatus, Product};

use crate::catalog::AppState;

/// Number of orders shown in the dashboard's recent-orders panel.
pub const RECENT_ORDERS_LIMIT: usize = 5;

/// Three-way stock classification shared by all views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock above the low-stock threshold.
    InStock,
    /// Stock at or below the threshold, but not zero.
    LowStock,
    /// No stock at all.
    OutOfStock,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "in stock"),
            Self::LowStock => write!(f, "low stock"),
            Self::OutOfStock => write!(f, "out of stock"),
        }
    }
}

/// Classify a product's stock level.
///
/// Zero is out of stock regardless of threshold; stock at the threshold
/// (the product's own `min_stock_level`, or the default of 10) is low
/// stock; anything above is in stock.
#[must_use]
pub fn stock_status(product: &Product) -> StockStatus {
    if product.stock == 0 {
        StockStatus::OutOfStock
    } else if product.stock <= product.low_stock_threshold() {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Aggregates for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total number of catalog products.
    pub total_products: usize,
    /// Products classified low stock.
    pub low_stock_products: usize,
    /// Products classified out of stock.
    pub out_of_stock_products: usize,
    /// Total inventory value: sum of price x stock over all products.
    pub inventory_value: Decimal,
    /// Total number of orders.
    pub total_orders: usize,
    /// Revenue: sum of totals over delivered orders.
    pub revenue: Decimal,
}

impl DashboardStats {
    /// Compute all dashboard aggregates from one snapshot.
    #[must_use]
    pub fn compute(state: &AppState) -> Self {
        let mut low_stock = 0;
        let mut out_of_stock = 0;
        for product in &state.products {
            match stock_status(product) {
                StockStatus::LowStock => low_stock += 1,
                StockStatus::OutOfStock => out_of_stock += 1,
                StockStatus::InStock => {}
            }
        }
        Self {
            total_products: state.products.len(),
            low_stock_products: low_stock,
            out_of_stock_products: out_of_stock,
            inventory_value: state.products.iter().map(Product::inventory_value).sum(),
            total_orders: state.orders.len(),
            revenue: state
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .map(|o| o.total)
                .sum(),
        }
    }
}

/// Most recent orders, date-descending, capped at
/// [`RECENT_ORDERS_LIMIT`].
#[must_use]
pub fn recent_orders(orders: &[Order]) -> Vec<Order> {
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(RECENT_ORDERS_LIMIT);
    sorted
}

/// Filter criteria for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name, description, and
    /// SKU. Empty or `None` matches everything.
    pub search: Option<String>,
    /// Exact category match. `None` means all categories.
    pub category: Option<String>,
    /// Hide out-of-stock products (storefront listing behavior).
    pub in_stock_only: bool,
}

/// Apply `filter` to a product slice, preserving input order.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    let needle = filter.search.as_deref().map(str::to_lowercase);
    products
        .iter()
        .filter(|p| {
            if filter.in_stock_only && p.stock == 0 {
                return false;
            }
            if let Some(category) = &filter.category {
                if &p.category != category {
                    return false;
                }
            }
            match &needle {
                Some(needle) if !needle.is_empty() => {
                    p.name.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                        || p.sku.to_lowercase().contains(needle)
                }
                _ => true,
            }
        })
        .collect()
}

/// Filter criteria for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive substring matched against the customer name and the
    /// order id.
    pub search: Option<String>,
    /// Exact status match. `None` means all statuses.
    pub status: Option<OrderStatus>,
}

/// Apply `filter` to an order slice, preserving input order.
#[must_use]
pub fn filter_orders<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    let needle = filter.search.as_deref().map(str::to_lowercase);
    orders
        .iter()
        .filter(|o| {
            if let Some(status) = filter.status {
                if o.status != status {
                    return false;
                }
            }
            match &needle {
                Some(needle) if !needle.is_empty() => {
                    o.customer_name.to_lowercase().contains(needle)
                        || o.id.to_string().contains(needle)
                }
                _ => true,
            }
        })
        .collect()
}

/// Sortable order fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortKey {
    /// Creation date/time.
    Date,
    /// Denormalized total.
    Total,
    /// Lifecycle status rank.
    Status,
    /// Customer display name.
    Customer,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Stable sort of orders by `key` in `direction`; ties keep the original
/// collection order.
#[must_use]
pub fn sort_orders(orders: &[Order], key: OrderSortKey, direction: SortDirection) -> Vec<Order> {
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match key {
            OrderSortKey::Date => a.date.cmp(&b.date),
            OrderSortKey::Total => a.total.cmp(&b.total),
            OrderSortKey::Status => a.status.rank().cmp(&b.status.rank()),
            OrderSortKey::Customer => a.customer_name.cmp(&b.customer_name),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// Pagination window over a filtered/sorted sequence.
///
/// The pager never touches the underlying collection; it only computes the
/// current page's slice bounds. Navigation clamps to `[1, total_pages]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pager {
    /// Create a pager starting at page 1. A zero `page_size` is bumped to 1.
    #[must_use]
    pub const fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: if page_size == 0 { 1 } else { page_size },
            total_items,
        }
    }

    /// Current page number, 1-based.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Total number of pages: `ceil(total_items / page_size)`, minimum 1.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        let pages = self.total_items.div_ceil(self.page_size);
        if pages == 0 { 1 } else { pages }
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Advance one page, clamped to the last page.
    pub const fn next(&mut self) {
        if self.has_next() {
            self.current_page += 1;
        }
    }

    /// Go back one page, clamped to page 1.
    pub const fn previous(&mut self) {
        if self.has_previous() {
            self.current_page -= 1;
        }
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn goto(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Re-point the pager at a collection of `total_items`, clamping the
    /// current page if the collection shrank.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// The current page's slice of `items`.
    ///
    /// `items` must be the same sequence the pager was sized for; a shorter
    /// slice yields a truncated (possibly empty) window rather than a panic.
    #[must_use]
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(items.len());
        items.get(start.min(items.len())..end).unwrap_or(&[])
    }
}
