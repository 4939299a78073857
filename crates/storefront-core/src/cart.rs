//! # Cart Store
//!
//! The single authoritative owner of cart state.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  User Action              Store Operation          Cart State Change    │
//! │  ───────────              ───────────────          ─────────────────    │
//! │                                                                         │
//! │  Add Product ────────────► add_to_cart() ────────► qty += 1 or push     │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ────► items[i].qty = n     │
//! │                            (n <= 0 ──► remove_from_cart)                │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ───► retain(id != x)     │
//! │                                                                         │
//! │  Clear / Checkout ───────► clear_cart() ─────────► items.clear()        │
//! │                                                                         │
//! │  View Cart ──────────────► cart() ───────────────► (read only)          │
//! │                                                                         │
//! │  NOTE: All four operations are total. Unknown ids are no-ops.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The store is owned by the session at the application root and handed to
//! views as `&CartStore` / `&mut CartStore`. There is exactly one writer, so
//! no lock wraps it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::money::Money;
use crate::types::{CatalogProduct, LineItem, ProductId};

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: line items in first-add order.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is >= 1
/// - Order reflects first-add time and never changes on update
///
/// Only [`CartStore`] can change a `Cart`; everyone else gets `&Cart`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,

    /// When the cart was created/last cleared.
    created_at: DateTime<Utc>,
}

impl Cart {
    fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up the line item for a product.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of unit price × quantity over every line.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart totals summary, used for logging and status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Owner of the cart and the only way to mutate it.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    cart: Cart,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        CartStore { cart: Cart::new() }
    }

    /// Read access to the current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by 1
    /// - Product not in cart: appended with quantity 1
    pub fn add_to_cart(&mut self, product: &CatalogProduct) {
        if let Some(item) = self.cart.items.iter_mut().find(|i| i.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }

        self.cart.items.push(LineItem::from_product(product));
    }

    /// Sets the quantity of a line item.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`CartStore::remove_from_cart`]
    /// - Unknown id: no-op
    /// - Otherwise only that item's quantity changes; order is kept
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        if let Some(item) = self.cart.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
    }

    /// Removes a line item if present, keeping the order of the rest.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.items.retain(|i| i.id != id);
    }

    /// Empties the cart unconditionally.
    pub fn clear_cart(&mut self) {
        self.cart.items.clear();
        self.cart.created_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
