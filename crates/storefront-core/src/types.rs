//! # Domain Types
//!
//! Types shared by the cart, the catalog client and the terminal views.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   from_product()   ┌─────────────────┐            │
//! │  │ CatalogProduct  │ ─────────────────► │    LineItem     │            │
//! │  │  ─────────────  │                    │  ─────────────  │            │
//! │  │  id             │                    │  id             │            │
//! │  │  title          │                    │  title          │            │
//! │  │  price          │                    │  unit_price     │            │
//! │  │  image          │                    │  image          │            │
//! │  │  extra (opaque) │                    │  quantity >= 1  │            │
//! │  └─────────────────┘                    └─────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::DEFAULT_QUANTITY;

// =============================================================================
// Product ID
// =============================================================================

/// Catalog identifier of a product. Unique among catalog products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ProductId)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "product id".to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product record from the remote catalog.
///
/// Only `id`, `title`, `price` and `image` are interpreted. Everything else
/// the endpoint sends (description, category, rating, ...) is kept in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,

    /// Display text.
    pub title: String,

    /// Unit price. Sent as a decimal number, held as cents.
    #[serde(with = "money::decimal")]
    pub price: Money,

    /// Image URL.
    #[serde(default)]
    pub image: String,

    /// Fields this system does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogProduct {
    /// Creates a product with no image and no extra fields.
    pub fn new(id: ProductId, title: impl Into<String>, price: Money) -> Self {
        CatalogProduct {
            id,
            title: title.into(),
            price,
            image: String::new(),
            extra: Map::new(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product placed in the cart.
///
/// `quantity` is always present. Records without one deserialize with
/// quantity 1, so no "missing quantity" state survives past the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ProductId,

    /// Product title at time of adding.
    pub title: String,

    /// Price at time of adding.
    #[serde(rename = "price", with = "money::decimal")]
    pub unit_price: Money,

    #[serde(default)]
    pub image: String,

    /// Always >= 1 while the item is in a cart.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    DEFAULT_QUANTITY
}

impl LineItem {
    /// Creates a line item with quantity 1 from a catalog product.
    pub fn from_product(product: &CatalogProduct) -> Self {
        LineItem {
            id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            quantity: DEFAULT_QUANTITY,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
