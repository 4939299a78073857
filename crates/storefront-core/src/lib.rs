//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate holds the cart state machine and everything it needs to
//! stay honest: integer money, catalog types and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/storefront (terminal)                     │   │
//! │  │    Product List ──► Cart View ──► Checkout confirmation         │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼──────────────┐  ┌──────────▼──────────────────┐    │
//! │  │  ★ storefront-core ★         │  │  storefront-catalog         │    │
//! │  │                              │  │                             │    │
//! │  │  money  types  cart          │◄─│  HTTP fetch + query cache   │    │
//! │  │  validation  error           │  │                             │    │
//! │  │                              │  └─────────────────────────────┘    │
//! │  │  NO I/O • PURE FUNCTIONS     │                                      │
//! │  └──────────────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog products and cart line items
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart store and its four operations
//! - [`error`] - Domain error types
//! - [`validation`] - Input coercion and catalog record checks
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{CartStore, CatalogProduct, Money, ProductId};
//!
//! let product = CatalogProduct::new(ProductId(1), "A", Money::from_cents(999));
//!
//! let mut store = CartStore::new();
//! store.add_to_cart(&product);
//! store.add_to_cart(&product);
//!
//! assert_eq!(store.cart().items().len(), 1);
//! assert_eq!(store.cart().total(), Money::from_cents(1998));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartStore, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity given to a line item when none is recorded, and the value a
/// quantity edit falls back to when the input is unusable.
pub const DEFAULT_QUANTITY: i64 = 1;
