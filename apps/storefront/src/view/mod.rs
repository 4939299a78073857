//! # Views
//!
//! Terminal renderings of the product list and the cart, plus the surface
//! that shows the checkout confirmation.
//!
//! - [`cart`] - Cart view: lines, total, quantity/remove controls, checkout
//! - [`products`] - Product list: loading, error, or catalog table
//! - [`confirm`] - Acknowledge-only message surface

pub mod cart;
pub mod confirm;
pub mod products;

pub use cart::{CartView, OrderConfirmation};
pub use confirm::ConfirmationSurface;
pub use products::ProductList;
