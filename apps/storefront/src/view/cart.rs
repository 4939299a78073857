//! # Cart View
//!
//! Shows the cart, its total and the checkout control, and routes edits
//! back into the cart store.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout                                             │
//! │                                                                         │
//! │  checkout ──► cart empty? ──yes──► None (no control rendered)           │
//! │                   │                                                     │
//! │                   no                                                    │
//! │                   ▼                                                     │
//! │  message = "Order Summary: <title (xN), ...>\nTotal: $X\nThank you..."  │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  surface.present(message)   (blocks until acknowledged)                 │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  store.clear_cart() ──► Some(OrderConfirmation)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, Write};

use storefront_core::validation::parse_quantity_input;
use storefront_core::{Cart, CartStore, Money, ProductId};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::state::DisplayConfig;
use crate::view::ConfirmationSurface;

/// What a completed checkout showed the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub summary: String,
    pub total: Money,
    pub message: String,
}

/// The cart view. Borrows the store for as long as it is on screen.
pub struct CartView<'a> {
    store: &'a mut CartStore,
    display: &'a DisplayConfig,
}

impl<'a> CartView<'a> {
    pub fn new(store: &'a mut CartStore, display: &'a DisplayConfig) -> Self {
        CartView { store, display }
    }

    fn cart(&self) -> &Cart {
        self.store.cart()
    }

    /// Sum of unit price × quantity over every line.
    pub fn total(&self) -> Money {
        self.cart().total()
    }

    /// Writes the cart. An empty cart shows only the empty message.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Your Cart")?;

        if self.cart().is_empty() {
            writeln!(out, "Your cart is empty.")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Item", "Price", "Qty"]);
        for item in self.cart().items() {
            builder.push_record([
                item.id.to_string(),
                item.title.clone(),
                self.display.format_money(item.unit_price),
                item.quantity.to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, "Total: {}", self.display.format_money(self.total()))?;
        writeln!(out, "[ Proceed to Checkout ]")?;
        Ok(())
    }

    /// Applies raw quantity input to a line. Unparseable or non-positive
    /// input becomes 1. Returns the quantity that was applied.
    pub fn edit_quantity(&mut self, id: ProductId, raw: &str) -> i64 {
        let quantity = parse_quantity_input(raw);
        self.store.update_quantity(id, quantity);
        quantity
    }

    /// The remove control of a line.
    pub fn remove(&mut self, id: ProductId) {
        self.store.remove_from_cart(id);
    }

    /// `"<title> (x<quantity>)"` for every line, joined by `", "`.
    pub fn order_summary(&self) -> String {
        self.cart()
            .items()
            .iter()
            .map(|item| format!("{} (x{})", item.title, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Presents the order confirmation, then clears the cart.
    ///
    /// Returns `None` without touching anything when the cart is empty,
    /// since no checkout control is shown then.
    pub fn checkout(
        &mut self,
        surface: &mut dyn ConfirmationSurface,
    ) -> Option<OrderConfirmation> {
        if self.cart().is_empty() {
            return None;
        }

        let summary = self.order_summary();
        let total = self.total();
        let message = format!(
            "Order Summary: {}\nTotal: {}\nThank you for your purchase!",
            summary,
            self.display.format_money(total)
        );

        surface.present(&message);
        self.store.clear_cart();

        Some(OrderConfirmation {
            summary,
            total,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::confirm::testing::RecordingSurface;
    use storefront_core::CatalogProduct;

    fn product(id: u64, title: &str, cents: i64) -> CatalogProduct {
        CatalogProduct::new(ProductId(id), title, Money::from_cents(cents))
    }

    fn rendered(view: &CartView<'_>) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_total_over_lines() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        let ten = product(1, "Ten", 1000);
        store.add_to_cart(&ten);
        store.add_to_cart(&ten);
        store.add_to_cart(&product(2, "Five", 500));

        let view = CartView::new(&mut store, &display);
        assert_eq!(view.total(), Money::from_cents(2500));
    }

    #[test]
    fn test_render_line_and_total() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        let widget = product(1, "Widget", 999);
        store.add_to_cart(&widget);
        store.add_to_cart(&widget);

        let view = CartView::new(&mut store, &display);
        let text = rendered(&view);

        assert!(text.contains("Widget"));
        assert!(text.contains("$9.99"));
        assert!(text.contains("Total: $19.98"));
        assert!(text.contains("Proceed to Checkout"));
    }

    #[test]
    fn test_render_empty_cart() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, "Widget", 999));
        store.add_to_cart(&product(2, "Gadget", 500));
        store.clear_cart();

        let view = CartView::new(&mut store, &display);
        let text = rendered(&view);

        assert!(text.contains("Your cart is empty."));
        assert!(!text.contains("Widget"));
        assert!(!text.contains("Gadget"));
        assert!(!text.contains("Total:"));
        assert!(!text.contains("Checkout"));
    }

    #[test]
    fn test_edit_quantity_falls_back_to_one() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, "Widget", 999));

        let mut view = CartView::new(&mut store, &display);
        assert_eq!(view.edit_quantity(ProductId(1), "4"), 4);
        assert_eq!(view.total(), Money::from_cents(3996));

        assert_eq!(view.edit_quantity(ProductId(1), "abc"), 1);
        assert_eq!(view.edit_quantity(ProductId(1), ""), 1);
        assert_eq!(view.edit_quantity(ProductId(1), "0"), 1);

        assert_eq!(store.cart().get(ProductId(1)).map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_remove_control() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, "A", 100));
        store.add_to_cart(&product(2, "B", 200));

        let mut view = CartView::new(&mut store, &display);
        view.remove(ProductId(1));

        assert_eq!(view.order_summary(), "B (x1)");
    }

    #[test]
    fn test_checkout_message_and_clear() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        let widget = product(1, "Widget", 999);
        store.add_to_cart(&widget);
        store.add_to_cart(&widget);
        store.add_to_cart(&product(2, "Gadget", 500));

        let mut surface = RecordingSurface::default();
        let mut view = CartView::new(&mut store, &display);
        let confirmation = view.checkout(&mut surface).unwrap();

        assert_eq!(confirmation.summary, "Widget (x2), Gadget (x1)");
        assert_eq!(confirmation.total, Money::from_cents(2498));
        assert_eq!(
            surface.messages,
            vec![
                "Order Summary: Widget (x2), Gadget (x1)\nTotal: $24.98\nThank you for your purchase!"
                    .to_string()
            ]
        );
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_checkout_empty_cart_presents_nothing() {
        let display = DisplayConfig::default();
        let mut store = CartStore::new();
        let mut surface = RecordingSurface::default();

        let mut view = CartView::new(&mut store, &display);
        assert!(view.checkout(&mut surface).is_none());
        assert!(surface.messages.is_empty());
    }
}
