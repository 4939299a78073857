//! # Product List
//!
//! Renders the product source's current state: loading, failed, or the
//! catalog table. When a refetch fails after an earlier success, the last
//! good catalog is still listed under the error line.

use std::io::{self, Write};

use storefront_catalog::{Products, QueryResult};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::state::DisplayConfig;

pub struct ProductList<'a> {
    state: &'a QueryResult<Products>,
    display: &'a DisplayConfig,
}

impl<'a> ProductList<'a> {
    pub fn new(state: &'a QueryResult<Products>, display: &'a DisplayConfig) -> Self {
        ProductList { state, display }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Products")?;

        if let Some(error) = &self.state.error {
            writeln!(out, "Failed to load products: {error}")?;
        }

        match &self.state.data {
            None if self.state.is_pending() => writeln!(out, "Loading products...")?,
            None => {}
            Some(products) if products.is_empty() => writeln!(out, "No products available.")?,
            Some(products) => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Title", "Price"]);
                for product in products {
                    builder.push_record([
                        product.id.to_string(),
                        product.title.clone(),
                        self.display.format_money(product.price),
                    ]);
                }

                let mut table = builder.build();
                table.with(Style::modern_rounded());
                table.modify(Columns::new(2..3), Alignment::right());

                writeln!(out, "{table}")?;
                writeln!(out, "Type 'add <id>' to add a product to your cart.")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{CatalogError, QueryStatus};
    use storefront_core::{CatalogProduct, Money, ProductId};

    fn render(state: &QueryResult<Products>) -> String {
        let display = DisplayConfig::default();
        let mut out = Vec::new();
        ProductList::new(state, &display).render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pending_shows_loading() {
        let text = render(&QueryResult::pending());
        assert!(text.contains("Loading products..."));
    }

    #[test]
    fn test_error_without_data() {
        let state = QueryResult {
            status: QueryStatus::Error,
            data: None,
            error: Some(CatalogError::HttpStatus { status: 503 }),
        };
        let text = render(&state);

        assert!(text.contains("Failed to load products"));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn test_success_lists_products() {
        let state = QueryResult {
            status: QueryStatus::Success,
            data: Some(vec![CatalogProduct::new(
                ProductId(3),
                "Mens Cotton Jacket",
                Money::from_cents(5599),
            )]),
            error: None,
        };
        let text = render(&state);

        assert!(text.contains("Mens Cotton Jacket"));
        assert!(text.contains("$55.99"));
        assert!(text.contains("add <id>"));
    }

    #[test]
    fn test_error_keeps_last_catalog() {
        let state = QueryResult {
            status: QueryStatus::Error,
            data: Some(vec![CatalogProduct::new(
                ProductId(1),
                "Backpack",
                Money::from_cents(10995),
            )]),
            error: Some(CatalogError::Timeout("30s".into())),
        };
        let text = render(&state);

        assert!(text.contains("Failed to load products"));
        assert!(text.contains("Backpack"));
    }
}
