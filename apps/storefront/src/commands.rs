//! # Commands
//!
//! The terminal's command vocabulary and its parser.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products              list the catalog (fetches if stale)              │
//! │  refresh               refetch the catalog                              │
//! │  add <id>              add one unit of a product                        │
//! │  qty <id> <quantity>   set a line's quantity (bad input becomes 1)      │
//! │  remove <id>           remove a line                                    │
//! │  clear                 empty the cart                                   │
//! │  cart                  show the cart                                    │
//! │  checkout              confirm the order and empty the cart             │
//! │  help                  this list                                        │
//! │  quit                  leave                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::ProductId;

use crate::error::{AppError, AppResult};

pub const HELP: &str = "\
Commands:
  products              list the catalog
  refresh               refetch the catalog
  add <id>              add a product to the cart
  qty <id> <quantity>   change a line's quantity
  remove <id>           remove a line from the cart
  clear                 empty the cart
  cart                  show the cart
  checkout              place the order
  help                  show this list
  quit                  leave the store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Refresh,
    Add(ProductId),
    /// The quantity stays raw text; the cart view decides what it means.
    Qty(ProductId, String),
    Remove(ProductId),
    Clear,
    Cart,
    Checkout,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> AppResult<Option<Command>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "products" | "list" => Command::Products,
            "refresh" => Command::Refresh,
            "add" => Command::Add(product_id(words.next(), "add")?),
            "qty" | "quantity" => {
                let id = product_id(words.next(), "qty")?;
                let raw = words.next().unwrap_or_default().to_string();
                Command::Qty(id, raw)
            }
            "remove" | "rm" => Command::Remove(product_id(words.next(), "remove")?),
            "clear" => Command::Clear,
            "cart" => Command::Cart,
            "checkout" => Command::Checkout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(AppError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn product_id(word: Option<&str>, command: &'static str) -> AppResult<ProductId> {
    let word = word.ok_or(AppError::MissingArgument {
        command,
        argument: "product id",
    })?;
    Ok(word.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("products").unwrap(), Some(Command::Products));
        assert_eq!(Command::parse("  CART ").unwrap(), Some(Command::Cart));
        assert_eq!(Command::parse("checkout").unwrap(), Some(Command::Checkout));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_with_ids() {
        assert_eq!(
            Command::parse("add 3").unwrap(),
            Some(Command::Add(ProductId(3)))
        );
        assert_eq!(
            Command::parse("remove 12").unwrap(),
            Some(Command::Remove(ProductId(12)))
        );
    }

    #[test]
    fn test_parse_qty_keeps_raw_text() {
        assert_eq!(
            Command::parse("qty 1 abc").unwrap(),
            Some(Command::Qty(ProductId(1), "abc".to_string()))
        );
        assert_eq!(
            Command::parse("qty 1").unwrap(),
            Some(Command::Qty(ProductId(1), String::new()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("add"),
            Err(AppError::MissingArgument { command: "add", .. })
        ));
        assert!(matches!(
            Command::parse("add x"),
            Err(AppError::InvalidProductId(_))
        ));
        assert!(matches!(
            Command::parse("dance"),
            Err(AppError::UnknownCommand(name)) if name == "dance"
        ));
    }
}
