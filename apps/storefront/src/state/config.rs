//! # Display Configuration
//!
//! How the terminal renders money and greets the user.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Defaults (this file)
//!
//! Catalog settings live in `storefront_catalog::CatalogConfig`.

use storefront_core::Money;

/// Display configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Shown in the welcome line.
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            store_name: "Storefront".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Creates a DisplayConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_STORE_NAME`: Override store name
    /// - `STOREFRONT_CURRENCY_SYMBOL`: Override currency symbol
    pub fn from_env() -> Self {
        let mut config = DisplayConfig::default();

        if let Ok(store_name) = std::env::var("STOREFRONT_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(symbol) = std::env::var("STOREFRONT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats a money amount as a currency string.
    ///
    /// Amounts are whole cents, so there are always two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::Money;
    /// use storefront_lib::state::DisplayConfig;
    ///
    /// let config = DisplayConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(1998)), "$19.98");
    /// ```
    pub fn format_money(&self, money: Money) -> String {
        let cents = money.cents();
        let magnitude = cents.unsigned_abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            magnitude / 100,
            magnitude % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_positive() {
        let config = DisplayConfig::default();
        assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_money(Money::from_cents(100)), "$1.00");
        assert_eq!(config.format_money(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_money(Money::zero()), "$0.00");
    }

    #[test]
    fn test_format_money_negative() {
        let config = DisplayConfig::default();
        assert_eq!(config.format_money(Money::from_cents(-1234)), "-$12.34");
    }

    #[test]
    fn test_format_money_custom_symbol() {
        let config = DisplayConfig {
            currency_symbol: "€".to_string(),
            ..DisplayConfig::default()
        };
        assert_eq!(config.format_money(Money::from_cents(2500)), "€25.00");
    }

    #[test]
    fn test_format_money_extremes() {
        let config = DisplayConfig::default();
        assert_eq!(
            config.format_money(Money::from_cents(i64::MAX)),
            "$92233720368547758.07"
        );
        assert_eq!(
            config.format_money(Money::from_cents(i64::MIN)),
            "-$92233720368547758.08"
        );
    }
}
