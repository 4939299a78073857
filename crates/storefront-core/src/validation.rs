//! # Validation Module
//!
//! Input coercion and catalog record checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog boundary                                             │
//! │  ├── price decoded through Money::from_decimal (>= 0, finite)          │
//! │  └── validate_catalog_product: title present                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart View input                                              │
//! │  └── parse_quantity_input: free text ──► positive quantity             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart Store                                                   │
//! │  └── trusts its inputs; quantity <= 0 means "remove"                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::CatalogProduct;
use crate::DEFAULT_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Input
// =============================================================================

/// Coerces free-form quantity text into a positive quantity.
///
/// ## Rules
/// - Leading and trailing whitespace is ignored
/// - An optional sign followed by the leading run of digits is read;
///   anything after the digits is ignored (`"3 pcs"` is 3, `"2.7"` is 2)
/// - No digits, or a result <= 0, falls back to 1
/// - Values too large for `i64` saturate
///
/// ## Example
/// ```rust
/// use storefront_core::validation::parse_quantity_input;
///
/// assert_eq!(parse_quantity_input("4"), 4);
/// assert_eq!(parse_quantity_input("abc"), 1);
/// assert_eq!(parse_quantity_input("0"), 1);
/// assert_eq!(parse_quantity_input("-3"), 1);
/// ```
pub fn parse_quantity_input(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let leading: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };

    if leading.is_empty() || negative {
        return DEFAULT_QUANTITY;
    }

    let parsed = leading
        .bytes()
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if parsed <= 0 {
        DEFAULT_QUANTITY
    } else {
        parsed
    }
}

// =============================================================================
// Catalog Records
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be blank
pub fn validate_product_title(title: &str) -> ValidationResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    Ok(())
}

/// Checks that a catalog record can be offered for sale.
///
/// Prices are already checked while decoding, so this only looks at the
/// fields that decoding accepts unconditionally.
pub fn validate_catalog_product(product: &CatalogProduct) -> CoreResult<()> {
    validate_product_title(&product.title).map_err(|source| CoreError::InvalidProduct {
        id: product.id,
        source,
    })?;

    if product.price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
