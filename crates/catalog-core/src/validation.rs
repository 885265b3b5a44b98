//! # Validation Module
//!
//! Field rules for products, checked before anything reaches the store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API payload (Product::from_payload)                          │
//! │  ├── JSON type checks (boolean, string, number)                        │
//! │  └── Category / price parsing                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (create / update)                                 │
//! │  └── THIS MODULE: name, description, price bounds                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints (non-blank name, price >= 0)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Representation
//! Prices are `NUMERIC(14, 2)`: at most two fractional digits and fourteen
//! digits in total. In the store they live as integer hundredths, which is
//! what makes equality lookups exact. [`price_to_cents`] is the single
//! gate between the two forms.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Product;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_PRICE_CENTS, PRICE_SCALE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Fedora").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product description. Empty is fine.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Price
// =============================================================================

/// Largest storable price (999,999,999,999.99).
pub fn max_price() -> Decimal {
    Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE)
}

/// Parses a price from text.
///
/// Surrounding whitespace and double quotes are stripped first, so
/// `"\"12.50\""` and `" 12.50 "` both parse.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price("12.50").unwrap(), Decimal::new(1250, 2));
/// assert!(parse_price("twelve").is_err());
/// ```
pub fn parse_price(raw: &str) -> ValidationResult<Decimal> {
    let trimmed = raw.trim_matches(|c: char| c == '"' || c.is_whitespace());

    if trimmed.is_empty() {
        return Err(ValidationError::required("price"));
    }

    Decimal::from_str(trimmed).map_err(|e| ValidationError::invalid_format("price", e.to_string()))
}

/// Converts a price to integer hundredths for storage.
///
/// ## Rules
/// - Must be non-negative
/// - At most 2 fractional digits (trailing zeros don't count: `1.500` is fine)
/// - At most 999,999,999,999.99
pub fn price_to_cents(price: Decimal) -> ValidationResult<i64> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "price".to_string(),
        min: "0".to_string(),
        max: max_price().to_string(),
    };

    if price.is_sign_negative() && !price.is_zero() {
        return Err(out_of_range());
    }

    if price.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::TooPrecise {
            field: "price".to_string(),
            max_scale: PRICE_SCALE,
        });
    }

    if price > max_price() {
        return Err(out_of_range());
    }

    (price * Decimal::from(100)).trunc().to_i64().ok_or_else(out_of_range)
}

/// Converts stored hundredths back to a price.
#[inline]
pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

/// Validates a price without converting it.
pub fn validate_price(price: Decimal) -> ValidationResult<()> {
    price_to_cents(price).map(|_| ())
}

// =============================================================================
// Whole Product
// =============================================================================

/// Runs every field rule against a product.
///
/// `id` and `category` are not checked: the former belongs to the store,
/// the latter can't hold an invalid value once it is a [`Category`](crate::Category).
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_description(&product.description)?;
    validate_price(product.price)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
