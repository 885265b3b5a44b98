//! # catalog-core: Pure Product Model for Catalog
//!
//! This crate holds the product model with zero I/O dependencies. The
//! database layer (`catalog-db`) and any API layer both build on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                API layer (external collaborator)                │   │
//! │  │     JSON payload ──► Product::from_payload ──► repository       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation │  │   error   │  │  factory  │  │   │
//! │  │   │  Product  │  │   rules    │  │Validation │  │ test data │  │   │
//! │  │   │ Category  │  │   prices   │  │   Error   │  │           │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  catalog-db (Database Layer)                    │   │
//! │  │            SQLite schema, sessions, product repository          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product` and `Category`
//! - [`validation`] - Field rules and price conversion
//! - [`error`] - `ValidationError`
//! - [`factory`] - Deterministic fake products
//!
//! ## Design Principles
//!
//! 1. **Decimal Money**: Prices are `rust_decimal::Decimal`, never `f64`
//! 2. **Closed Enums**: Category is a tagged enum in memory, text only at the store boundary
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{Category, Product};
//! use rust_decimal::Decimal;
//!
//! let hat = Product::new("Fedora", "A red hat", Decimal::new(1250, 2), true, Category::Cloths);
//! assert!(hat.validate().is_ok());
//! assert_eq!(hat.price, Decimal::new(125, 1)); // compared by value
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod factory;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::{Category, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 250;

/// Fractional digits a price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Largest price in hundredths: fourteen digits, all nines.
pub const MAX_PRICE_CENTS: i64 = 99_999_999_999_999;
