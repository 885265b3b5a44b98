//! # Product Factory
//!
//! Deterministic fake products for tests and the `seed` binary.
//!
//! Values are drawn from small pools so that any batch of more than a
//! handful of products contains repeated names, prices, availability flags
//! and categories. Lookup tests rely on that.
//!
//! ```rust
//! use catalog_core::factory::ProductFactory;
//!
//! let batch = ProductFactory::new().build_batch(10);
//! assert_eq!(batch.len(), 10);
//! assert!(batch.iter().all(|p| p.id.is_none()));
//! ```

use rust_decimal::Decimal;

use crate::types::{Category, Product};

/// Product names to pick from.
const NAMES: &[&str] = &[
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// Words used to build descriptions.
const WORDS: &[&str] = &[
    "sturdy", "classic", "red", "organic", "compact", "deluxe", "everyday", "heavy", "soft",
    "bright", "imported", "fresh",
];

/// Prices in hundredths.
const PRICES_CENTS: &[i64] = &[50, 99, 1250, 1995, 4999, 12000, 199_999];

/// Categories a factory product can land in (never `Unknown`).
const CATEGORIES: &[Category] = &[
    Category::Cloths,
    Category::Food,
    Category::Housewares,
    Category::Automotive,
    Category::Tools,
];

/// Builds transient products from a running seed.
#[derive(Debug, Clone)]
pub struct ProductFactory {
    seed: usize,
}

impl ProductFactory {
    /// Starts at seed 0.
    pub fn new() -> Self {
        ProductFactory { seed: 0 }
    }

    /// Starts at an arbitrary seed. Two factories with the same seed
    /// produce the same products.
    pub fn with_seed(seed: usize) -> Self {
        ProductFactory { seed }
    }

    /// Builds the next product.
    pub fn build(&mut self) -> Product {
        let product = generate_product(self.seed);
        self.seed += 1;
        product
    }

    /// Builds `count` products.
    pub fn build_batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}

impl Default for ProductFactory {
    fn default() -> Self {
        ProductFactory::new()
    }
}

impl Iterator for ProductFactory {
    type Item = Product;

    fn next(&mut self) -> Option<Product> {
        Some(self.build())
    }
}

/// Generates a single product from a seed.
fn generate_product(seed: usize) -> Product {
    // Different strides per field so the fields don't move in lockstep
    let name = NAMES[((seed % 6) * 7 + seed / 6) % NAMES.len()];
    let category = CATEGORIES[(seed * 3 + seed / 5) % CATEGORIES.len()];
    let price = Decimal::new(PRICES_CENTS[(seed * 5 + 1) % PRICES_CENTS.len()], 2);
    let available = seed % 3 != 1;

    let description = format!(
        "{} {} {}",
        WORDS[(seed * 11) % WORDS.len()],
        WORDS[(seed * 13 + 4) % WORDS.len()],
        name.to_lowercase()
    );

    Product::new(name, description, price, available, category)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_products_are_transient_and_valid() {
        for product in ProductFactory::new().take(200) {
            assert_eq!(product.id, None);
            assert!(product.validate().is_ok(), "invalid factory product: {product}");
        }
    }

    #[test]
    fn test_same_seed_same_products() {
        let a = ProductFactory::with_seed(42).build_batch(5);
        let b = ProductFactory::with_seed(42).build_batch(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batches_contain_duplicates_and_variety() {
        let batch = ProductFactory::new().build_batch(10);

        let names: HashSet<_> = batch.iter().map(|p| p.name.clone()).collect();
        let categories: HashSet<_> = batch.iter().map(|p| p.category).collect();
        let flags: HashSet<_> = batch.iter().map(|p| p.available).collect();

        assert!(names.len() > 1 && names.len() < 10);
        assert!(categories.len() > 1 && categories.len() < 10);
        assert_eq!(flags.len(), 2);
    }
}
