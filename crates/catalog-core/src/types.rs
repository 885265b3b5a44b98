//! # Domain Types
//!
//! The product model shared by the repository and its callers.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌─────────────────┐                   │
//! │  │       Product        │        │    Category     │                   │
//! │  │  ──────────────────  │        │  ─────────────  │                   │
//! │  │  id (store assigned) │        │  UNKNOWN        │ ← default         │
//! │  │  name                │───────►│  CLOTHS         │                   │
//! │  │  description         │        │  FOOD           │                   │
//! │  │  price (Decimal)     │        │  HOUSEWARES     │                   │
//! │  │  available           │        │  AUTOMOTIVE     │                   │
//! │  │  category            │        │  TOOLS          │                   │
//! │  └──────────────────────┘        └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is `None` while a product is transient. The store assigns it on
//! create and it never changes afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{self, ValidationResult};

// =============================================================================
// Category
// =============================================================================

/// Closed set of product categories.
///
/// ## Storage Form
/// Persisted as the upper-case name (`"CLOTHS"`). Reading text back is
/// forgiving: see [`Category::from_stored`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Unset or unrecognized.
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    /// Every category, `Unknown` first.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Canonical upper-case name, as stored.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }

    /// Matches a name ignoring ASCII case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Category> {
        Category::match_name(raw.trim())
    }

    /// Decodes a stored value. Anything unrecognized becomes `Unknown`
    /// instead of failing the whole row.
    ///
    /// Only spaces are stripped, the same as SQLite's one-argument `TRIM`,
    /// so a row decodes to exactly the category `find_by_category` files
    /// it under.
    pub fn from_stored(raw: &str) -> Category {
        Category::match_name(raw.trim_matches(' ')).unwrap_or_default()
    }

    fn match_name(raw: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing for user input.
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| ValidationError::NotAllowed {
            field: "category".to_string(),
            allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// One sellable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier; `None` until created.
    pub id: Option<i64>,

    /// Display name. Never blank.
    pub name: String,

    /// Free text, may be empty.
    #[serde(default)]
    pub description: String,

    /// Fixed-point price. Compared by value, so `12.5 == 12.50`.
    #[ts(as = "String")]
    pub price: Decimal,

    /// Whether the product can currently be sold.
    pub available: bool,

    #[serde(default)]
    pub category: Category,
}

impl Product {
    /// Creates a transient product (`id` is `None`).
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::{Category, Product};
    /// use rust_decimal::Decimal;
    ///
    /// let hat = Product::new("Fedora", "A red hat", Decimal::new(1250, 2), true, Category::Cloths);
    /// assert_eq!(hat.id, None);
    /// assert_eq!(hat.to_string(), "<Product Fedora id=[None]>");
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Product {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// True once the store has assigned an id.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks every field rule.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_product(self)
    }

    /// Renders the product as the JSON object the API layer sends out.
    ///
    /// Price goes out as a decimal string so no client parses it as a float.
    pub fn to_payload(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }

    /// Builds a transient product from an API payload.
    ///
    /// ## Rules
    /// ```text
    /// ┌──────────────┬───────────────────────────────────────────────────────┐
    /// │ field        │ accepted                                              │
    /// ├──────────────┼───────────────────────────────────────────────────────┤
    /// │ name         │ string, required                                      │
    /// │ description  │ string, missing/null → ""                             │
    /// │ price        │ string or number, required, parsed as decimal         │
    /// │ available    │ boolean only, required                                │
    /// │ category     │ known name (any case), missing/null → UNKNOWN         │
    /// │ id           │ ignored                                               │
    /// └──────────────┴───────────────────────────────────────────────────────┘
    /// ```
    pub fn from_payload(data: &Value) -> ValidationResult<Product> {
        let obj = data
            .as_object()
            .ok_or_else(|| ValidationError::invalid_format("product", "body must be a JSON object"))?;

        let name = match field(obj, "name") {
            Some(Value::String(s)) => s.clone(),
            None => return Err(ValidationError::required("name")),
            Some(other) => return Err(wrong_type("name", "string", other)),
        };

        let description = match field(obj, "description") {
            Some(Value::String(s)) => s.clone(),
            None => String::new(),
            Some(other) => return Err(wrong_type("description", "string", other)),
        };

        let price = match field(obj, "price") {
            Some(Value::String(s)) => validation::parse_price(s)?,
            Some(Value::Number(n)) => validation::parse_price(&n.to_string())?,
            None => return Err(ValidationError::required("price")),
            Some(other) => return Err(wrong_type("price", "decimal", other)),
        };

        let available = match field(obj, "available") {
            Some(Value::Bool(b)) => *b,
            None => return Err(ValidationError::required("available")),
            Some(other) => return Err(wrong_type("available", "boolean", other)),
        };

        let category = match field(obj, "category") {
            Some(Value::String(s)) => s.parse::<Category>()?,
            None => Category::Unknown,
            Some(other) => return Err(wrong_type("category", "string", other)),
        };

        let product = Product::new(name, description, price, available, category);
        product.validate()?;
        Ok(product)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

/// Looks up a payload field, treating JSON `null` like a missing key.
fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn wrong_type(field: &str, expected: &str, found: &Value) -> ValidationError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ValidationError::invalid_format(field, format!("invalid type for {expected}: {found}"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fedora() -> Product {
        Product::new(
            "Fedora",
            "A red hat",
            Decimal::new(1250, 2),
            true,
            Category::Cloths,
        )
    }

    #[test]
    fn test_create_a_product() {
        let product = fedora();
        assert_eq!(product.to_string(), "<Product Fedora id=[None]>");
        assert_eq!(product.id, None);
        assert!(!product.is_persisted());
        assert_eq!(product.name, "Fedora");
        assert_eq!(product.description, "A red hat");
        assert!(product.available);
        assert_eq!(product.price, Decimal::new(125, 1));
        assert_eq!(product.category, Category::Cloths);
    }

    #[test]
    fn test_display_with_id() {
        let mut product = fedora();
        product.id = Some(7);
        assert_eq!(product.to_string(), "<Product Fedora id=[7]>");
    }

    #[test]
    fn test_category_default_is_unknown() {
        assert_eq!(Category::default(), Category::Unknown);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("CLOTHS"), Some(Category::Cloths));
        assert_eq!(Category::parse(" tools "), Some(Category::Tools));
        assert_eq!(Category::parse("Housewares"), Some(Category::Housewares));
        assert_eq!(Category::parse("SPACESHIPS"), None);
    }

    #[test]
    fn test_category_from_stored_is_lossy() {
        assert_eq!(Category::from_stored("FOOD"), Category::Food);
        assert_eq!(Category::from_stored("SPACESHIPS"), Category::Unknown);
        assert_eq!(Category::from_stored(""), Category::Unknown);
        assert_eq!(Category::from_stored("  food "), Category::Food);
    }

    #[test]
    fn test_category_from_stored_strips_only_spaces() {
        assert_eq!(Category::from_stored("\tFOOD"), Category::Unknown);
        assert_eq!(Category::from_stored("FOOD\n"), Category::Unknown);
        assert_eq!(Category::from_stored("\u{a0}FOOD"), Category::Unknown);

        // User input is still trimmed of any whitespace
        assert_eq!(Category::parse("\tFOOD\n"), Some(Category::Food));
    }

    #[test]
    fn test_category_from_str_is_strict() {
        assert_eq!("automotive".parse::<Category>().unwrap(), Category::Automotive);

        let err = "SPACESHIPS".parse::<Category>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref allowed, .. } if allowed.len() == 6));
    }

    #[test]
    fn test_category_serde_uses_canonical_names() {
        assert_eq!(serde_json::to_string(&Category::Housewares).unwrap(), "\"HOUSEWARES\"");
        let parsed: Category = serde_json::from_str("\"TOOLS\"").unwrap();
        assert_eq!(parsed, Category::Tools);
    }

    #[test]
    fn test_to_payload() {
        let mut product = fedora();
        product.id = Some(3);
        let payload = product.to_payload();

        assert_eq!(payload["id"], 3);
        assert_eq!(payload["name"], "Fedora");
        assert_eq!(payload["price"], "12.50");
        assert_eq!(payload["available"], true);
        assert_eq!(payload["category"], "CLOTHS");
    }

    #[test]
    fn test_from_payload() {
        let data = json!({
            "id": 99,
            "name": "Hammer",
            "description": "Claw hammer",
            "price": "19.95",
            "available": false,
            "category": "TOOLS",
        });

        let product = Product::from_payload(&data).unwrap();
        assert_eq!(product.id, None);
        assert_eq!(product.name, "Hammer");
        assert_eq!(product.price, Decimal::new(1995, 2));
        assert!(!product.available);
        assert_eq!(product.category, Category::Tools);
    }

    #[test]
    fn test_from_payload_defaults() {
        let data = json!({ "name": "Apple", "price": 0.5, "available": true });

        let product = Product::from_payload(&data).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::new(5, 1));
        assert_eq!(product.category, Category::Unknown);
    }

    #[test]
    fn test_from_payload_rejects_bad_input() {
        let missing_name = json!({ "price": "1.00", "available": true });
        assert_eq!(
            Product::from_payload(&missing_name).unwrap_err(),
            ValidationError::required("name")
        );

        let bad_available = json!({ "name": "Hat", "price": "1.00", "available": "yes" });
        let err = Product::from_payload(&bad_available).unwrap_err();
        assert_eq!(err.field(), "available");
        assert!(err.to_string().contains("invalid type for boolean"));

        let bad_price = json!({ "name": "Hat", "price": "cheap", "available": true });
        assert_eq!(Product::from_payload(&bad_price).unwrap_err().field(), "price");

        let bad_category = json!({ "name": "Hat", "price": "1.00", "available": true, "category": "HATS" });
        assert!(matches!(
            Product::from_payload(&bad_category),
            Err(ValidationError::NotAllowed { .. })
        ));

        let blank_name = json!({ "name": "  ", "price": "1.00", "available": true });
        assert!(Product::from_payload(&blank_name).is_err());

        assert!(Product::from_payload(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_payload_round_trip_preserves_fields() {
        let product = fedora();
        let restored = Product::from_payload(&product.to_payload()).unwrap();
        assert_eq!(restored, product);
    }
}
