//! # Product Queries
//!
//! Filtered lookups as reusable values.
//!
//! ## Lazy and Restartable
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ProductQuery Lifecycle                               │
//! │                                                                         │
//! │  repo.find_by_category(Category::Food)                                 │
//! │       │   (no I/O yet, just a ProductFilter)                            │
//! │       ▼                                                                 │
//! │  ProductQuery ──┬──► count(conn)      SELECT COUNT(*) ... WHERE ...    │
//! │                 ├──► fetch_all(conn)  SELECT ... WHERE ... ORDER BY id │
//! │                 ├──► first(conn)                                        │
//! │                 └──► fetch(conn)      row stream, pulled on demand     │
//! │                                                                         │
//! │  Every call re-runs the same statement: count it, then iterate it      │
//! │  as many times as needed without restating the filter.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fixed Statements
//! Each filter maps to one compile-time SQL string with a single bound
//! parameter. Input never becomes part of the SQL text.
//!
//! ## Equality Semantics
//! - **price**: compared as integer hundredths, so `12.5` and `12.50` hit
//!   the same rows. A price that can't be stored matches nothing.
//! - **category**: compared by what the stored text decodes to, so rows
//!   holding `" food "` match `Food` and rows holding anything unknown
//!   match `Unknown`.

use catalog_core::validation::price_to_cents;
use catalog_core::{Category, Product};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnection;
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRow;

/// Lazily pulled query results.
pub type ProductStream<'e> = Pin<Box<dyn Stream<Item = DbResult<Product>> + Send + 'e>>;

/// Builds the SELECT for a WHERE clause.
macro_rules! select_products {
    ($filter:literal) => {
        concat!(
            "SELECT id, name, description, price, available, category FROM products",
            $filter,
            " ORDER BY id"
        )
    };
}

/// Builds the COUNT for a WHERE clause.
macro_rules! count_products {
    ($filter:literal) => {
        concat!("SELECT COUNT(*) FROM products", $filter)
    };
}

/// Both statements for one WHERE clause, plus the value to bind.
macro_rules! plan {
    ($filter:literal, $value:expr) => {
        Plan {
            select: select_products!($filter),
            count: count_products!($filter),
            value: $value,
        }
    };
}

/// Binds a [`FilterValue`] to either kind of sqlx query.
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            FilterValue::Text(v) => $query.bind(v),
            FilterValue::Integer(v) => $query.bind(v),
            FilterValue::Flag(v) => $query.bind(v),
            FilterValue::Unbound => $query,
        }
    };
}

// =============================================================================
// Filter
// =============================================================================

/// Equality predicate on one product attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// No predicate.
    All,
    Name(String),
    Price(Decimal),
    Available(bool),
    Category(Category),
}

impl ProductFilter {
    /// Resolves the statements to run. `None` means nothing can match.
    fn plan(&self) -> Option<Plan> {
        let plan = match self {
            ProductFilter::All => plan!("", FilterValue::Unbound),
            ProductFilter::Name(name) => plan!(" WHERE name = ?1", FilterValue::Text(name.clone())),
            ProductFilter::Price(price) => {
                let cents = price_to_cents(*price).ok()?;
                plan!(" WHERE price = ?1", FilterValue::Integer(cents))
            }
            ProductFilter::Available(flag) => plan!(" WHERE available = ?1", FilterValue::Flag(*flag)),
            // Everything that doesn't decode to a known variant
            ProductFilter::Category(Category::Unknown) => plan!(
                " WHERE UPPER(TRIM(category)) NOT IN ('CLOTHS', 'FOOD', 'HOUSEWARES', 'AUTOMOTIVE', 'TOOLS')",
                FilterValue::Unbound
            ),
            ProductFilter::Category(category) => plan!(
                " WHERE UPPER(TRIM(category)) = ?1",
                FilterValue::Text(category.as_str().to_string())
            ),
        };
        Some(plan)
    }
}

struct Plan {
    select: &'static str,
    count: &'static str,
    value: FilterValue,
}

enum FilterValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Unbound,
}

// =============================================================================
// Query
// =============================================================================

/// A filtered product lookup that has not run yet.
///
/// Cheap to clone, and every execution method can be called repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    filter: ProductFilter,
}

impl ProductQuery {
    /// Wraps a filter.
    pub fn new(filter: ProductFilter) -> Self {
        ProductQuery { filter }
    }

    /// Every product.
    pub fn all() -> Self {
        ProductQuery::new(ProductFilter::All)
    }

    /// The predicate this query applies.
    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Counts matching rows.
    pub async fn count(&self, conn: &mut SqliteConnection) -> DbResult<i64> {
        let Some(plan) = self.filter.plan() else {
            return Ok(0);
        };

        let query = sqlx::query_scalar::<_, i64>(plan.count);
        let count = bind_value!(query, plan.value).fetch_one(conn).await?;

        debug!(filter = ?self.filter, count, "Counted products");
        Ok(count)
    }

    /// Loads every matching product, ordered by id.
    pub async fn fetch_all(&self, conn: &mut SqliteConnection) -> DbResult<Vec<Product>> {
        let Some(plan) = self.filter.plan() else {
            return Ok(Vec::new());
        };

        let query = sqlx::query_as::<_, ProductRow>(plan.select);
        let rows = bind_value!(query, plan.value).fetch_all(conn).await?;

        debug!(filter = ?self.filter, count = rows.len(), "Fetched products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Loads the first match by id, if any.
    pub async fn first(&self, conn: &mut SqliteConnection) -> DbResult<Option<Product>> {
        let Some(plan) = self.filter.plan() else {
            return Ok(None);
        };

        let query = sqlx::query_as::<_, ProductRow>(plan.select);
        let row = bind_value!(query, plan.value).fetch_optional(conn).await?;

        Ok(row.map(Product::from))
    }

    /// Streams matching products, one row at a time.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let query = repo.find_by_availability(true);
    /// let mut stream = query.fetch(&mut session);
    /// while let Some(product) = stream.next().await {
    ///     let product = product?;
    ///     // ...
    /// }
    /// ```
    pub fn fetch<'e>(&self, conn: &'e mut SqliteConnection) -> ProductStream<'e> {
        let Some(plan) = self.filter.plan() else {
            return Box::pin(tokio_stream::empty::<DbResult<Product>>());
        };

        let query = sqlx::query_as::<_, ProductRow>(plan.select);
        let rows = bind_value!(query, plan.value).fetch(conn);

        Box::pin(rows.map(|row| row.map(Product::from).map_err(DbError::from)))
    }
}

impl From<ProductFilter> for ProductQuery {
    fn from(filter: ProductFilter) -> Self {
        ProductQuery::new(filter)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductRepository;
    use crate::session::Session;
    use catalog_core::factory::ProductFactory;
    use sqlx::Row;

    async fn setup() -> (Database, Session) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session().await.unwrap();
        (db, session)
    }

    #[test]
    fn test_unknown_category_excludes_every_known_name() {
        let plan = ProductFilter::Category(Category::Unknown).plan().unwrap();

        for category in Category::ALL.iter().filter(|c| **c != Category::Unknown) {
            let quoted = format!("'{}'", category.as_str());
            assert!(plan.select.contains(&quoted), "missing {quoted}");
            assert!(plan.count.contains(&quoted), "missing {quoted}");
        }
    }

    #[tokio::test]
    async fn test_category_lookup_uses_index() {
        let (_db, mut session) = setup().await;
        let plan = ProductFilter::Category(Category::Food).plan().unwrap();

        let rows = sqlx::query(&format!("EXPLAIN QUERY PLAN {}", plan.count))
            .bind(Category::Food.as_str())
            .fetch_all(session.connection())
            .await
            .unwrap();

        let details: Vec<String> = rows
            .iter()
            .map(|row| row.try_get::<String, _>("detail").unwrap())
            .collect();
        assert!(
            details.iter().any(|d| d.contains("idx_products_category")),
            "plan: {details:?}"
        );
    }

    #[test]
    fn test_unstorable_price_plans_nothing() {
        assert!(ProductFilter::Price(Decimal::new(12505, 3)).plan().is_none());
        assert!(ProductFilter::Price(Decimal::new(-1, 0)).plan().is_none());
        assert!(ProductFilter::Price(Decimal::new(1250, 2)).plan().is_some());
    }

    #[tokio::test]
    async fn test_query_is_restartable() {
        let (_db, mut session) = setup().await;
        let repo = ProductRepository::new();

        for mut product in ProductFactory::new().build_batch(6) {
            repo.create(&mut session, &mut product).await.unwrap();
        }

        let query = ProductQuery::all();
        assert_eq!(query.count(&mut session).await.unwrap(), 6);

        let first_pass = query.fetch_all(&mut session).await.unwrap();
        let second_pass = query.fetch_all(&mut session).await.unwrap();
        assert_eq!(first_pass.len(), 6);
        assert_eq!(first_pass, second_pass);
    }

    #[tokio::test]
    async fn test_fetch_streams_in_id_order() {
        let (_db, mut session) = setup().await;
        let repo = ProductRepository::new();

        for mut product in ProductFactory::new().build_batch(4) {
            repo.create(&mut session, &mut product).await.unwrap();
        }

        let query = ProductQuery::all();
        let mut ids = Vec::new();
        {
            let mut stream = query.fetch(&mut session);
            while let Some(product) = stream.next().await {
                ids.push(product.unwrap().id.unwrap());
            }
        }

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids, sorted);

        // Stream again after the first one is dropped
        let again: Vec<_> = query.fetch(&mut session).collect().await;
        assert_eq!(again.len(), 4);
    }

    #[tokio::test]
    async fn test_first_and_empty_results() {
        let (_db, mut session) = setup().await;

        let query = ProductQuery::new(ProductFilter::Name("Nothing".to_string()));
        assert_eq!(query.count(&mut session).await.unwrap(), 0);
        assert!(query.fetch_all(&mut session).await.unwrap().is_empty());
        assert!(query.first(&mut session).await.unwrap().is_none());

        let unstorable = ProductQuery::new(ProductFilter::Price(Decimal::new(1, 3)));
        assert_eq!(unstorable.count(&mut session).await.unwrap(), 0);
        assert_eq!(unstorable.fetch(&mut session).collect::<Vec<_>>().await.len(), 0);
    }
}
