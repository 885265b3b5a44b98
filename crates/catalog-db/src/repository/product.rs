//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with a commit per write
//! - Primary-key lookup and full listing
//! - Attribute lookups returning [`ProductQuery`]
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How create() Commits                                 │
//! │                                                                         │
//! │  product.id = None                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()  ──✗──► DbError::Validation (store untouched)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  conn.begin()    BEGIN, or SAVEPOINT inside a caller transaction       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO products ...  ──✗──► dropped tx rolls back                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tx.commit()  ──✗──► DbError::TransactionFailed, id stays None         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product.id = Some(rowid)   only now does it look persisted            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! update() and delete() follow the same shape.

use catalog_core::validation::{price_from_cents, price_to_cents};
use catalog_core::{Category, Product};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, FromRow, Sqlite, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::query::{ProductFilter, ProductQuery};

/// A `products` row as SQLite returns it.
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: i64,
    available: bool,
    category: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: Some(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            price: price_from_cents(row.price),
            available: row.available,
            category: Category::from_stored(&row.category),
        }
    }
}

/// Repository for product database operations.
///
/// Holds no connection of its own: every call takes the session it should
/// run on.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new();
/// let mut session = db.session().await?;
///
/// let mut hat = Product::new("Fedora", "A red hat", price, true, Category::Cloths);
/// repo.create(&mut session, &mut hat).await?;
///
/// let found = repo.find(&mut session, hat.id.unwrap()).await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRepository;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new() -> Self {
        ProductRepository
    }

    /// Inserts a product and writes the generated id back onto it.
    ///
    /// Any id already on `product` is discarded first, so the same value
    /// can be created again as a new row.
    ///
    /// ## Returns
    /// * `Ok(id)` - Row committed, `product.id == Some(id)`
    /// * `Err(DbError::Validation)` - Field rule broken, nothing written
    /// * `Err(_)` - Store failure, nothing written, `product.id == None`
    pub async fn create(&self, conn: &mut SqliteConnection, product: &mut Product) -> DbResult<i64> {
        product.id = None;
        product.validate()?;
        let price = price_to_cents(product.price)?;

        debug!(name = %product.name, "Creating product");

        let mut tx = begin(conn).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(product.name.as_str())
        .bind(product.description.as_str())
        .bind(price)
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        commit(tx).await?;

        product.id = Some(id);
        debug!(id, "Product created");
        Ok(id)
    }

    /// Overwrites every mutable column of an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update committed
    /// * `Err(DbError::NotFound)` - No id, or no row with that id (nothing is inserted)
    /// * `Err(DbError::Validation)` - Field rule broken
    pub async fn update(&self, conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        let id = product
            .id
            .ok_or_else(|| DbError::not_found("Product", "None"))?;
        product.validate()?;
        let price = price_to_cents(product.price)?;

        debug!(id, "Updating product");

        let mut tx = begin(conn).await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price = ?4,
                available = ?5,
                category = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(product.name.as_str())
        .bind(product.description.as_str())
        .bind(price)
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        commit(tx).await
    }

    /// Removes a product's row.
    ///
    /// Deleting an id that is already gone succeeds. A product without an
    /// id identifies no row and is reported as `NotFound`.
    pub async fn delete(&self, conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        let id = product
            .id
            .ok_or_else(|| DbError::not_found("Product", "None"))?;

        debug!(id, "Deleting product");

        let mut tx = begin(conn).await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        commit(tx).await?;

        if result.rows_affected() == 0 {
            debug!(id, "Delete matched no row");
        }

        Ok(())
    }

    /// Removes every product. Returns the number of rows deleted.
    pub async fn delete_all(&self, conn: &mut SqliteConnection) -> DbResult<u64> {
        let mut tx = begin(conn).await?;

        let result = sqlx::query("DELETE FROM products").execute(&mut *tx).await?;

        commit(tx).await?;

        debug!(count = result.rows_affected(), "Deleted all products");
        Ok(result.rows_affected())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        debug!(id, "Finding product");

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, available, category
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists every product, ordered by id.
    pub async fn all(&self, conn: &mut SqliteConnection) -> DbResult<Vec<Product>> {
        ProductQuery::all().fetch_all(conn).await
    }

    /// Counts all products.
    pub async fn count(&self, conn: &mut SqliteConnection) -> DbResult<i64> {
        ProductQuery::all().count(conn).await
    }

    /// Products whose name equals `name` exactly.
    pub fn find_by_name(&self, name: impl Into<String>) -> ProductQuery {
        ProductQuery::new(ProductFilter::Name(name.into()))
    }

    /// Products whose price equals `price` by value.
    pub fn find_by_price(&self, price: Decimal) -> ProductQuery {
        ProductQuery::new(ProductFilter::Price(price))
    }

    /// Products with the given availability.
    pub fn find_by_availability(&self, available: bool) -> ProductQuery {
        ProductQuery::new(ProductFilter::Available(available))
    }

    /// Products in the given category.
    pub fn find_by_category(&self, category: Category) -> ProductQuery {
        ProductQuery::new(ProductFilter::Category(category))
    }
}

async fn begin(conn: &mut SqliteConnection) -> DbResult<Transaction<'_, Sqlite>> {
    conn.begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

async fn commit(tx: Transaction<'_, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
