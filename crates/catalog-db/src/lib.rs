//! # catalog-db: Product Persistence
//!
//! Stores [`catalog_core::Product`] records in SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Caller (service, CLI, test)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     catalog-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ProductRepo   │    │ 0001_create_ │  │   │
//! │  │   │ Session       │◄───│ ProductQuery  │    │ products.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             SQLite Database ($CATALOG_DB_PATH)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Configuration and the connection pool
//! - [`session`] - One checked-out connection per unit of work
//! - [`migrations`] - Embedded schema
//! - [`error`] - Database error types
//! - [`repository`] - Product repository and queries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! let mut session = db.session().await?;
//! let repo = db.products();
//!
//! repo.create(&mut session, &mut product).await?;
//! let hats = repo.find_by_name("Fedora").fetch_all(&mut session).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{Database, DbConfig};
pub use session::Session;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::query::{ProductFilter, ProductQuery, ProductStream};
