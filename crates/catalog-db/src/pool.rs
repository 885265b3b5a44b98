//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Caller startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) / DbConfig::from_env() ← Configure pool           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + apply schema              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ db.session() per unit of work                                  │
//! │       ▼                                                                 │
//! │  Request 1 ──► Session(Conn1) ──► released on drop                     │
//! │  Request 2 ──► Session(Conn2) ──► released on drop                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::session::Session;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";

/// Environment variable overriding the pool size.
pub const ENV_DB_MAX_CONNECTIONS: &str = "CATALOG_DB_MAX_CONNECTIONS";

/// Database path used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "./catalog.db";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/catalog.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to apply the schema on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Builds a configuration from the environment.
    ///
    /// ## Variables
    /// - `CATALOG_DB_PATH` - database file (default `./catalog.db`)
    /// - `CATALOG_DB_MAX_CONNECTIONS` - pool size (default 5)
    pub fn from_env() -> DbResult<Self> {
        DbConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] with a custom variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let path = lookup(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup(ENV_DB_MAX_CONNECTIONS) {
            let max = raw.trim().parse::<u32>().map_err(|e| DbError::InvalidConfig {
                key: ENV_DB_MAX_CONNECTIONS.to_string(),
                reason: e.to_string(),
            })?;

            if max == 0 {
                return Err(DbError::InvalidConfig {
                    key: ENV_DB_MAX_CONNECTIONS.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }

            let min = config.min_connections.min(max);
            config = config.max_connections(max).min_connections(min);
        }

        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to apply the schema on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let config = DbConfig::in_memory();
    /// let db = Database::new(config).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle.
///
/// Owns the pool and hands out [`Session`]s. Nothing here is global: the
/// caller creates a `Database`, keeps it wherever it likes, and passes
/// sessions into repository calls.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()?).await?;
///
/// let mut session = db.session().await?;
/// let repo = db.products();
/// repo.create(&mut session, &mut product).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Applies the schema (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path creates file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies the embedded schema.
    ///
    /// Called by `new()` when `run_migrations` is true; call it manually
    /// otherwise.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer sessions and repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquires a session (one pooled connection) for a unit of work.
    ///
    /// ## Errors
    /// `DbError::PoolExhausted` when no connection frees up within the
    /// configured timeout.
    pub async fn session(&self) -> DbResult<Session> {
        Session::acquire(&self.pool).await
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new()
    }

    /// Closes the database connection pool.
    ///
    /// ## Note
    /// After calling close, acquiring a session fails.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = DbConfig::in_memory();
        let db = Database::new(config).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = DbConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.max_connections, 5);

        let config = DbConfig::from_lookup(|key| match key {
            ENV_DB_PATH => Some("/var/lib/catalog/products.db".to_string()),
            ENV_DB_MAX_CONNECTIONS => Some(" 8 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/catalog/products.db"));
        assert_eq!(config.max_connections, 8);
    }

    #[test]
    fn test_config_from_lookup_rejects_bad_pool_size() {
        for raw in ["many", "0", "-1"] {
            let err = DbConfig::from_lookup(|key| {
                (key == ENV_DB_MAX_CONNECTIONS).then(|| raw.to_string())
            })
            .unwrap_err();
            assert!(matches!(err, DbError::InvalidConfig { .. }), "accepted {raw}");
        }
    }

    #[tokio::test]
    async fn test_session_released_on_drop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let _session = db.session().await.unwrap();
        }

        // Single-connection pool: this only succeeds if the session gave it back
        let session = db.session().await.unwrap();
        session.close();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_closed_pool_refuses_sessions() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = db.session().await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
