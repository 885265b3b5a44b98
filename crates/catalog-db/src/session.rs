//! # Session
//!
//! One pooled connection, held for one unit of work.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  db.session()  ──► acquire connection from pool                        │
//! │       │                                                                 │
//! │       ├── repo.create(&mut session, ..)   each call commits itself     │
//! │       │                                                                 │
//! │       ├── let mut tx = session.begin()    caller-owned transaction     │
//! │       │     ├── repo.create(&mut tx, ..)  runs as a SAVEPOINT          │
//! │       │     ├── repo.update(&mut tx, ..)                               │
//! │       │     └── tx.commit() / tx.rollback() / drop → rollback          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drop(session) ──► connection returns to the pool                      │
//! │                    (also on early return and `?`)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Session` derefs to [`SqliteConnection`], so it can be handed straight to
//! any repository method.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Sqlite, SqlitePool, Transaction};
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A connection checked out of the pool for one unit of work.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Checks a connection out of the pool.
    pub(crate) async fn acquire(pool: &SqlitePool) -> DbResult<Self> {
        let conn = pool.acquire().await?;
        debug!("Session acquired");
        Ok(Session { conn })
    }

    /// Starts a transaction on this session.
    ///
    /// The returned guard rolls back when dropped without `commit()`.
    pub async fn begin(&mut self) -> DbResult<Transaction<'_, Sqlite>> {
        debug!("Beginning transaction");
        self.conn
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    /// Executes a raw statement and returns the number of rows affected.
    ///
    /// For maintenance statements the repository does not cover.
    pub async fn execute(&mut self, sql: &str) -> DbResult<u64> {
        let result = sqlx::query(sql).execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }

    /// The underlying connection.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Returns the connection to the pool.
    ///
    /// Dropping the session does the same; this just makes the end of the
    /// unit of work explicit at the call site.
    pub fn close(self) {
        debug!("Session released");
        drop(self.conn);
    }
}

impl Deref for Session {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_execute_reports_rows_affected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = db.session().await.unwrap();

        let inserted = session
            .execute("INSERT INTO products (name, price, available) VALUES ('Hat', 100, 1)")
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let deleted = session.execute("DELETE FROM products").await.unwrap();
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = db.session().await.unwrap();

        {
            let mut tx = session.begin().await.unwrap();
            sqlx::query("INSERT INTO products (name, price, available) VALUES ('Hat', 100, 1)")
                .execute(&mut *tx)
                .await
                .unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(session.connection())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_committed_transaction_persists() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = db.session().await.unwrap();

        let mut tx = session.begin().await.unwrap();
        sqlx::query("INSERT INTO products (name, price, available) VALUES ('Hat', 100, 1)")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(session.connection())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
