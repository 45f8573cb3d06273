//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::{
    SqliteLeaseRepository, SqliteOwnershipRepository, SqlitePostRepository,
    SqlitePropertyRepository, SqlitePropertyUnitRepository, SqliteTransactionRepository,
    SqliteUserRepository,
};
use crate::db::{Database, DbError, DbResult};

// Embed migrations from migrations/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite database implementation backed by a sqlx connection pool.
///
/// Foreign keys are enabled on every connection so cascading deletes and
/// reference checks are enforced by SQLite itself.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (or create) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Access the underlying pool (for tests and ad-hoc queries).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type Users<'a> = SqliteUserRepository<'a>;
    type Posts<'a> = SqlitePostRepository<'a>;
    type Properties<'a> = SqlitePropertyRepository<'a>;
    type Units<'a> = SqlitePropertyUnitRepository<'a>;
    type Ownerships<'a> = SqliteOwnershipRepository<'a>;
    type Leases<'a> = SqliteLeaseRepository<'a>;
    type Transactions<'a> = SqliteTransactionRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    fn users(&self) -> Self::Users<'_> {
        SqliteUserRepository { pool: &self.pool }
    }

    fn posts(&self) -> Self::Posts<'_> {
        SqlitePostRepository { pool: &self.pool }
    }

    fn properties(&self) -> Self::Properties<'_> {
        SqlitePropertyRepository { pool: &self.pool }
    }

    fn units(&self) -> Self::Units<'_> {
        SqlitePropertyUnitRepository { pool: &self.pool }
    }

    fn ownerships(&self) -> Self::Ownerships<'_> {
        SqliteOwnershipRepository { pool: &self.pool }
    }

    fn leases(&self) -> Self::Leases<'_> {
        SqliteLeaseRepository { pool: &self.pool }
    }

    fn transactions(&self) -> Self::Transactions<'_> {
        SqliteTransactionRepository { pool: &self.pool }
    }
}
