//! Coinshop persistence layer
//!
//! SQLite-backed durable state behind an explicit atomic unit:
//!
//! - [`Database`]: connection pool, migrations, health check
//! - [`AtomicUnit`]: one transaction; every store access goes through one
//! - [`store`]: per-domain store modules (accounts, catalog, operations)
//!
//! # Atomicity discipline
//!
//! Store functions never touch the pool directly; they all take a
//! `&mut AtomicUnit`. A caller acquires one unit, performs every read and
//! write of an operation through it, and commits or rolls back as a single
//! step. Dropping an uncommitted unit rolls back, so an aborted caller
//! leaves no partial effect.

pub mod config;
pub mod error;
pub mod models;
pub mod store;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use models::*;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// One transaction against the durable store.
///
/// All reads observe a consistent snapshot; all writes commit together or
/// not at all. Dropping the unit without [`commit`](Self::commit) rolls
/// every constituent write back.
pub struct AtomicUnit {
    tx: sqlx::Transaction<'static, sqlx::Sqlite>,
}

impl AtomicUnit {
    pub(crate) fn conn(&mut self) -> &mut sqlx::SqliteConnection {
        &mut self.tx
    }

    /// Commit every write performed through this unit.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(DbError::Query)
    }

    /// Explicitly discard every write performed through this unit.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await.map_err(DbError::Query)
    }
}

impl Database {
    /// Open the pool.
    ///
    /// A `:memory:` database lives inside a single sqlite connection, so
    /// memory URLs clamp the pool to one permanent connection.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!(url = %config.url, "Connecting to SQLite");

        let journal_mode = if config.is_in_memory() {
            SqliteJournalMode::Memory
        } else {
            SqliteJournalMode::Wal
        };

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Connection(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(journal_mode)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(config.max_connections);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!("Connected to SQLite");

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Begin one atomic unit.
    pub async fn begin(&self) -> DbResult<AtomicUnit> {
        let tx = self.pool.begin().await.map_err(DbError::Query)?;
        Ok(AtomicUnit { tx })
    }

    /// Liveness check against the store.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    db.migrate().await.expect("migrations");
    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinshop_types::Coins;

    #[tokio::test]
    async fn connect_and_migrate() {
        let db = test_database().await;
        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn dropped_unit_rolls_back() {
        let db = test_database().await;

        let mut unit = db.begin().await.unwrap();
        store::accounts::create(&mut unit, "ghost", "secret", Coins::new(1000))
            .await
            .unwrap();
        drop(unit);

        let mut unit = db.begin().await.unwrap();
        let row = store::accounts::get(&mut unit, "ghost").await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn committed_unit_persists() {
        let db = test_database().await;

        let mut unit = db.begin().await.unwrap();
        store::accounts::create(&mut unit, "alice", "secret", Coins::new(1000))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let mut unit = db.begin().await.unwrap();
        let row = store::accounts::get(&mut unit, "alice").await.unwrap().unwrap();
        assert_eq!(row.balance, 1000);
    }

    #[tokio::test]
    async fn catalog_is_seeded() {
        let db = test_database().await;

        let mut unit = db.begin().await.unwrap();
        let cup = store::catalog::get(&mut unit, "cup").await.unwrap().unwrap();
        assert_eq!(cup.price, 20);
    }
}
