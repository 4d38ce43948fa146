//! Database connection, schema sync and seed data.

pub mod schema_sync;
pub mod seed;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

pub use schema_sync::{SchemaSyncResult, sync_all_entity_schemas};
pub use seed::{SeedResult, run_seeds};

const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Database wrapper providing connection pool access
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new connection pool. The database file is created when missing
    /// and foreign keys are enforced on every connection. Writers wait up to
    /// `BUSY_TIMEOUT` for the write lock.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid DATABASE_URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        info!(url = %url, max_connections, "Connected to database");
        Ok(Self { pool })
    }

    /// Private in-memory database on a single long-lived connection.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;
        Ok(Self { pool })
    }

    /// Create missing tables/columns and insert lookup rows.
    pub async fn prepare(&self, seed: bool) -> Result<()> {
        let sync = sync_all_entity_schemas(&self.pool).await;
        if !sync.errors.is_empty() {
            anyhow::bail!("Schema sync failed: {}", sync.errors.join("; "));
        }
        info!(
            tables_created = sync.tables_created.len(),
            columns_added = sync.columns_added.len(),
            "Schema sync complete"
        );

        if seed {
            let seeded = run_seeds(&self.pool).await;
            if !seeded.errors.is_empty() {
                anyhow::bail!("Seeding failed: {}", seeded.errors.join("; "));
            }
        }
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_database_is_created_and_prepared() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("protocol.db").display());

        let db = Database::connect(&url, 2).await.unwrap();
        db.prepare(true).await.unwrap();

        let fk: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(fk, 1);

        let statuses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contribution_status")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(statuses, 3);
    }

    #[tokio::test]
    async fn prepare_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.prepare(true).await.unwrap();
        db.prepare(true).await.unwrap();

        let types: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chain_type")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(types, seed::CHAIN_TYPES.len() as i64);
    }
}
