//! SQLite report store.

use async_trait::async_trait;
use sqlx::Row;
use tracing::debug;

use super::trait_::{ReportStore, Result, StorageError, StoredReport};

/// SQLite-backed report history.
#[derive(Clone)]
pub struct SqliteReportStore {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl SqliteReportStore {
    /// Create a new store. `db_url` is an sqlx sqlite URL, e.g.
    /// `sqlite://reports.db?mode=rwc`.
    pub async fn new(db_url: &str) -> Result<Self> {
        let pool = sqlx::SqlitePool::connect(db_url)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Create an in-memory store for testing. Pinned to a single
    /// connection: each sqlite :memory: connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    /// Reset the autoincrement sequence when the table is empty, so a
    /// cleared database starts numbering reports at 1 again. The
    /// sqlite_sequence table does not exist until the first insert;
    /// that case is not an error.
    async fn reset_sequence_if_empty(&self) -> Result<()> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;
        let count: i64 = row.try_get("n").unwrap_or_default();

        if count == 0 {
            if let Err(e) = sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'reports'")
                .execute(&self.pool)
                .await
            {
                debug!("No sequence to reset: {}", e);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn append(&mut self, content: &str) -> Result<i64> {
        self.reset_sequence_if_empty().await?;

        let result = sqlx::query("INSERT INTO reports (content, created_at) VALUES (?, ?)")
            .bind(content)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn list(&self) -> Result<Vec<StoredReport>> {
        let rows = sqlx::query("SELECT id, content, created_at FROM reports ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let created: String = row.try_get("created_at").unwrap_or_default();
                StoredReport {
                    id: row.try_get("id").unwrap_or_default(),
                    content: row.try_get("content").unwrap_or_default(),
                    created_at: created.parse().unwrap_or_else(|_| chrono::Utc::now()),
                }
            })
            .collect())
    }
}
