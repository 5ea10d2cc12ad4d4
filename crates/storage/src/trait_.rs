//! Report store abstraction.

use async_trait::async_trait;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// One persisted report row.
#[derive(Debug, Clone)]
pub struct StoredReport {
    /// Monotonic row id.
    pub id: i64,
    /// Verbatim report text.
    pub content: String,
    /// When the report was appended.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Append-only history of batch reports.
///
/// Rows are never updated or deleted; the store is the durable trail
/// of each improvement round.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Append one report, returning its id.
    async fn append(&mut self, content: &str) -> Result<i64>;

    /// List all stored reports in insertion order.
    async fn list(&self) -> Result<Vec<StoredReport>>;
}
