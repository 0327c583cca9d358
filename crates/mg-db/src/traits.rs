//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// One result row; `None` is SQL NULL
pub type Row = Vec<Option<String>>;

/// Connection the migration runner executes statements through
///
/// Implementations must be Send + Sync for async operation. A connection
/// carries at most one open transaction at a time.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple `;`-separated statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return every row with values rendered as text
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Open a transaction
    async fn begin_transaction(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    async fn schema_exists(&self, schema: &str) -> DbResult<bool>;

    /// Check for a table; `None` means the connection's default schema
    async fn table_exists(&self, schema: Option<&str>, table: &str) -> DbResult<bool>;

    async fn column_exists(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
