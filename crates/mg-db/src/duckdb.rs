//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::row_helpers::{escape_sql_string, get_column_as_string};
use crate::traits::{Database, Row};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Schema unqualified names resolve to
const DEFAULT_SCHEMA: &str = "main";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        log::debug!("duckdb execute: {}", sql);
        conn.execute(sql, []).map_err(|e| match DbError::from(e) {
            DbError::ExecutionError(msg) => DbError::ExecutionError(format!("{}: {}", msg, sql)),
            other => other,
        })
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Run a query and collect every row as text
    fn query_rows_sync(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| get_column_as_string(row, i))
                    .collect::<Row>())
            })
            .map_err(DbError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(format!("row error: {e}")))?;
        Ok(rows)
    }

    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        log::debug!("duckdb {}", statement);
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }

    /// COUNT(*) probe against information_schema
    fn count_sync(&self, sql: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }
}

fn schema_or_default(schema: Option<&str>) -> &str {
    schema.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SCHEMA)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_rows_sync(sql)
    }

    async fn begin_transaction(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }

    async fn schema_exists(&self, schema: &str) -> DbResult<bool> {
        self.count_sync(&format!(
            "SELECT COUNT(*) FROM information_schema.schemata WHERE lower(schema_name) = lower('{}')",
            escape_sql_string(schema)
        ))
    }

    async fn table_exists(&self, schema: Option<&str>, table: &str) -> DbResult<bool> {
        self.count_sync(&format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE lower(table_schema) = lower('{}') AND lower(table_name) = lower('{}')",
            escape_sql_string(schema_or_default(schema)),
            escape_sql_string(table)
        ))
    }

    async fn column_exists(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> DbResult<bool> {
        self.count_sync(&format!(
            "SELECT COUNT(*) FROM information_schema.columns \
             WHERE lower(table_schema) = lower('{}') AND lower(table_name) = lower('{}') \
             AND lower(column_name) = lower('{}')",
            escape_sql_string(schema_or_default(schema)),
            escape_sql_string(table),
            escape_sql_string(column)
        ))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
