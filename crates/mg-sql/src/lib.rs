//! mg-sql - SQL generation layer for Migrant
//!
//! Turns resolved expressions into dialect-specific SQL statements, keeps the
//! registry of known dialects, and splits script files into statements.

pub mod ddl;
pub mod dialect;
pub mod dialects;
pub mod error;
pub mod script;

pub use dialect::{DialectRegistry, SqlDialect};
pub use dialects::{DuckDbDialect, MySqlDialect, PostgresDialect, SqlServerDialect, SqliteDialect};
pub use error::{SqlError, SqlResult};
pub use script::split_statements;
