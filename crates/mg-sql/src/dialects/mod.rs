//! Built-in dialect generators

mod duckdb;
mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

pub use duckdb::DuckDbDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;
