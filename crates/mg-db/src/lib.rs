//! mg-db - Database abstraction layer for Migrant
//!
//! This crate provides the `Database` trait the runner drives migrations
//! through, and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub(crate) mod row_helpers;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row};
