//! PostgreSQL generator

use mg_core::{ColumnType, Expression};
use sqlparser::dialect::{Dialect, PostgreSqlDialect};

use crate::ddl;
use crate::dialect::SqlDialect;
use crate::error::SqlResult;

/// PostgreSQL dialect; column changes are combined into one `ALTER TABLE`
pub struct PostgresDialect {
    dialect: PostgreSqlDialect,
}

impl PostgresDialect {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "Postgres"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["PostgreSQL"]
    }

    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Int16 => "SMALLINT".to_string(),
            ColumnType::Int32 => "INTEGER".to_string(),
            ColumnType::Int64 => "BIGINT".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("DECIMAL({}, {})", precision, scale)
            }
            ColumnType::Float => "REAL".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::String { length: Some(n) } => format!("VARCHAR({})", n),
            ColumnType::String { length: None } => "TEXT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::DateTime => "TIMESTAMP".to_string(),
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::Guid => "UUID".to_string(),
            ColumnType::Custom(raw) => raw.clone(),
        }
    }

    fn identity_clause(&self) -> Option<&'static str> {
        Some("GENERATED BY DEFAULT AS IDENTITY")
    }

    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>> {
        ddl::generate_standard(self, expression)
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
