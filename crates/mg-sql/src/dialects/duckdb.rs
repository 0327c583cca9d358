//! DuckDB generator
//!
//! DuckDB has no identity columns and cannot add or drop foreign keys or
//! primary keys on existing tables. Identity columns are backed by a
//! sequence; unique constraints become unique indexes.

use mg_core::expression::{ColumnExpression, CreateTableExpression};
use mg_core::{ColumnDefinition, ColumnType, ConstraintKind, Expression, ExpressionKind};
use sqlparser::dialect::{Dialect, DuckDbDialect as SqlParserDuckDb};

use crate::ddl;
use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

/// DuckDB SQL dialect
pub struct DuckDbDialect {
    dialect: SqlParserDuckDb,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserDuckDb {},
        }
    }

    fn sequence_name(table: &str, column: &str) -> String {
        format!("seq_{}_{}", table, column)
    }

    /// `CREATE SEQUENCE` for an identity column plus the default clause using it
    fn identity_sequence(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &ColumnDefinition,
    ) -> (String, String) {
        let sequence = Self::sequence_name(table, &column.name);
        let create = format!(
            "CREATE SEQUENCE IF NOT EXISTS {}",
            ddl::qualified(self, schema, &sequence)
        );
        let reference = match ddl::non_empty(schema) {
            Some(schema) => format!("{}.{}", schema, sequence),
            None => sequence,
        };
        let default = format!("DEFAULT nextval('{}')", ddl::escape_sql_string(&reference));
        (create, default)
    }

    fn column_sql(
        &self,
        operation: ExpressionKind,
        schema: Option<&str>,
        table: &str,
        column: &ColumnDefinition,
        sequences: &mut Vec<String>,
    ) -> SqlResult<String> {
        if column.identity {
            let (create, default) = self.identity_sequence(schema, table, column);
            sequences.push(create);
            ddl::column_definition_with(self, operation, column, Some(&default), false)
        } else {
            ddl::column_definition(self, operation, column)
        }
    }

    fn create_table(&self, e: &CreateTableExpression) -> SqlResult<Vec<String>> {
        let mut statements = Vec::new();
        let table = ddl::create_table_with(self, e, true, |column| {
            self.column_sql(
                ExpressionKind::CreateTable,
                e.schema_name.as_deref(),
                &e.table_name,
                column,
                &mut statements,
            )
        })?;
        statements.push(table);
        Ok(statements)
    }

    fn create_column(&self, e: &ColumnExpression) -> SqlResult<Vec<String>> {
        let column = &e.column;
        if column.primary_key {
            return Err(SqlError::unsupported(
                self.name(),
                ExpressionKind::CreateColumn,
                "primary key columns cannot be added to an existing table",
            ));
        }
        if column.foreign_key.is_some() {
            return Err(SqlError::unsupported(
                self.name(),
                ExpressionKind::CreateColumn,
                "foreign keys can only be declared when the table is created",
            ));
        }
        let table = ddl::qualified(self, e.schema_name.as_deref(), &e.table_name);

        // ADD COLUMN accepts no constraints; nullability and uniqueness follow separately
        let mut plain = column.clone();
        plain.nullable = true;
        plain.unique = false;

        let mut statements = Vec::new();
        let definition = self.column_sql(
            ExpressionKind::CreateColumn,
            e.schema_name.as_deref(),
            &e.table_name,
            &plain,
            &mut statements,
        )?;
        statements.push(format!("ALTER TABLE {} ADD COLUMN {}", table, definition));

        if !column.nullable {
            statements.push(format!(
                "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                table,
                self.quote_ident(&column.name)
            ));
        }
        if column.unique {
            let index = format!("UC_{}_{}", e.table_name, column.name);
            statements.push(format!(
                "CREATE UNIQUE INDEX {} ON {} ({})",
                self.quote_ident(&index),
                table,
                self.quote_ident(&column.name)
            ));
        }
        Ok(statements)
    }

    fn alter_column(&self, e: &ColumnExpression) -> SqlResult<Vec<String>> {
        let table = ddl::qualified(self, e.schema_name.as_deref(), &e.table_name);
        Ok(ddl::alter_column_actions(self, e)?
            .into_iter()
            .map(|action| format!("ALTER TABLE {} {}", table, action))
            .collect())
    }
}

impl Default for DuckDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DuckDbDialect {
    fn name(&self) -> &'static str {
        "DuckDB"
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
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::String { length: Some(n) } => format!("VARCHAR({})", n),
            ColumnType::String { length: None } => "VARCHAR".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::DateTime => "TIMESTAMP".to_string(),
            ColumnType::Binary => "BLOB".to_string(),
            ColumnType::Guid => "UUID".to_string(),
            ColumnType::Custom(raw) => raw.clone(),
        }
    }

    fn named_constraints(&self) -> bool {
        false
    }

    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>> {
        match expression {
            Expression::CreateTable(e) => self.create_table(e),
            Expression::CreateColumn(e) => self.create_column(e),
            Expression::AlterColumn(e) => self.alter_column(e),
            Expression::DeleteColumn(e) => ddl::drop_columns_separately(self, e),
            Expression::CreateForeignKey(_) | Expression::DeleteForeignKey(_) => {
                Err(SqlError::unsupported(
                    self.name(),
                    expression.kind(),
                    "foreign keys can only be declared when the table is created",
                ))
            }
            Expression::CreateConstraint(e) | Expression::DeleteConstraint(e)
                if e.constraint.kind == ConstraintKind::PrimaryKey =>
            {
                Err(SqlError::unsupported(
                    self.name(),
                    expression.kind(),
                    "primary keys can only be declared when the table is created",
                ))
            }
            Expression::CreateConstraint(e) => {
                Ok(vec![ddl::unique_index_for(self, &e.constraint, true)?])
            }
            Expression::DeleteConstraint(e) => {
                Ok(vec![ddl::unique_index_for(self, &e.constraint, false)?])
            }
            _ => ddl::generate_standard(self, expression),
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
