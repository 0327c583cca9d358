//! SQLite generator
//!
//! SQLite cannot change a column in place, add constraints to an existing
//! table, or create schemas. Column changes go through a temporary column.

use mg_core::expression::{ColumnExpression, CreateTableExpression};
use mg_core::{ColumnType, ConstraintKind, Expression, ExpressionKind, Value};
use sqlparser::dialect::{Dialect, SQLiteDialect};

use crate::ddl;
use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

const TEMP_SUFFIX: &str = "__mg_tmp";

pub struct SqliteDialect {
    dialect: SQLiteDialect,
}

impl SqliteDialect {
    pub fn new() -> Self {
        Self {
            dialect: SQLiteDialect {},
        }
    }

    fn unsupported(&self, operation: ExpressionKind, reason: &str) -> SqlError {
        SqlError::unsupported(self.name(), operation, reason)
    }

    fn create_table(&self, e: &CreateTableExpression) -> SqlResult<String> {
        let identity: Vec<_> = e.columns.iter().filter(|c| c.identity).collect();
        if identity.is_empty() {
            return ddl::create_table(self, e);
        }

        let (pk_columns, _) = ddl::primary_key_of(&e.columns);
        let inline = identity.len() == 1
            && identity[0].primary_key
            && pk_columns.len() == 1
            && matches!(
                identity[0].column_type,
                Some(ColumnType::Int16 | ColumnType::Int32 | ColumnType::Int64)
            );
        if !inline {
            return Err(self.unsupported(
                ExpressionKind::CreateTable,
                "identity is only available on a single integer primary key column",
            ));
        }

        ddl::create_table_with(self, e, false, |c| {
            if c.identity {
                Ok(format!(
                    "{} INTEGER PRIMARY KEY AUTOINCREMENT",
                    self.quote_ident(&c.name)
                ))
            } else {
                ddl::column_definition(self, ExpressionKind::CreateTable, c)
            }
        })
    }

    fn create_column(&self, e: &ColumnExpression) -> SqlResult<Vec<String>> {
        let column = &e.column;
        if column.primary_key || column.unique || column.identity {
            return Err(self.unsupported(
                ExpressionKind::CreateColumn,
                "key, unique and identity columns cannot be added to an existing table",
            ));
        }
        if column.foreign_key.is_some() {
            return Err(self.unsupported(
                ExpressionKind::CreateColumn,
                "foreign keys can only be declared when the table is created",
            ));
        }
        if !column.nullable && matches!(column.default, None | Some(Value::Null)) {
            return Err(self.unsupported(
                ExpressionKind::CreateColumn,
                "a NOT NULL column needs a non-null default",
            ));
        }
        Ok(vec![format!(
            "ALTER TABLE {} ADD COLUMN {}",
            ddl::qualified(self, e.schema_name.as_deref(), &e.table_name),
            ddl::column_definition(self, ExpressionKind::CreateColumn, column)?
        )])
    }

    /// Add a temporary column with the new definition, copy the data across,
    /// drop the old column and rename the temporary one into place
    fn alter_column(&self, e: &ColumnExpression) -> SqlResult<Vec<String>> {
        let column = &e.column;
        if column.primary_key || column.unique || column.identity {
            return Err(self.unsupported(
                ExpressionKind::AlterColumn,
                "key, unique and identity columns cannot be altered",
            ));
        }
        if column.foreign_key.is_some() {
            return Err(self.unsupported(
                ExpressionKind::CreateColumn,
                "foreign keys can only be declared when the table is created",
            ));
        }
        if !column.nullable && matches!(column.default, None | Some(Value::Null)) {
            return Err(self.unsupported(
                ExpressionKind::AlterColumn,
                "a NOT NULL column needs a non-null default",
            ));
        }

        let table = ddl::qualified(self, e.schema_name.as_deref(), &e.table_name);
        let original = self.quote_ident(&column.name);
        let temp_name = format!("{}{}", column.name, TEMP_SUFFIX);
        let temp = self.quote_ident(&temp_name);

        let mut temp_column = column.clone();
        temp_column.name = temp_name;
        let definition = ddl::column_definition(self, ExpressionKind::AlterColumn, &temp_column)?;

        let copy = if column.nullable {
            format!("UPDATE {} SET {} = {}", table, temp, original)
        } else {
            // keep the default for rows whose old value was NULL
            format!(
                "UPDATE {} SET {} = {} WHERE {} IS NOT NULL",
                table, temp, original, original
            )
        };

        Ok(vec![
            format!("ALTER TABLE {} ADD COLUMN {}", table, definition),
            copy,
            format!("ALTER TABLE {} DROP COLUMN {}", table, original),
            format!("ALTER TABLE {} RENAME COLUMN {} TO {}", table, temp, original),
        ])
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Boolean
            | ColumnType::Int16
            | ColumnType::Int32
            | ColumnType::Int64 => "INTEGER".to_string(),
            ColumnType::Decimal { .. } => "NUMERIC".to_string(),
            ColumnType::Float | ColumnType::Double => "REAL".to_string(),
            ColumnType::String { .. } => "TEXT".to_string(),
            ColumnType::Date | ColumnType::Time | ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Binary => "BLOB".to_string(),
            ColumnType::Guid => "UNIQUEIDENTIFIER".to_string(),
            ColumnType::Custom(raw) => raw.clone(),
        }
    }

    fn literal(&self, value: &Value) -> String {
        ddl::numeric_bool_literal(value)
    }

    fn cast_as_text(&self, expr: &str) -> String {
        format!("CAST({} AS TEXT)", expr)
    }

    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>> {
        match expression {
            Expression::CreateSchema(_) | Expression::DeleteSchema(_) => Err(self.unsupported(
                expression.kind(),
                "schemas are attached databases and cannot be created",
            )),
            Expression::CreateTable(e) => Ok(vec![self.create_table(e)?]),
            Expression::CreateColumn(e) => self.create_column(e),
            Expression::AlterColumn(e) => self.alter_column(e),
            Expression::DeleteColumn(e) => ddl::drop_columns_separately(self, e),
            Expression::CreateForeignKey(_) | Expression::DeleteForeignKey(_) => Err(self
                .unsupported(
                    expression.kind(),
                    "foreign keys can only be declared when the table is created",
                )),
            Expression::CreateConstraint(e) | Expression::DeleteConstraint(e)
                if e.constraint.kind == ConstraintKind::PrimaryKey =>
            {
                Err(self.unsupported(
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
#[path = "sqlite_test.rs"]
mod tests;
