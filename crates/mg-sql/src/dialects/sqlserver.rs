//! SQL Server 2016 generator
//!
//! Defaults are named `DF_{table}_{column}` constraints. Altering or dropping
//! a column first drops whatever default constraint is bound to it.

use mg_core::expression::{ColumnExpression, DeleteColumnExpression};
use mg_core::{
    ColumnDefinition, ColumnType, ConstraintDefinition, ConstraintKind, Expression,
    ExpressionKind, Value,
};
use sqlparser::dialect::{Dialect, MsSqlDialect};

use crate::ddl;
use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

pub struct SqlServerDialect {
    dialect: MsSqlDialect,
}

impl SqlServerDialect {
    pub fn new() -> Self {
        Self {
            dialect: MsSqlDialect {},
        }
    }

    fn default_constraint(&self, table: &str, column: &ColumnDefinition) -> Option<String> {
        column.default.as_ref().map(|value| {
            format!(
                "CONSTRAINT {} DEFAULT {}",
                self.quote_ident(&format!("DF_{}_{}", table, column.name)),
                self.literal(value)
            )
        })
    }

    fn column_sql(
        &self,
        operation: ExpressionKind,
        table: &str,
        column: &ColumnDefinition,
    ) -> SqlResult<String> {
        let default = self.default_constraint(table, column);
        ddl::column_definition_with(self, operation, column, default.as_deref(), true)
    }

    /// Batch dropping the default constraint bound to a column, if any
    fn drop_default_constraint(&self, schema: Option<&str>, table: &str, column: &str) -> String {
        let object = ddl::escape_sql_string(&ddl::qualified(self, schema, table));
        format!(
            "DECLARE @default sysname, @sql nvarchar(max);\n\
             SELECT @default = name FROM sys.default_constraints \
             WHERE parent_object_id = object_id(N'{object}') AND type = 'D' \
             AND parent_column_id = (SELECT column_id FROM sys.columns \
             WHERE name = N'{column}' AND object_id = object_id(N'{object}'));\n\
             IF @default IS NOT NULL BEGIN \
             SET @sql = N'ALTER TABLE {table_sql} DROP CONSTRAINT ' + QUOTENAME(@default); \
             EXEC sp_executesql @sql; END;",
            object = object,
            column = ddl::escape_sql_string(column),
            table_sql = ddl::escape_sql_string(&ddl::qualified(self, schema, table)),
        )
    }

    fn alter_column(&self, e: &ColumnExpression) -> SqlResult<Vec<String>> {
        let column = &e.column;
        let table = ddl::qualified(self, e.schema_name.as_deref(), &e.table_name);
        let mut statements = vec![self.drop_default_constraint(
            e.schema_name.as_deref(),
            &e.table_name,
            &column.name,
        )];
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} {} {}",
            table,
            self.quote_ident(&column.name),
            ddl::column_type_sql(self, ExpressionKind::AlterColumn, column)?,
            if column.nullable { "NULL" } else { "NOT NULL" }
        ));
        if let Some(default) = self.default_constraint(&e.table_name, column) {
            statements.push(format!(
                "ALTER TABLE {} ADD {} FOR {}",
                table,
                default,
                self.quote_ident(&column.name)
            ));
        }
        Ok(statements)
    }

    fn delete_columns(&self, e: &DeleteColumnExpression) -> SqlResult<Vec<String>> {
        if e.column_names.is_empty() {
            return Err(SqlError::invalid(
                ExpressionKind::DeleteColumn,
                "no column names given",
            ));
        }
        let table = ddl::qualified(self, e.schema_name.as_deref(), &e.table_name);
        let mut statements = Vec::with_capacity(e.column_names.len() * 2);
        for column in &e.column_names {
            statements.push(self.drop_default_constraint(
                e.schema_name.as_deref(),
                &e.table_name,
                column,
            ));
            statements.push(format!(
                "ALTER TABLE {} DROP COLUMN {}",
                table,
                self.quote_ident(column)
            ));
        }
        Ok(statements)
    }

    fn sp_rename(&self, object: &str, new_name: &str, kind: Option<&str>) -> String {
        let mut sql = format!(
            "EXEC sp_rename N'{}', N'{}'",
            ddl::escape_sql_string(object),
            ddl::escape_sql_string(new_name)
        );
        if let Some(kind) = kind {
            sql.push_str(&format!(", N'{}'", kind));
        }
        sql
    }
}

impl Default for SqlServerDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "SqlServer2016"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["SqlServer"]
    }

    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Boolean => "BIT".to_string(),
            ColumnType::Int16 => "SMALLINT".to_string(),
            ColumnType::Int32 => "INT".to_string(),
            ColumnType::Int64 => "BIGINT".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("DECIMAL({}, {})", precision, scale)
            }
            ColumnType::Float => "REAL".to_string(),
            ColumnType::Double => "FLOAT".to_string(),
            ColumnType::String { length: Some(n) } => format!("NVARCHAR({})", n),
            ColumnType::String { length: None } => "NVARCHAR(MAX)".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::DateTime => "DATETIME2".to_string(),
            ColumnType::Binary => "VARBINARY(MAX)".to_string(),
            ColumnType::Guid => "UNIQUEIDENTIFIER".to_string(),
            ColumnType::Custom(raw) => raw.clone(),
        }
    }

    fn literal(&self, value: &Value) -> String {
        match value {
            Value::Text(s) => format!("N'{}'", ddl::escape_sql_string(s)),
            other => ddl::numeric_bool_literal(other),
        }
    }

    fn identity_clause(&self) -> Option<&'static str> {
        Some("IDENTITY(1,1)")
    }

    fn cast_as_text(&self, expr: &str) -> String {
        format!("CAST({} AS NVARCHAR(64))", expr)
    }

    fn batch_separator(&self) -> Option<&'static str> {
        Some("GO")
    }

    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>> {
        match expression {
            Expression::CreateTable(e) => Ok(vec![ddl::create_table_with(self, e, true, |c| {
                self.column_sql(ExpressionKind::CreateTable, &e.table_name, c)
            })?]),
            Expression::CreateColumn(e) => {
                let mut statements = vec![format!(
                    "ALTER TABLE {} ADD {}",
                    ddl::qualified(self, e.schema_name.as_deref(), &e.table_name),
                    self.column_sql(ExpressionKind::CreateColumn, &e.table_name, &e.column)?
                )];
                if e.column.primary_key {
                    statements.push(ddl::add_constraint(
                        self,
                        &ConstraintDefinition {
                            kind: ConstraintKind::PrimaryKey,
                            name: e.column.primary_key_name.clone(),
                            schema_name: e.schema_name.clone(),
                            table_name: e.table_name.clone(),
                            columns: vec![e.column.name.clone()],
                        },
                    )?);
                }
                statements.extend(ddl::add_column_foreign_key(self, e)?);
                Ok(statements)
            }
            Expression::AlterColumn(e) => self.alter_column(e),
            Expression::DeleteColumn(e) => self.delete_columns(e),
            Expression::RenameTable(e) => Ok(vec![self.sp_rename(
                &ddl::qualified(self, e.schema_name.as_deref(), &e.old_name),
                &e.new_name,
                None,
            )]),
            Expression::RenameColumn(e) => {
                let object = format!(
                    "{}.{}",
                    ddl::qualified(self, e.schema_name.as_deref(), &e.table_name),
                    self.quote_ident(&e.old_name)
                );
                Ok(vec![self.sp_rename(&object, &e.new_name, Some("COLUMN"))])
            }
            Expression::DeleteIndex(e) => {
                let name = ddl::require_name(ExpressionKind::DeleteIndex, &e.index.name, "index")?;
                Ok(vec![format!(
                    "DROP INDEX {} ON {}",
                    self.quote_ident(name),
                    ddl::qualified(self, e.index.schema_name.as_deref(), &e.index.table_name)
                )])
            }
            _ => ddl::generate_standard(self, expression),
        }
    }
}

#[cfg(test)]
#[path = "sqlserver_test.rs"]
mod tests;
