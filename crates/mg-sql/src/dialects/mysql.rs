//! MySQL 8 generator

use mg_core::{ColumnType, ConstraintKind, Expression, ExpressionKind};
use sqlparser::dialect::{Dialect, MySqlDialect as SqlParserMySql};

use crate::ddl;
use crate::dialect::SqlDialect;
use crate::error::SqlResult;

pub struct MySqlDialect {
    dialect: SqlParserMySql,
}

impl MySqlDialect {
    pub fn new() -> Self {
        Self {
            dialect: SqlParserMySql {},
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "MySql8"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["MySql"]
    }

    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Boolean => "TINYINT(1)".to_string(),
            ColumnType::Int16 => "SMALLINT".to_string(),
            ColumnType::Int32 => "INT".to_string(),
            ColumnType::Int64 => "BIGINT".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("DECIMAL({}, {})", precision, scale)
            }
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::String { length: Some(n) } => format!("VARCHAR({})", n),
            ColumnType::String { length: None } => "LONGTEXT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Binary => "LONGBLOB".to_string(),
            ColumnType::Guid => "CHAR(36)".to_string(),
            ColumnType::Custom(raw) => raw.clone(),
        }
    }

    fn identity_clause(&self) -> Option<&'static str> {
        Some("AUTO_INCREMENT")
    }

    fn cast_as_text(&self, expr: &str) -> String {
        format!("CAST({} AS CHAR(64))", expr)
    }

    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>> {
        let sql = match expression {
            Expression::AlterColumn(e) => format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                ddl::qualified(self, e.schema_name.as_deref(), &e.table_name),
                ddl::column_definition(self, ExpressionKind::AlterColumn, &e.column)?
            ),
            Expression::RenameTable(e) => format!(
                "RENAME TABLE {} TO {}",
                ddl::qualified(self, e.schema_name.as_deref(), &e.old_name),
                ddl::qualified(self, e.schema_name.as_deref(), &e.new_name)
            ),
            Expression::DeleteForeignKey(e) => {
                let fk = &e.foreign_key;
                let name =
                    ddl::require_name(ExpressionKind::DeleteForeignKey, &fk.name, "foreign key")?;
                format!(
                    "ALTER TABLE {} DROP FOREIGN KEY {}",
                    ddl::qualified(self, fk.foreign_table_schema.as_deref(), &fk.foreign_table),
                    self.quote_ident(name)
                )
            }
            Expression::DeleteConstraint(e) => {
                let c = &e.constraint;
                let table = ddl::qualified(self, c.schema_name.as_deref(), &c.table_name);
                match c.kind {
                    // MySQL has exactly one primary key per table, so no name is needed
                    ConstraintKind::PrimaryKey => format!("ALTER TABLE {} DROP PRIMARY KEY", table),
                    ConstraintKind::Unique => {
                        let name = ddl::require_name(
                            ExpressionKind::DeleteConstraint,
                            &c.name,
                            "constraint",
                        )?;
                        format!("ALTER TABLE {} DROP INDEX {}", table, self.quote_ident(name))
                    }
                }
            }
            Expression::DeleteIndex(e) => {
                let name = ddl::require_name(ExpressionKind::DeleteIndex, &e.index.name, "index")?;
                format!(
                    "DROP INDEX {} ON {}",
                    self.quote_ident(name),
                    ddl::qualified(self, e.index.schema_name.as_deref(), &e.index.table_name)
                )
            }
            _ => return ddl::generate_standard(self, expression),
        };
        Ok(vec![sql])
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
