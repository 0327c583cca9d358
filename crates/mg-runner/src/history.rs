//! Schema history table
//!
//! One row per applied regular migration: `Version`, `AppliedOn`,
//! `Description`. The table is created on first use, together with its
//! schema when one is configured. Statements are generated through the
//! target dialect like any other expression.

use crate::error::{MigrationError, MigrationResult};
use chrono::{SubsecRound, Utc};
use mg_core::expression::{
    CreateTableExpression, DeleteDataExpression, InsertDataExpression, RowFilter,
    SchemaExpression,
};
use mg_core::{ColumnDefinition, ConventionSet, Expression, HistoryConfig, Value};
use mg_db::Database;
use mg_sql::SqlDialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

const VERSION_COLUMN: &str = "Version";
const APPLIED_ON_COLUMN: &str = "AppliedOn";
const DESCRIPTION_COLUMN: &str = "Description";
const DESCRIPTION_LENGTH: usize = 1024;

/// One recorded version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub version: i64,
    pub applied_on: Option<String>,
    pub description: Option<String>,
}

/// The history table in the target database
#[derive(Clone)]
pub struct SchemaHistory {
    schema: Option<String>,
    table: String,
    dialect: Arc<dyn SqlDialect>,
}

impl SchemaHistory {
    pub fn new(config: &HistoryConfig, dialect: Arc<dyn SqlDialect>) -> Self {
        Self {
            schema: config.schema.clone().filter(|s| !s.is_empty()),
            table: config.table.clone(),
            dialect,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    fn qualified_table(&self) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}",
                self.dialect.quote_ident(schema),
                self.dialect.quote_ident(&self.table)
            ),
            None => self.dialect.quote_ident(&self.table),
        }
    }

    fn generate(&self, expression: Expression) -> MigrationResult<Vec<String>> {
        let expression = expression.resolve(&ConventionSet::no_schema_name());
        self.dialect
            .generate(&expression)
            .map_err(|e| MigrationError::History(e.to_string()))
    }

    pub async fn exists(&self, db: &dyn Database) -> MigrationResult<bool> {
        db.table_exists(self.schema(), &self.table)
            .await
            .map_err(|e| MigrationError::History(e.to_string()))
    }

    /// Statements creating whatever part of the history storage is missing
    pub async fn create_statements(&self, db: &dyn Database) -> MigrationResult<Vec<String>> {
        let mut statements = Vec::new();
        if let Some(schema) = &self.schema {
            let schema_exists = db
                .schema_exists(schema)
                .await
                .map_err(|e| MigrationError::History(e.to_string()))?;
            if !schema_exists {
                statements.extend(self.generate(Expression::CreateSchema(SchemaExpression {
                    schema_name: schema.clone(),
                }))?);
            }
        }
        if !self.exists(db).await? {
            let mut table = CreateTableExpression::new(self.table.clone())
                .with_column(ColumnDefinition::int64(VERSION_COLUMN).primary_key())
                .with_column(ColumnDefinition::date_time(APPLIED_ON_COLUMN))
                .with_column(ColumnDefinition::string(
                    DESCRIPTION_COLUMN,
                    DESCRIPTION_LENGTH as u32,
                ));
            table.schema_name = self.schema.clone();
            statements.extend(self.generate(table.into())?);
        }
        Ok(statements)
    }

    /// Create the history table (and schema) when missing
    pub async fn ensure(&self, db: &dyn Database) -> MigrationResult<()> {
        for statement in self.create_statements(db).await? {
            log::debug!("Creating schema history: {}", statement);
            db.execute(&statement)
                .await
                .map_err(|e| MigrationError::History(format!("{}: {}", statement, e)))?;
        }
        Ok(())
    }

    /// Every recorded version with its metadata, ascending
    pub async fn records(&self, db: &dyn Database) -> MigrationResult<Vec<HistoryRecord>> {
        if !self.exists(db).await? {
            return Ok(Vec::new());
        }
        let d = &self.dialect;
        let sql = format!(
            "SELECT {}, {}, {} FROM {} ORDER BY {}",
            d.cast_as_text(&d.quote_ident(VERSION_COLUMN)),
            d.cast_as_text(&d.quote_ident(APPLIED_ON_COLUMN)),
            d.quote_ident(DESCRIPTION_COLUMN),
            self.qualified_table(),
            d.quote_ident(VERSION_COLUMN)
        );
        let rows = db
            .query_rows(&sql)
            .await
            .map_err(|e| MigrationError::History(e.to_string()))?;

        rows.into_iter()
            .map(|row| -> MigrationResult<HistoryRecord> {
                let mut values = row.into_iter();
                let version = values
                    .next()
                    .flatten()
                    .ok_or_else(|| MigrationError::History("history row without a version".into()))?;
                let version = version.trim().parse::<i64>().map_err(|_| {
                    MigrationError::History(format!("invalid version '{}' in history", version))
                })?;
                Ok(HistoryRecord {
                    version,
                    applied_on: values.next().flatten(),
                    description: values.next().flatten(),
                })
            })
            .collect()
    }

    pub async fn applied_versions(&self, db: &dyn Database) -> MigrationResult<BTreeSet<i64>> {
        Ok(self
            .records(db)
            .await?
            .into_iter()
            .map(|r| r.version)
            .collect())
    }

    /// Statements recording a forward migration
    pub fn record_statements(&self, version: i64, description: &str) -> MigrationResult<Vec<String>> {
        let description: String = description.chars().take(DESCRIPTION_LENGTH).collect();
        let mut insert = InsertDataExpression::new(self.table.clone()).row([
            (VERSION_COLUMN, Value::Int(version)),
            (APPLIED_ON_COLUMN, Value::DateTime(Utc::now().trunc_subsecs(6))),
            (DESCRIPTION_COLUMN, Value::Text(description)),
        ]);
        insert.schema_name = self.schema.clone();
        self.generate(insert.into())
    }

    /// Statements removing a reverted migration
    pub fn remove_statements(&self, version: i64) -> MigrationResult<Vec<String>> {
        self.generate(Expression::DeleteData(DeleteDataExpression {
            schema_name: self.schema.clone(),
            table_name: self.table.clone(),
            filter: RowFilter::Where(vec![(VERSION_COLUMN.to_string(), Value::Int(version))]),
        }))
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
