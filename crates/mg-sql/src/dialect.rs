//! SQL dialect abstraction and registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mg_core::{ColumnType, Expression, Value};
use sqlparser::ast::Statement;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use crate::ddl;
use crate::dialects::{
    DuckDbDialect, MySqlDialect, PostgresDialect, SqliteDialect, SqlServerDialect,
};
use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Canonical identity, e.g. `SqlServer2016`
    fn name(&self) -> &'static str;

    /// Alternative identities in registration order, e.g. `SqlServer`
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Check SQL against this dialect's grammar
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let message = e.to_string();
            let (line, column) = error_location(&message);
            SqlError::ParseError {
                message,
                line,
                column,
            }
        })
    }

    /// Quote an identifier for this dialect
    fn quote_ident(&self, ident: &str) -> String {
        ddl::double_quote(ident)
    }

    /// Native type for a column type
    fn column_type(&self, column_type: &ColumnType) -> String;

    /// Literal rendering of a value
    fn literal(&self, value: &Value) -> String {
        ddl::ansi_literal(value)
    }

    /// Inline clause for identity columns; `None` when handled another way
    fn identity_clause(&self) -> Option<&'static str> {
        None
    }

    /// Whether `CONSTRAINT <name>` may prefix table constraints
    fn named_constraints(&self) -> bool {
        true
    }

    /// Cast an arbitrary SQL expression to a short text value
    fn cast_as_text(&self, expr: &str) -> String {
        format!("CAST({} AS VARCHAR(64))", expr)
    }

    /// Line that separates batches in script files, if any
    fn batch_separator(&self) -> Option<&'static str> {
        None
    }

    /// Generate the statements for one resolved expression
    fn generate(&self, expression: &Expression) -> SqlResult<Vec<String>>;
}

/// `(line, column)` from the "Line: N, Column: M" text sqlparser appends to
/// its errors; `(0, 0)` when either part is missing
fn error_location(msg: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = msg.find(label)? + label.len();
        let digits: String = msg[start..].chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    };
    match (number_after("Line: "), number_after("Column: ")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}

/// Flat, case-insensitive map from dialect identity or alias to generator
#[derive(Clone, Default)]
pub struct DialectRegistry {
    by_name: HashMap<String, Arc<dyn SqlDialect>>,
}

impl DialectRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in dialect
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DuckDbDialect::new()));
        registry.register(Arc::new(PostgresDialect::new()));
        registry.register(Arc::new(SqlServerDialect::new()));
        registry.register(Arc::new(MySqlDialect::new()));
        registry.register(Arc::new(SqliteDialect::new()));
        registry
    }

    /// Register a dialect under its identity and every alias
    pub fn register(&mut self, dialect: Arc<dyn SqlDialect>) {
        let keys = std::iter::once(dialect.name()).chain(dialect.aliases().iter().copied());
        for key in keys {
            if let Some(previous) = self
                .by_name
                .insert(key.to_ascii_lowercase(), Arc::clone(&dialect))
            {
                log::debug!(
                    "Dialect key '{}' now maps to {} (was {})",
                    key,
                    dialect.name(),
                    previous.name()
                );
            }
        }
    }

    /// Look up a dialect by identity or alias
    pub fn get(&self, name: &str) -> SqlResult<Arc<dyn SqlDialect>> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| SqlError::UnknownDialect {
                name: name.to_string(),
                known: self.identities().join(", "),
            })
    }

    /// Canonical identities of the registered dialects, sorted
    pub fn identities(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.by_name.values().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("identities", &self.identities())
            .finish()
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
