//! Convention resolution
//!
//! Conventions fill unset (`None`) names and schemas on expressions. They
//! never touch a field that was set, including one explicitly set to the
//! empty string, so applying a convention twice gives the same result.

use crate::autoname::auto_name_candidates;
use crate::expression::Expression;
use crate::model::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, ForeignKeyDefinition, IndexDefinition,
};
use std::fmt;
use std::sync::Arc;

/// A pure rewrite of one expression
pub trait Convention: Send + Sync {
    fn apply(&self, expression: Expression) -> Expression;
}

/// Fills unset schema slots with a configured default schema
#[derive(Debug, Clone, Default)]
pub struct SchemaConvention {
    pub default_schema: Option<String>,
}

impl Convention for SchemaConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        let Some(schema) = &self.default_schema else {
            return expression;
        };
        expression.for_each_mut(&mut |e| {
            for slot in e.schema_slots_mut() {
                if slot.is_none() {
                    *slot = Some(schema.clone());
                }
            }
        });
        expression
    }
}

/// `PK_{Table}` for primary-key columns without a name
#[derive(Debug, Clone, Default)]
pub struct PrimaryKeyConvention;

impl Convention for PrimaryKeyConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        expression.for_each_mut(&mut |e| match e {
            Expression::CreateTable(table) => {
                for column in &mut table.columns {
                    if column.primary_key && column.primary_key_name.is_none() {
                        let owner = if column.table_name.is_empty() {
                            &table.table_name
                        } else {
                            &column.table_name
                        };
                        column.primary_key_name = Some(primary_key_name(owner));
                    }
                }
            }
            Expression::CreateColumn(c) | Expression::AlterColumn(c) => {
                let column = &mut c.column;
                if column.primary_key && column.primary_key_name.is_none() {
                    let owner = if column.table_name.is_empty() {
                        &c.table_name
                    } else {
                        &column.table_name
                    };
                    column.primary_key_name = Some(primary_key_name(owner));
                }
            }
            _ => {}
        });
        expression
    }
}

/// `FK_{ForeignTable}_{ForeignCols}_{PrimaryTable}_{PrimaryCols}`
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyConvention;

impl Convention for ForeignKeyConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        expression.for_each_mut(&mut |e| match e {
            Expression::CreateForeignKey(f) | Expression::DeleteForeignKey(f) => {
                let fk = &mut f.foreign_key;
                if fk.name.is_none() && !fk.foreign_columns.is_empty() {
                    fk.name = Some(foreign_key_name(fk));
                }
            }
            Expression::CreateTable(table) => {
                for column in &mut table.columns {
                    name_column_foreign_key(column, &table.schema_name, &table.table_name);
                }
            }
            Expression::CreateColumn(c) => {
                name_column_foreign_key(&mut c.column, &c.schema_name, &c.table_name);
            }
            _ => {}
        });
        expression
    }
}

/// Complete the referencing side of a column's own foreign key, then name it
fn name_column_foreign_key(
    column: &mut ColumnDefinition,
    schema_name: &Option<String>,
    table_name: &str,
) {
    let Some(fk) = &mut column.foreign_key else {
        return;
    };
    if fk.foreign_table.is_empty() {
        fk.foreign_table = if column.table_name.is_empty() {
            table_name.to_string()
        } else {
            column.table_name.clone()
        };
    }
    if fk.foreign_columns.is_empty() {
        fk.foreign_columns = vec![column.name.clone()];
    }
    if fk.foreign_table_schema.is_none() {
        fk.foreign_table_schema = schema_name.clone();
    }
    if fk.name.is_none() {
        fk.name = Some(foreign_key_name(fk));
    }
}

/// `IX_{Table}_{Cols}`
#[derive(Debug, Clone, Default)]
pub struct IndexConvention;

impl Convention for IndexConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        expression.for_each_mut(&mut |e| {
            if let Expression::CreateIndex(i) | Expression::DeleteIndex(i) = e {
                if i.index.name.is_none() && !i.index.columns.is_empty() {
                    i.index.name = Some(index_name(&i.index));
                }
            }
        });
        expression
    }
}

/// `PK_{Table}` for primary-key constraints, `UC_{Table}_{Cols}` for unique ones
#[derive(Debug, Clone, Default)]
pub struct ConstraintConvention;

impl Convention for ConstraintConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        expression.for_each_mut(&mut |e| {
            if let Expression::CreateConstraint(c) | Expression::DeleteConstraint(c) = e {
                let constraint = &mut c.constraint;
                if constraint.name.is_none()
                    && (constraint.kind == ConstraintKind::PrimaryKey
                        || !constraint.columns.is_empty())
                {
                    constraint.name = Some(constraint_name(constraint));
                }
            }
        });
        expression
    }
}

/// Fills candidate script names on auto-script expressions
#[derive(Debug, Clone, Default)]
pub struct AutoNameConvention {
    /// Canonical identity of the target dialect, if any
    pub dialect: Option<String>,
    pub aliases: Vec<String>,
}

impl Convention for AutoNameConvention {
    fn apply(&self, mut expression: Expression) -> Expression {
        expression.for_each_mut(&mut |e| {
            if let Expression::AutoScript(a) = e {
                if a.auto_names.is_none() {
                    a.auto_names = Some(auto_name_candidates(
                        a.direction,
                        a.version,
                        &a.migration_name,
                        self.dialect.as_deref(),
                        &self.aliases,
                    ));
                }
            }
        });
        expression
    }
}

pub fn primary_key_name(table: &str) -> String {
    format!("PK_{}", table)
}

pub fn foreign_key_name(fk: &ForeignKeyDefinition) -> String {
    let mut parts = vec!["FK".to_string(), fk.foreign_table.clone()];
    parts.extend(fk.foreign_columns.iter().cloned());
    parts.push(fk.primary_table.clone());
    parts.extend(fk.primary_columns.iter().cloned());
    parts.join("_")
}

/// Column directions are not part of the name
pub fn index_name(index: &IndexDefinition) -> String {
    let mut parts = vec!["IX".to_string(), index.table_name.clone()];
    parts.extend(index.columns.iter().map(|c| c.name.clone()));
    parts.join("_")
}

pub fn constraint_name(constraint: &ConstraintDefinition) -> String {
    match constraint.kind {
        ConstraintKind::PrimaryKey => primary_key_name(&constraint.table_name),
        ConstraintKind::Unique => {
            let mut parts = vec!["UC".to_string(), constraint.table_name.clone()];
            parts.extend(constraint.columns.iter().cloned());
            parts.join("_")
        }
    }
}

/// The ordered set of conventions applied to every expression
#[derive(Clone)]
pub struct ConventionSet {
    pub schema: Arc<dyn Convention>,
    pub primary_key: Arc<dyn Convention>,
    pub foreign_key: Arc<dyn Convention>,
    pub index: Arc<dyn Convention>,
    pub constraint: Arc<dyn Convention>,
    pub auto_name: Arc<dyn Convention>,
}

impl ConventionSet {
    /// Default conventions for a target dialect identity and its aliases
    pub fn new(default_schema: Option<String>, dialect: Option<String>, aliases: Vec<String>) -> Self {
        Self {
            schema: Arc::new(SchemaConvention { default_schema }),
            primary_key: Arc::new(PrimaryKeyConvention),
            foreign_key: Arc::new(ForeignKeyConvention),
            index: Arc::new(IndexConvention),
            constraint: Arc::new(ConstraintConvention),
            auto_name: Arc::new(AutoNameConvention { dialect, aliases }),
        }
    }

    /// Default conventions without a default schema or target dialect
    pub fn no_schema_name() -> Self {
        Self::new(None, None, Vec::new())
    }

    pub fn with_schema(mut self, convention: impl Convention + 'static) -> Self {
        self.schema = Arc::new(convention);
        self
    }

    pub fn with_primary_key(mut self, convention: impl Convention + 'static) -> Self {
        self.primary_key = Arc::new(convention);
        self
    }

    pub fn with_foreign_key(mut self, convention: impl Convention + 'static) -> Self {
        self.foreign_key = Arc::new(convention);
        self
    }

    pub fn with_index(mut self, convention: impl Convention + 'static) -> Self {
        self.index = Arc::new(convention);
        self
    }

    pub fn with_constraint(mut self, convention: impl Convention + 'static) -> Self {
        self.constraint = Arc::new(convention);
        self
    }

    pub fn with_auto_name(mut self, convention: impl Convention + 'static) -> Self {
        self.auto_name = Arc::new(convention);
        self
    }

    /// Apply every convention in order
    pub fn apply(&self, expression: Expression) -> Expression {
        [
            &self.schema,
            &self.primary_key,
            &self.foreign_key,
            &self.index,
            &self.constraint,
            &self.auto_name,
        ]
        .into_iter()
        .fold(expression, |e, convention| convention.apply(e))
    }
}

impl Default for ConventionSet {
    fn default() -> Self {
        Self::no_schema_name()
    }
}

impl fmt::Debug for ConventionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConventionSet").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "conventions_test.rs"]
mod tests;
