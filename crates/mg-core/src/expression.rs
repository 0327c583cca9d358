//! Dialect-independent change operations
//!
//! An [`Expression`] is one atomic DDL/DML intention. Expressions are plain
//! values: they are built by a migration's producer, resolved against a
//! [`ConventionSet`], validated, then handed to a dialect for SQL generation.

use crate::autoname::ScriptDirection;
use crate::conventions::ConventionSet;
use crate::model::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, ForeignKeyDefinition,
    IndexDefinition, Value,
};
use std::fmt;
use thiserror::Error;

/// Operation tag of an expression, used for dispatch and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    CreateSchema,
    DeleteSchema,
    CreateTable,
    DeleteTable,
    RenameTable,
    CreateColumn,
    AlterColumn,
    DeleteColumn,
    RenameColumn,
    CreateForeignKey,
    DeleteForeignKey,
    CreateIndex,
    DeleteIndex,
    CreateConstraint,
    DeleteConstraint,
    InsertData,
    UpdateData,
    DeleteData,
    ExecuteSql,
    AutoScript,
    Guarded,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionKind::CreateSchema => "CreateSchema",
            ExpressionKind::DeleteSchema => "DeleteSchema",
            ExpressionKind::CreateTable => "CreateTable",
            ExpressionKind::DeleteTable => "DeleteTable",
            ExpressionKind::RenameTable => "RenameTable",
            ExpressionKind::CreateColumn => "CreateColumn",
            ExpressionKind::AlterColumn => "AlterColumn",
            ExpressionKind::DeleteColumn => "DeleteColumn",
            ExpressionKind::RenameColumn => "RenameColumn",
            ExpressionKind::CreateForeignKey => "CreateForeignKey",
            ExpressionKind::DeleteForeignKey => "DeleteForeignKey",
            ExpressionKind::CreateIndex => "CreateIndex",
            ExpressionKind::DeleteIndex => "DeleteIndex",
            ExpressionKind::CreateConstraint => "CreateConstraint",
            ExpressionKind::DeleteConstraint => "DeleteConstraint",
            ExpressionKind::InsertData => "InsertData",
            ExpressionKind::UpdateData => "UpdateData",
            ExpressionKind::DeleteData => "DeleteData",
            ExpressionKind::ExecuteSql => "ExecuteSql",
            ExpressionKind::AutoScript => "AutoScript",
            ExpressionKind::Guarded => "Guarded",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural problem found before execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation}: {message}")]
pub struct ValidationError {
    pub operation: ExpressionKind,
    pub message: String,
}

impl ValidationError {
    fn new(operation: ExpressionKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Create or delete a schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaExpression {
    pub schema_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl CreateTableExpression {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column.in_table(self.table_name.clone()));
        self
    }
}

/// Table-level operation addressed by name only
#[derive(Debug, Clone, PartialEq)]
pub struct TableExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
}

impl TableExpression {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            table_name: table_name.into(),
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameTableExpression {
    pub schema_name: Option<String>,
    pub old_name: String,
    pub new_name: String,
}

/// Create or alter a single column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub column: ColumnDefinition,
}

impl ColumnExpression {
    pub fn new(table_name: impl Into<String>, column: ColumnDefinition) -> Self {
        let table_name = table_name.into();
        Self {
            schema_name: None,
            column: column.in_table(table_name.clone()),
            table_name,
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteColumnExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameColumnExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyExpression {
    pub foreign_key: ForeignKeyDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub index: IndexDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpression {
    pub constraint: ConstraintDefinition,
}

/// Column/value pairs of one row
pub type DataRow = Vec<(String, Value)>;

/// Which rows an update or delete touches
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    AllRows,
    /// Equality on every listed column; `Value::Null` compares with `IS NULL`
    Where(DataRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertDataExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub rows: Vec<DataRow>,
}

impl InsertDataExpression {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            table_name: table_name.into(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.rows.push(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDataExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub set: DataRow,
    pub filter: RowFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDataExpression {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub filter: RowFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteSqlExpression {
    pub sql: String,
}

/// Script-based migration step; `auto_names` is filled by the auto-name
/// convention with candidate resource names, most specific first
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScriptExpression {
    pub version: i64,
    pub migration_name: String,
    pub direction: ScriptDirection,
    pub auto_names: Option<Vec<String>>,
}

impl AutoScriptExpression {
    pub fn new(version: i64, migration_name: impl Into<String>, direction: ScriptDirection) -> Self {
        Self {
            version,
            migration_name: migration_name.into(),
            direction,
            auto_names: None,
        }
    }
}

/// Runtime precondition for a guarded expression
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// Only when the target dialect identity or one of its aliases is listed
    Dialects(Vec<String>),
    TableExists {
        schema_name: Option<String>,
        table_name: String,
    },
    TableMissing {
        schema_name: Option<String>,
        table_name: String,
    },
    ColumnExists {
        schema_name: Option<String>,
        table_name: String,
        column_name: String,
    },
    ColumnMissing {
        schema_name: Option<String>,
        table_name: String,
        column_name: String,
    },
}

impl Guard {
    pub fn dialects<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Guard::Dialects(names.into_iter().map(Into::into).collect())
    }

    pub fn table_exists(table_name: impl Into<String>) -> Self {
        Guard::TableExists {
            schema_name: None,
            table_name: table_name.into(),
        }
    }

    pub fn table_missing(table_name: impl Into<String>) -> Self {
        Guard::TableMissing {
            schema_name: None,
            table_name: table_name.into(),
        }
    }

    pub fn column_exists(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Guard::ColumnExists {
            schema_name: None,
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    pub fn column_missing(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Guard::ColumnMissing {
            schema_name: None,
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    fn schema_slot_mut(&mut self) -> Option<&mut Option<String>> {
        match self {
            Guard::Dialects(_) => None,
            Guard::TableExists { schema_name, .. }
            | Guard::TableMissing { schema_name, .. }
            | Guard::ColumnExists { schema_name, .. }
            | Guard::ColumnMissing { schema_name, .. } => Some(schema_name),
        }
    }

    fn validate(&self, errors: &mut Vec<ValidationError>) {
        let kind = ExpressionKind::Guarded;
        match self {
            Guard::Dialects(names) => {
                if names.iter().all(|n| n.trim().is_empty()) {
                    errors.push(ValidationError::new(kind, "dialect guard lists no dialects"));
                }
            }
            Guard::TableExists { table_name, .. } | Guard::TableMissing { table_name, .. } => {
                require(errors, kind, table_name, "guard table name");
            }
            Guard::ColumnExists {
                table_name,
                column_name,
                ..
            }
            | Guard::ColumnMissing {
                table_name,
                column_name,
                ..
            } => {
                require(errors, kind, table_name, "guard table name");
                require(errors, kind, column_name, "guard column name");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardedExpression {
    pub guard: Guard,
    pub expression: Box<Expression>,
}

/// One atomic schema or data change
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    CreateSchema(SchemaExpression),
    DeleteSchema(SchemaExpression),
    CreateTable(CreateTableExpression),
    DeleteTable(TableExpression),
    RenameTable(RenameTableExpression),
    CreateColumn(ColumnExpression),
    AlterColumn(ColumnExpression),
    DeleteColumn(DeleteColumnExpression),
    RenameColumn(RenameColumnExpression),
    CreateForeignKey(ForeignKeyExpression),
    DeleteForeignKey(ForeignKeyExpression),
    CreateIndex(IndexExpression),
    DeleteIndex(IndexExpression),
    CreateConstraint(ConstraintExpression),
    DeleteConstraint(ConstraintExpression),
    InsertData(InsertDataExpression),
    UpdateData(UpdateDataExpression),
    DeleteData(DeleteDataExpression),
    ExecuteSql(ExecuteSqlExpression),
    AutoScript(AutoScriptExpression),
    Guarded(GuardedExpression),
}

impl Expression {
    /// Operation tag used by dialect dispatch
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::CreateSchema(_) => ExpressionKind::CreateSchema,
            Expression::DeleteSchema(_) => ExpressionKind::DeleteSchema,
            Expression::CreateTable(_) => ExpressionKind::CreateTable,
            Expression::DeleteTable(_) => ExpressionKind::DeleteTable,
            Expression::RenameTable(_) => ExpressionKind::RenameTable,
            Expression::CreateColumn(_) => ExpressionKind::CreateColumn,
            Expression::AlterColumn(_) => ExpressionKind::AlterColumn,
            Expression::DeleteColumn(_) => ExpressionKind::DeleteColumn,
            Expression::RenameColumn(_) => ExpressionKind::RenameColumn,
            Expression::CreateForeignKey(_) => ExpressionKind::CreateForeignKey,
            Expression::DeleteForeignKey(_) => ExpressionKind::DeleteForeignKey,
            Expression::CreateIndex(_) => ExpressionKind::CreateIndex,
            Expression::DeleteIndex(_) => ExpressionKind::DeleteIndex,
            Expression::CreateConstraint(_) => ExpressionKind::CreateConstraint,
            Expression::DeleteConstraint(_) => ExpressionKind::DeleteConstraint,
            Expression::InsertData(_) => ExpressionKind::InsertData,
            Expression::UpdateData(_) => ExpressionKind::UpdateData,
            Expression::DeleteData(_) => ExpressionKind::DeleteData,
            Expression::ExecuteSql(_) => ExpressionKind::ExecuteSql,
            Expression::AutoScript(_) => ExpressionKind::AutoScript,
            Expression::Guarded(_) => ExpressionKind::Guarded,
        }
    }

    /// Apply conventions, filling unset names and schemas
    pub fn resolve(self, conventions: &ConventionSet) -> Expression {
        conventions.apply(self)
    }

    /// Collect structural problems without failing fast
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_into(&mut errors);
        errors
    }

    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        let kind = self.kind();
        match self {
            Expression::CreateSchema(e) | Expression::DeleteSchema(e) => {
                require(errors, kind, &e.schema_name, "schema name");
            }
            Expression::CreateTable(e) => {
                require(errors, kind, &e.table_name, "table name");
                if e.columns.is_empty() {
                    errors.push(ValidationError::new(
                        kind,
                        format!("table '{}' must define at least one column", e.table_name),
                    ));
                }
                for column in &e.columns {
                    validate_column(errors, kind, column);
                }
            }
            Expression::DeleteTable(e) => require(errors, kind, &e.table_name, "table name"),
            Expression::RenameTable(e) => {
                require(errors, kind, &e.old_name, "old table name");
                require(errors, kind, &e.new_name, "new table name");
            }
            Expression::CreateColumn(e) | Expression::AlterColumn(e) => {
                require(errors, kind, &e.table_name, "table name");
                validate_column(errors, kind, &e.column);
            }
            Expression::DeleteColumn(e) => {
                require(errors, kind, &e.table_name, "table name");
                if e.column_names.is_empty() {
                    errors.push(ValidationError::new(kind, "no column names given"));
                }
                for name in &e.column_names {
                    require(errors, kind, name, "column name");
                }
            }
            Expression::RenameColumn(e) => {
                require(errors, kind, &e.table_name, "table name");
                require(errors, kind, &e.old_name, "old column name");
                require(errors, kind, &e.new_name, "new column name");
            }
            Expression::CreateForeignKey(e) => {
                let fk = &e.foreign_key;
                require(errors, kind, &fk.foreign_table, "foreign table name");
                require(errors, kind, &fk.primary_table, "primary table name");
                if fk.foreign_columns.is_empty() || fk.primary_columns.is_empty() {
                    errors.push(ValidationError::new(
                        kind,
                        "foreign and primary columns must not be empty",
                    ));
                } else if fk.foreign_columns.len() != fk.primary_columns.len() {
                    errors.push(ValidationError::new(
                        kind,
                        format!(
                            "foreign column count ({}) does not match primary column count ({})",
                            fk.foreign_columns.len(),
                            fk.primary_columns.len()
                        ),
                    ));
                }
            }
            Expression::DeleteForeignKey(e) => {
                require(errors, kind, &e.foreign_key.foreign_table, "foreign table name");
            }
            Expression::CreateIndex(e) => {
                require(errors, kind, &e.index.table_name, "table name");
                if e.index.columns.is_empty() {
                    errors.push(ValidationError::new(kind, "index must have at least one column"));
                }
                for column in &e.index.columns {
                    require(errors, kind, &column.name, "index column name");
                }
            }
            Expression::DeleteIndex(e) => {
                require(errors, kind, &e.index.table_name, "table name");
            }
            Expression::CreateConstraint(e) => {
                require(errors, kind, &e.constraint.table_name, "table name");
                if e.constraint.columns.is_empty() {
                    errors.push(ValidationError::new(
                        kind,
                        "constraint must have at least one column",
                    ));
                }
            }
            Expression::DeleteConstraint(e) => {
                require(errors, kind, &e.constraint.table_name, "table name");
            }
            Expression::InsertData(e) => {
                require(errors, kind, &e.table_name, "table name");
                if e.rows.is_empty() {
                    errors.push(ValidationError::new(kind, "no rows to insert"));
                }
                if e.rows.iter().any(Vec::is_empty) {
                    errors.push(ValidationError::new(kind, "insert row has no values"));
                }
            }
            Expression::UpdateData(e) => {
                require(errors, kind, &e.table_name, "table name");
                if e.set.is_empty() {
                    errors.push(ValidationError::new(kind, "no columns to update"));
                }
                validate_filter(errors, kind, &e.filter);
            }
            Expression::DeleteData(e) => {
                require(errors, kind, &e.table_name, "table name");
                validate_filter(errors, kind, &e.filter);
            }
            Expression::ExecuteSql(e) => require(errors, kind, &e.sql, "SQL text"),
            Expression::AutoScript(e) => require(errors, kind, &e.migration_name, "migration name"),
            Expression::Guarded(e) => {
                e.guard.validate(errors);
                e.expression.validate_into(errors);
            }
        }
    }

    /// Visit this expression and, for guarded expressions, the wrapped one
    pub fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut Expression)) {
        f(self);
        if let Expression::Guarded(g) = self {
            g.expression.for_each_mut(f);
        }
    }

    /// Schema fields owned directly by this expression (not nested ones)
    pub fn schema_slots_mut(&mut self) -> Vec<&mut Option<String>> {
        match self {
            Expression::CreateSchema(_)
            | Expression::DeleteSchema(_)
            | Expression::ExecuteSql(_)
            | Expression::AutoScript(_) => Vec::new(),
            Expression::CreateTable(e) => {
                let mut slots = vec![&mut e.schema_name];
                slots.extend(referenced_schemas(&mut e.columns));
                slots
            }
            Expression::DeleteTable(e) => vec![&mut e.schema_name],
            Expression::RenameTable(e) => vec![&mut e.schema_name],
            Expression::CreateColumn(e) | Expression::AlterColumn(e) => {
                let mut slots = vec![&mut e.schema_name];
                slots.extend(referenced_schemas(std::slice::from_mut(&mut e.column)));
                slots
            }
            Expression::DeleteColumn(e) => vec![&mut e.schema_name],
            Expression::RenameColumn(e) => vec![&mut e.schema_name],
            Expression::CreateForeignKey(e) | Expression::DeleteForeignKey(e) => vec![
                &mut e.foreign_key.foreign_table_schema,
                &mut e.foreign_key.primary_table_schema,
            ],
            Expression::CreateIndex(e) | Expression::DeleteIndex(e) => {
                vec![&mut e.index.schema_name]
            }
            Expression::CreateConstraint(e) | Expression::DeleteConstraint(e) => {
                vec![&mut e.constraint.schema_name]
            }
            Expression::InsertData(e) => vec![&mut e.schema_name],
            Expression::UpdateData(e) => vec![&mut e.schema_name],
            Expression::DeleteData(e) => vec![&mut e.schema_name],
            Expression::Guarded(e) => e.guard.schema_slot_mut().into_iter().collect(),
        }
    }

    /// Wrap this expression in a runtime guard
    pub fn guarded(self, guard: Guard) -> Expression {
        Expression::Guarded(GuardedExpression {
            guard,
            expression: Box::new(self),
        })
    }

    /// Short human-readable description for log lines
    pub fn describe(&self) -> String {
        let target = match self {
            Expression::CreateSchema(e) | Expression::DeleteSchema(e) => e.schema_name.clone(),
            Expression::CreateTable(e) => e.table_name.clone(),
            Expression::DeleteTable(e) => e.table_name.clone(),
            Expression::RenameTable(e) => format!("{} -> {}", e.old_name, e.new_name),
            Expression::CreateColumn(e) | Expression::AlterColumn(e) => {
                format!("{}.{}", e.table_name, e.column.name)
            }
            Expression::DeleteColumn(e) => {
                format!("{}.{}", e.table_name, e.column_names.join(","))
            }
            Expression::RenameColumn(e) => {
                format!("{}.{} -> {}", e.table_name, e.old_name, e.new_name)
            }
            Expression::CreateForeignKey(e) | Expression::DeleteForeignKey(e) => e
                .foreign_key
                .name
                .clone()
                .unwrap_or_else(|| e.foreign_key.foreign_table.clone()),
            Expression::CreateIndex(e) | Expression::DeleteIndex(e) => e
                .index
                .name
                .clone()
                .unwrap_or_else(|| e.index.table_name.clone()),
            Expression::CreateConstraint(e) | Expression::DeleteConstraint(e) => {
                let kind = match e.constraint.kind {
                    ConstraintKind::PrimaryKey => "primary key",
                    ConstraintKind::Unique => "unique",
                };
                format!("{} on {}", kind, e.constraint.table_name)
            }
            Expression::InsertData(e) => format!("{} ({} rows)", e.table_name, e.rows.len()),
            Expression::UpdateData(e) => e.table_name.clone(),
            Expression::DeleteData(e) => e.table_name.clone(),
            Expression::ExecuteSql(e) => {
                let first_line = e.sql.lines().next().unwrap_or_default();
                first_line.chars().take(60).collect()
            }
            Expression::AutoScript(e) => {
                format!("{} {}_{}", e.direction, e.version, e.migration_name)
            }
            Expression::Guarded(e) => return format!("Guarded({})", e.expression.describe()),
        };
        format!("{} {}", self.kind(), target)
    }
}

fn require(errors: &mut Vec<ValidationError>, kind: ExpressionKind, value: &str, what: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(kind, format!("{} cannot be empty", what)));
    }
}

fn referenced_schemas(columns: &mut [ColumnDefinition]) -> Vec<&mut Option<String>> {
    columns
        .iter_mut()
        .filter_map(|c| c.foreign_key.as_mut())
        .map(|fk| &mut fk.primary_table_schema)
        .collect()
}

fn validate_column(errors: &mut Vec<ValidationError>, kind: ExpressionKind, column: &ColumnDefinition) {
    require(errors, kind, &column.name, "column name");
    if column.column_type.is_none() {
        errors.push(ValidationError::new(
            kind,
            format!("column '{}' has no type", column.name),
        ));
    }
    if column.primary_key && column.nullable {
        errors.push(ValidationError::new(
            kind,
            format!("primary key column '{}' cannot be nullable", column.name),
        ));
    }
    if let Some(fk) = &column.foreign_key {
        require(errors, kind, &fk.primary_table, "referenced table name");
        let referencing = fk.foreign_columns.len().max(1);
        if fk.primary_columns.len() != referencing {
            errors.push(ValidationError::new(
                kind,
                format!(
                    "column '{}' references {} column(s) of '{}', expected {}",
                    column.name,
                    fk.primary_columns.len(),
                    fk.primary_table,
                    referencing
                ),
            ));
        }
    }
}

fn validate_filter(errors: &mut Vec<ValidationError>, kind: ExpressionKind, filter: &RowFilter) {
    if let RowFilter::Where(pairs) = filter {
        if pairs.is_empty() {
            errors.push(ValidationError::new(
                kind,
                "row filter has no conditions; use AllRows instead",
            ));
        }
        for (column, _) in pairs {
            require(errors, kind, column, "filter column name");
        }
    }
}

macro_rules! impl_into_expression {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(e: $ty) -> Self {
                    Expression::$variant(e)
                }
            }
        )*
    };
}

impl_into_expression! {
    CreateTableExpression => CreateTable,
    RenameTableExpression => RenameTable,
    DeleteColumnExpression => DeleteColumn,
    RenameColumnExpression => RenameColumn,
    InsertDataExpression => InsertData,
    UpdateDataExpression => UpdateData,
    DeleteDataExpression => DeleteData,
    ExecuteSqlExpression => ExecuteSql,
    AutoScriptExpression => AutoScript,
    GuardedExpression => Guarded,
}

#[cfg(test)]
#[path = "expression_test.rs"]
mod tests;
