//! Structural sub-models referenced by expressions
//!
//! Names that conventions may fill in are `Option<String>`: `None` means the
//! name was never set, `Some("")` means the author explicitly asked for no
//! name. Conventions only ever fill `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dialect-independent column type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Int16,
    Int32,
    Int64,
    /// Exact numeric with precision and scale
    Decimal { precision: u8, scale: u8 },
    Float,
    Double,
    /// Variable-length string; `None` length means unbounded
    String { length: Option<u32> },
    Date,
    Time,
    DateTime,
    Binary,
    Guid,
    /// Passed through verbatim to every dialect
    Custom(String),
}

/// A literal value used in defaults and data expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// The dialect's current-timestamp function
    CurrentTimestamp,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

/// A column within a table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,

    /// Owning table; set by the enclosing expression constructors
    pub table_name: String,

    /// Required for create and alter operations
    pub column_type: Option<ColumnType>,

    pub nullable: bool,

    pub default: Option<Value>,

    pub primary_key: bool,

    /// Primary key constraint name
    pub primary_key_name: Option<String>,

    pub identity: bool,

    pub unique: bool,

    /// Reference declared on the column itself; the referencing side
    /// defaults to this column and its table
    pub foreign_key: Option<ForeignKeyDefinition>,
}

impl ColumnDefinition {
    /// A nullable column of the given type
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            table_name: String::new(),
            column_type: Some(column_type),
            nullable: true,
            default: None,
            primary_key: false,
            primary_key_name: None,
            identity: false,
            unique: false,
            foreign_key: None,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    pub fn int32(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Int32)
    }

    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Int64)
    }

    pub fn string(name: impl Into<String>, length: u32) -> Self {
        Self::new(
            name,
            ColumnType::String {
                length: Some(length),
            },
        )
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String { length: None })
    }

    pub fn date_time(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::DateTime)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as primary key; primary key columns are never nullable
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark as primary key with an explicit constraint name
    pub fn primary_key_named(self, name: impl Into<String>) -> Self {
        let mut col = self.primary_key();
        col.primary_key_name = Some(name.into());
        col
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Reference `primary_column` of `primary_table` from this column
    pub fn references(
        self,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self {
        let fk = ForeignKeyDefinition::new(
            self.table_name.clone(),
            [self.name.clone()],
            primary_table,
            [primary_column],
        );
        self.with_foreign_key(fk)
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDefinition) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    pub fn in_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        if let Some(fk) = &mut self.foreign_key {
            if fk.foreign_table.is_empty() {
                fk.foreign_table = self.table_name.clone();
            }
        }
        self
    }
}

/// Referential action on delete/update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForeignKeyRule {
    #[default]
    None,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl ForeignKeyRule {
    /// SQL keyword for the rule, `None` when no clause should be emitted
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            ForeignKeyRule::None => None,
            ForeignKeyRule::Cascade => Some("CASCADE"),
            ForeignKeyRule::SetNull => Some("SET NULL"),
            ForeignKeyRule::SetDefault => Some("SET DEFAULT"),
            ForeignKeyRule::Restrict => Some("RESTRICT"),
        }
    }
}

/// Foreign key from `foreign_table` (the referencing side) to `primary_table`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForeignKeyDefinition {
    pub name: Option<String>,
    pub foreign_table_schema: Option<String>,
    pub foreign_table: String,
    pub foreign_columns: Vec<String>,
    pub primary_table_schema: Option<String>,
    pub primary_table: String,
    pub primary_columns: Vec<String>,
    pub on_delete: ForeignKeyRule,
    pub on_update: ForeignKeyRule,
}

impl ForeignKeyDefinition {
    pub fn new<F, P>(
        foreign_table: impl Into<String>,
        foreign_columns: F,
        primary_table: impl Into<String>,
        primary_columns: P,
    ) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            foreign_table: foreign_table.into(),
            foreign_columns: foreign_columns.into_iter().map(Into::into).collect(),
            primary_table: primary_table.into(),
            primary_columns: primary_columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, rule: ForeignKeyRule) -> Self {
        self.on_delete = rule;
        self
    }

    pub fn on_update(mut self, rule: ForeignKeyRule) -> Self {
        self.on_update = rule;
        self
    }
}

/// Sort direction of an index column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    pub name: String,
    pub direction: Direction,
}

impl IndexColumn {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexDefinition {
    pub name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: String,
    pub columns: Vec<IndexColumn>,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn column(mut self, column: IndexColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    pub kind: ConstraintKind,
    pub name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: String,
    pub columns: Vec<String>,
}

impl ConstraintDefinition {
    pub fn new<C>(kind: ConstraintKind, table_name: impl Into<String>, columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            kind,
            name: None,
            schema_name: None,
            table_name: table_name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
