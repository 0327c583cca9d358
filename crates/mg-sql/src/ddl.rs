//! Shared statement builders
//!
//! The builders produce ANSI/PostgreSQL-flavoured SQL through the dialect's
//! quoting, type and literal hooks. Dialects call [`generate_standard`] for
//! the operations they express the standard way and build the rest
//! themselves, usually from the smaller helpers below.

use chrono::{DateTime, Utc};
use mg_core::expression::{
    ColumnExpression, CreateTableExpression, DataRow, DeleteColumnExpression,
    DeleteDataExpression, ForeignKeyExpression, InsertDataExpression, RowFilter,
    UpdateDataExpression,
};
use mg_core::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, Direction, Expression, ExpressionKind,
    ForeignKeyDefinition, IndexDefinition, Value,
};

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

/// Quote an identifier with double quotes, doubling embedded quotes.
pub fn double_quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

/// ANSI literal rendering
pub fn ansi_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => float_literal(*v),
        Value::Text(s) => format!("'{}'", escape_sql_string(s)),
        Value::DateTime(dt) => format!("'{}'", format_timestamp(dt)),
        Value::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
    }
}

/// Literal rendering for dialects without boolean literals
pub(crate) fn numeric_bool_literal(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => ansi_literal(other),
    }
}

fn float_literal(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains('.') && !s.contains('e') {
        format!("{}.0", s)
    } else {
        s
    }
}

/// `name` or `schema.name`, each part quoted
pub fn qualified<D: SqlDialect + ?Sized>(d: &D, schema: Option<&str>, name: &str) -> String {
    match non_empty(schema) {
        Some(schema) => format!("{}.{}", d.quote_ident(schema), d.quote_ident(name)),
        None => d.quote_ident(name),
    }
}

pub fn quote_list<D: SqlDialect + ?Sized>(d: &D, names: &[String]) -> String {
    names
        .iter()
        .map(|n| d.quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A set name; explicit empty names count as absent
pub fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

/// The name, or an error when it is unset or explicitly empty
pub fn require_name<'a>(
    operation: ExpressionKind,
    name: &'a Option<String>,
    what: &str,
) -> SqlResult<&'a str> {
    non_empty(name.as_deref())
        .ok_or_else(|| SqlError::invalid(operation, format!("{} name is required", what)))
}

pub fn column_type_sql<D: SqlDialect + ?Sized>(
    d: &D,
    operation: ExpressionKind,
    column: &ColumnDefinition,
) -> SqlResult<String> {
    column
        .column_type
        .as_ref()
        .map(|ty| d.column_type(ty))
        .ok_or_else(|| {
            SqlError::invalid(operation, format!("column '{}' has no type", column.name))
        })
}

/// Column definition with the dialect's default clause and identity clause
pub fn column_definition<D: SqlDialect + ?Sized>(
    d: &D,
    operation: ExpressionKind,
    column: &ColumnDefinition,
) -> SqlResult<String> {
    let default = column
        .default
        .as_ref()
        .map(|v| format!("DEFAULT {}", d.literal(v)));
    column_definition_with(d, operation, column, default.as_deref(), true)
}

/// Column definition with an explicit default clause (`DEFAULT ...` or
/// anything the dialect needs there)
pub fn column_definition_with<D: SqlDialect + ?Sized>(
    d: &D,
    operation: ExpressionKind,
    column: &ColumnDefinition,
    default_clause: Option<&str>,
    with_identity: bool,
) -> SqlResult<String> {
    let mut parts = vec![
        d.quote_ident(&column.name),
        column_type_sql(d, operation, column)?,
    ];
    if column.identity && with_identity {
        if let Some(identity) = d.identity_clause() {
            parts.push(identity.to_string());
        }
    }
    if let Some(default) = default_clause {
        parts.push(default.to_string());
    }
    if !column.nullable {
        parts.push("NOT NULL".to_string());
    }
    if column.unique && !column.primary_key {
        parts.push("UNIQUE".to_string());
    }
    Ok(parts.join(" "))
}

/// `[CONSTRAINT name] PRIMARY KEY (cols)` or the unique equivalent
pub fn constraint_clause<D: SqlDialect + ?Sized>(
    d: &D,
    kind: ConstraintKind,
    name: Option<&str>,
    columns: &[String],
) -> String {
    let keyword = match kind {
        ConstraintKind::PrimaryKey => "PRIMARY KEY",
        ConstraintKind::Unique => "UNIQUE",
    };
    match non_empty(name).filter(|_| d.named_constraints()) {
        Some(name) => format!(
            "CONSTRAINT {} {} ({})",
            d.quote_ident(name),
            keyword,
            quote_list(d, columns)
        ),
        None => format!("{} ({})", keyword, quote_list(d, columns)),
    }
}

/// Primary key columns of a table and the first explicit constraint name
pub fn primary_key_of(columns: &[ColumnDefinition]) -> (Vec<String>, Option<&str>) {
    let pk: Vec<&ColumnDefinition> = columns.iter().filter(|c| c.primary_key).collect();
    let name = pk.iter().find_map(|c| c.primary_key_name.as_deref());
    (pk.iter().map(|c| c.name.clone()).collect(), name)
}

/// `CREATE TABLE` with a caller-supplied column renderer
pub fn create_table_with<D, F>(
    d: &D,
    e: &CreateTableExpression,
    include_primary_key: bool,
    mut render_column: F,
) -> SqlResult<String>
where
    D: SqlDialect + ?Sized,
    F: FnMut(&ColumnDefinition) -> SqlResult<String>,
{
    if e.columns.is_empty() {
        return Err(SqlError::invalid(
            ExpressionKind::CreateTable,
            format!("table '{}' has no columns", e.table_name),
        ));
    }
    let mut items = e
        .columns
        .iter()
        .map(&mut render_column)
        .collect::<SqlResult<Vec<_>>>()?;

    let (pk_columns, pk_name) = primary_key_of(&e.columns);
    if include_primary_key && !pk_columns.is_empty() {
        items.push(constraint_clause(
            d,
            ConstraintKind::PrimaryKey,
            pk_name,
            &pk_columns,
        ));
    }
    for column in &e.columns {
        if let Some(fk) = column_foreign_key(e.schema_name.as_deref(), &e.table_name, column) {
            items.push(foreign_key_clause(
                d,
                ExpressionKind::CreateTable,
                &fk,
                d.named_constraints(),
            )?);
        }
    }

    Ok(format!(
        "CREATE TABLE {} ({})",
        qualified(d, e.schema_name.as_deref(), &e.table_name),
        items.join(", ")
    ))
}

pub fn create_table<D: SqlDialect + ?Sized>(d: &D, e: &CreateTableExpression) -> SqlResult<String> {
    create_table_with(d, e, true, |c| {
        column_definition(d, ExpressionKind::CreateTable, c)
    })
}

/// `ALTER COLUMN` actions: type, nullability and default
pub fn alter_column_actions<D: SqlDialect + ?Sized>(
    d: &D,
    e: &ColumnExpression,
) -> SqlResult<Vec<String>> {
    let column = &e.column;
    let name = d.quote_ident(&column.name);
    let mut actions = vec![format!(
        "ALTER COLUMN {} TYPE {}",
        name,
        column_type_sql(d, ExpressionKind::AlterColumn, column)?
    )];
    actions.push(if column.nullable {
        format!("ALTER COLUMN {} DROP NOT NULL", name)
    } else {
        format!("ALTER COLUMN {} SET NOT NULL", name)
    });
    actions.push(match &column.default {
        Some(value) => format!("ALTER COLUMN {} SET DEFAULT {}", name, d.literal(value)),
        None => format!("ALTER COLUMN {} DROP DEFAULT", name),
    });
    Ok(actions)
}

pub fn add_constraint<D: SqlDialect + ?Sized>(d: &D, c: &ConstraintDefinition) -> SqlResult<String> {
    if c.columns.is_empty() {
        return Err(SqlError::invalid(
            ExpressionKind::CreateConstraint,
            "constraint has no columns",
        ));
    }
    Ok(format!(
        "ALTER TABLE {} ADD {}",
        qualified(d, c.schema_name.as_deref(), &c.table_name),
        constraint_clause(d, c.kind, c.name.as_deref(), &c.columns)
    ))
}

pub fn drop_constraint<D: SqlDialect + ?Sized>(d: &D, c: &ConstraintDefinition) -> SqlResult<String> {
    let name = require_name(ExpressionKind::DeleteConstraint, &c.name, "constraint")?;
    Ok(format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        qualified(d, c.schema_name.as_deref(), &c.table_name),
        d.quote_ident(name)
    ))
}

/// `[CONSTRAINT name] FOREIGN KEY (cols) REFERENCES table (cols) [rules]`
pub fn foreign_key_clause<D: SqlDialect + ?Sized>(
    d: &D,
    operation: ExpressionKind,
    fk: &ForeignKeyDefinition,
    with_name: bool,
) -> SqlResult<String> {
    if fk.foreign_columns.is_empty() || fk.foreign_columns.len() != fk.primary_columns.len() {
        return Err(SqlError::invalid(
            operation,
            "foreign and primary column lists must be non-empty and of equal length",
        ));
    }
    let constraint = match non_empty(fk.name.as_deref()).filter(|_| with_name) {
        Some(name) => format!("CONSTRAINT {} ", d.quote_ident(name)),
        None => String::new(),
    };
    let mut sql = format!(
        "{}FOREIGN KEY ({}) REFERENCES {} ({})",
        constraint,
        quote_list(d, &fk.foreign_columns),
        qualified(d, fk.primary_table_schema.as_deref(), &fk.primary_table),
        quote_list(d, &fk.primary_columns)
    );
    if let Some(rule) = fk.on_delete.as_sql() {
        sql.push_str(" ON DELETE ");
        sql.push_str(rule);
    }
    if let Some(rule) = fk.on_update.as_sql() {
        sql.push_str(" ON UPDATE ");
        sql.push_str(rule);
    }
    Ok(sql)
}

pub fn add_foreign_key<D: SqlDialect + ?Sized>(d: &D, e: &ForeignKeyExpression) -> SqlResult<String> {
    alter_add_foreign_key(d, ExpressionKind::CreateForeignKey, &e.foreign_key)
}

fn alter_add_foreign_key<D: SqlDialect + ?Sized>(
    d: &D,
    operation: ExpressionKind,
    fk: &ForeignKeyDefinition,
) -> SqlResult<String> {
    Ok(format!(
        "ALTER TABLE {} ADD {}",
        qualified(d, fk.foreign_table_schema.as_deref(), &fk.foreign_table),
        foreign_key_clause(d, operation, fk, true)?
    ))
}

/// A column's own foreign key, with its referencing side taken from the column
pub fn column_foreign_key(
    schema_name: Option<&str>,
    table_name: &str,
    column: &ColumnDefinition,
) -> Option<ForeignKeyDefinition> {
    let mut fk = column.foreign_key.clone()?;
    if fk.foreign_table.is_empty() {
        fk.foreign_table = table_name.to_string();
    }
    if fk.foreign_columns.is_empty() {
        fk.foreign_columns = vec![column.name.clone()];
    }
    if fk.foreign_table_schema.is_none() {
        fk.foreign_table_schema = schema_name.map(str::to_string);
    }
    Some(fk)
}

/// `ALTER TABLE .. ADD .. FOREIGN KEY` for a column added with a reference
pub fn add_column_foreign_key<D: SqlDialect + ?Sized>(
    d: &D,
    e: &ColumnExpression,
) -> SqlResult<Option<String>> {
    column_foreign_key(e.schema_name.as_deref(), &e.table_name, &e.column)
        .map(|fk| alter_add_foreign_key(d, ExpressionKind::CreateColumn, &fk))
        .transpose()
}

pub fn drop_foreign_key<D: SqlDialect + ?Sized>(d: &D, e: &ForeignKeyExpression) -> SqlResult<String> {
    let fk = &e.foreign_key;
    let name = require_name(ExpressionKind::DeleteForeignKey, &fk.name, "foreign key")?;
    Ok(format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        qualified(d, fk.foreign_table_schema.as_deref(), &fk.foreign_table),
        d.quote_ident(name)
    ))
}

pub fn index_columns<D: SqlDialect + ?Sized>(d: &D, index: &IndexDefinition) -> String {
    index
        .columns
        .iter()
        .map(|c| {
            let direction = match c.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            format!("{} {}", d.quote_ident(&c.name), direction)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_index<D: SqlDialect + ?Sized>(d: &D, index: &IndexDefinition) -> SqlResult<String> {
    let name = require_name(ExpressionKind::CreateIndex, &index.name, "index")?;
    if index.columns.is_empty() {
        return Err(SqlError::invalid(
            ExpressionKind::CreateIndex,
            "index has no columns",
        ));
    }
    Ok(format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        d.quote_ident(name),
        qualified(d, index.schema_name.as_deref(), &index.table_name),
        index_columns(d, index)
    ))
}

/// `DROP INDEX [schema.]name`
pub fn drop_index<D: SqlDialect + ?Sized>(d: &D, index: &IndexDefinition) -> SqlResult<String> {
    let name = require_name(ExpressionKind::DeleteIndex, &index.name, "index")?;
    Ok(format!(
        "DROP INDEX {}",
        qualified(d, index.schema_name.as_deref(), name)
    ))
}

/// Unique constraint expressed as a unique index, for dialects that cannot
/// add table constraints after creation
pub fn unique_index_for<D: SqlDialect + ?Sized>(
    d: &D,
    c: &ConstraintDefinition,
    create: bool,
) -> SqlResult<String> {
    let index = IndexDefinition {
        name: c.name.clone(),
        schema_name: c.schema_name.clone(),
        table_name: c.table_name.clone(),
        columns: c
            .columns
            .iter()
            .map(|name| mg_core::IndexColumn::asc(name.clone()))
            .collect(),
        unique: true,
    };
    if create {
        create_index(d, &index).map_err(|_| {
            SqlError::invalid(
                ExpressionKind::CreateConstraint,
                "unique constraint needs a name and at least one column",
            )
        })
    } else {
        drop_index(d, &index).map_err(|_| {
            SqlError::invalid(ExpressionKind::DeleteConstraint, "constraint name is required")
        })
    }
}

fn assignments<D: SqlDialect + ?Sized>(d: &D, row: &DataRow) -> String {
    row.iter()
        .map(|(column, value)| format!("{} = {}", d.quote_ident(column), d.literal(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ` WHERE ...` including the leading space, empty for all rows
pub fn where_clause<D: SqlDialect + ?Sized>(d: &D, filter: &RowFilter) -> String {
    match filter {
        RowFilter::AllRows => String::new(),
        RowFilter::Where(conditions) if conditions.is_empty() => String::new(),
        RowFilter::Where(conditions) => {
            let parts: Vec<String> = conditions
                .iter()
                .map(|(column, value)| match value {
                    Value::Null => format!("{} IS NULL", d.quote_ident(column)),
                    v => format!("{} = {}", d.quote_ident(column), d.literal(v)),
                })
                .collect();
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

pub fn insert_rows<D: SqlDialect + ?Sized>(d: &D, e: &InsertDataExpression) -> SqlResult<Vec<String>> {
    if e.rows.is_empty() {
        return Err(SqlError::invalid(ExpressionKind::InsertData, "no rows to insert"));
    }
    let table = qualified(d, e.schema_name.as_deref(), &e.table_name);
    e.rows
        .iter()
        .map(|row| {
            if row.is_empty() {
                return Err(SqlError::invalid(
                    ExpressionKind::InsertData,
                    "insert row has no values",
                ));
            }
            let columns: Vec<String> = row.iter().map(|(c, _)| d.quote_ident(c)).collect();
            let values: Vec<String> = row.iter().map(|(_, v)| d.literal(v)).collect();
            Ok(format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                values.join(", ")
            ))
        })
        .collect()
}

pub fn update_rows<D: SqlDialect + ?Sized>(d: &D, e: &UpdateDataExpression) -> SqlResult<String> {
    if e.set.is_empty() {
        return Err(SqlError::invalid(ExpressionKind::UpdateData, "no columns to update"));
    }
    Ok(format!(
        "UPDATE {} SET {}{}",
        qualified(d, e.schema_name.as_deref(), &e.table_name),
        assignments(d, &e.set),
        where_clause(d, &e.filter)
    ))
}

pub fn delete_rows<D: SqlDialect + ?Sized>(d: &D, e: &DeleteDataExpression) -> String {
    format!(
        "DELETE FROM {}{}",
        qualified(d, e.schema_name.as_deref(), &e.table_name),
        where_clause(d, &e.filter)
    )
}

fn drop_columns_combined<D: SqlDialect + ?Sized>(d: &D, e: &DeleteColumnExpression) -> SqlResult<String> {
    if e.column_names.is_empty() {
        return Err(SqlError::invalid(ExpressionKind::DeleteColumn, "no column names given"));
    }
    let actions: Vec<String> = e
        .column_names
        .iter()
        .map(|c| format!("DROP COLUMN {}", d.quote_ident(c)))
        .collect();
    Ok(format!(
        "ALTER TABLE {} {}",
        qualified(d, e.schema_name.as_deref(), &e.table_name),
        actions.join(", ")
    ))
}

/// One `ALTER TABLE ... DROP COLUMN` per column
pub fn drop_columns_separately<D: SqlDialect + ?Sized>(
    d: &D,
    e: &DeleteColumnExpression,
) -> SqlResult<Vec<String>> {
    if e.column_names.is_empty() {
        return Err(SqlError::invalid(ExpressionKind::DeleteColumn, "no column names given"));
    }
    let table = qualified(d, e.schema_name.as_deref(), &e.table_name);
    Ok(e.column_names
        .iter()
        .map(|c| format!("ALTER TABLE {} DROP COLUMN {}", table, d.quote_ident(c)))
        .collect())
}

/// Generation shared by every dialect
pub fn generate_standard<D: SqlDialect + ?Sized>(
    d: &D,
    expression: &Expression,
) -> SqlResult<Vec<String>> {
    let sql = match expression {
        Expression::CreateSchema(e) => format!("CREATE SCHEMA {}", d.quote_ident(&e.schema_name)),
        Expression::DeleteSchema(e) => format!("DROP SCHEMA {}", d.quote_ident(&e.schema_name)),
        Expression::CreateTable(e) => create_table(d, e)?,
        Expression::DeleteTable(e) => format!(
            "DROP TABLE {}",
            qualified(d, e.schema_name.as_deref(), &e.table_name)
        ),
        Expression::RenameTable(e) => format!(
            "ALTER TABLE {} RENAME TO {}",
            qualified(d, e.schema_name.as_deref(), &e.old_name),
            d.quote_ident(&e.new_name)
        ),
        Expression::CreateColumn(e) => {
            let mut statements = vec![format!(
                "ALTER TABLE {} ADD COLUMN {}",
                qualified(d, e.schema_name.as_deref(), &e.table_name),
                column_definition(d, ExpressionKind::CreateColumn, &e.column)?
            )];
            if e.column.primary_key {
                statements.push(add_constraint(
                    d,
                    &ConstraintDefinition {
                        kind: ConstraintKind::PrimaryKey,
                        name: e.column.primary_key_name.clone(),
                        schema_name: e.schema_name.clone(),
                        table_name: e.table_name.clone(),
                        columns: vec![e.column.name.clone()],
                    },
                )?);
            }
            statements.extend(add_column_foreign_key(d, e)?);
            return Ok(statements);
        }
        Expression::AlterColumn(e) => format!(
            "ALTER TABLE {} {}",
            qualified(d, e.schema_name.as_deref(), &e.table_name),
            alter_column_actions(d, e)?.join(", ")
        ),
        Expression::DeleteColumn(e) => drop_columns_combined(d, e)?,
        Expression::RenameColumn(e) => format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            qualified(d, e.schema_name.as_deref(), &e.table_name),
            d.quote_ident(&e.old_name),
            d.quote_ident(&e.new_name)
        ),
        Expression::CreateForeignKey(e) => add_foreign_key(d, e)?,
        Expression::DeleteForeignKey(e) => drop_foreign_key(d, e)?,
        Expression::CreateIndex(e) => create_index(d, &e.index)?,
        Expression::DeleteIndex(e) => drop_index(d, &e.index)?,
        Expression::CreateConstraint(e) => add_constraint(d, &e.constraint)?,
        Expression::DeleteConstraint(e) => drop_constraint(d, &e.constraint)?,
        Expression::InsertData(e) => return insert_rows(d, e),
        Expression::UpdateData(e) => update_rows(d, e)?,
        Expression::DeleteData(e) => delete_rows(d, e),
        Expression::ExecuteSql(e) => {
            if e.sql.trim().is_empty() {
                return Err(SqlError::invalid(ExpressionKind::ExecuteSql, "SQL text is blank"));
            }
            e.sql.clone()
        }
        Expression::AutoScript(e) => {
            return Err(SqlError::UnresolvedScript {
                migration_name: e.migration_name.clone(),
            })
        }
        Expression::Guarded(g) => return d.generate(&g.expression),
    };
    Ok(vec![sql])
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
