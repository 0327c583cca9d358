//! Reading DuckDB rows as text

/// Read a column value as a string, trying common types in order.
///
/// Returns `None` for SQL NULL and for types with no text rendering here.
pub(crate) fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> Option<String> {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return Some(s);
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return Some(n.to_string());
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return Some(f.to_string());
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return Some(b.to_string());
    }
    None
}

/// Escape a value for use inside a single-quoted SQL literal
pub(crate) fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
