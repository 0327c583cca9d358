use super::*;
use crate::dialects::{DuckDbDialect, PostgresDialect, SqlServerDialect};

#[test]
fn test_split_on_semicolons() {
    let d = DuckDbDialect::new();
    let statements = split_statements(
        &d,
        "CREATE TABLE a (x INT);\nINSERT INTO a VALUES (1);\n",
    )
    .unwrap();
    assert_eq!(
        statements,
        vec!["CREATE TABLE a (x INT)", "INSERT INTO a VALUES (1)"]
    );
}

#[test]
fn test_semicolons_in_strings_and_comments() {
    let d = PostgresDialect::new();
    let statements = split_statements(
        &d,
        "INSERT INTO t VALUES ('a;b'); /* x; y */ SELECT 1",
    )
    .unwrap();
    assert_eq!(
        statements,
        vec!["INSERT INTO t VALUES ('a;b')", "/* x; y */ SELECT 1"]
    );
}

#[test]
fn test_comment_only_pieces_dropped() {
    let d = DuckDbDialect::new();
    let statements =
        split_statements(&d, "SELECT 1;\n-- nothing here\n;\n;SELECT 2;").unwrap();
    assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_multibyte_text() {
    let d = DuckDbDialect::new();
    let statements = split_statements(&d, "SELECT 'é';SELECT 2").unwrap();
    assert_eq!(statements, vec!["SELECT 'é'", "SELECT 2"]);
}

#[test]
fn test_empty_script() {
    let d = DuckDbDialect::new();
    assert!(split_statements(&d, "").unwrap().is_empty());
    assert!(split_statements(&d, "  \n-- just a comment\n").unwrap().is_empty());
}

#[test]
fn test_unterminated_string_fails() {
    let d = DuckDbDialect::new();
    assert!(matches!(
        split_statements(&d, "SELECT 'abc"),
        Err(SqlError::Tokenize(_))
    ));
}

#[test]
fn test_batch_separator_lines() {
    let d = SqlServerDialect::new();
    let statements = split_statements(
        &d,
        "CREATE TABLE a (x INT);\nGO\nINSERT INTO a VALUES (1);\n  go  \n\nGO\n",
    )
    .unwrap();
    assert_eq!(
        statements,
        vec!["CREATE TABLE a (x INT);", "INSERT INTO a VALUES (1);"]
    );
}

#[test]
fn test_go_inside_a_line_is_not_a_separator() {
    let d = SqlServerDialect::new();
    let statements = split_statements(&d, "SELECT 'GO'\nGO").unwrap();
    assert_eq!(statements, vec!["SELECT 'GO'"]);
}
