use super::*;
use crate::dialects::PostgresDialect;
use chrono::TimeZone;
use mg_core::expression::{ExecuteSqlExpression, GuardedExpression};
use mg_core::Guard;

fn pg() -> PostgresDialect {
    PostgresDialect::new()
}

#[test]
fn test_ansi_literals() {
    assert_eq!(ansi_literal(&Value::Null), "NULL");
    assert_eq!(ansi_literal(&Value::Bool(true)), "TRUE");
    assert_eq!(ansi_literal(&Value::Int(-4)), "-4");
    assert_eq!(ansi_literal(&Value::Float(2.0)), "2.0");
    assert_eq!(ansi_literal(&Value::Float(2.5)), "2.5");
    assert_eq!(ansi_literal(&Value::from("it's")), "'it''s'");
    assert_eq!(ansi_literal(&Value::CurrentTimestamp), "CURRENT_TIMESTAMP");

    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    assert_eq!(ansi_literal(&Value::DateTime(ts)), "'2024-03-01 12:30:00'");
}

#[test]
fn test_numeric_bool_literal() {
    assert_eq!(numeric_bool_literal(&Value::Bool(true)), "1");
    assert_eq!(numeric_bool_literal(&Value::Bool(false)), "0");
    assert_eq!(numeric_bool_literal(&Value::Int(7)), "7");
}

#[test]
fn test_qualified_skips_empty_schema() {
    let d = pg();
    assert_eq!(qualified(&d, None, "t"), "\"t\"");
    assert_eq!(qualified(&d, Some(""), "t"), "\"t\"");
    assert_eq!(qualified(&d, Some("s"), "t"), "\"s\".\"t\"");
}

#[test]
fn test_require_name_rejects_unset_and_empty() {
    assert!(require_name(ExpressionKind::DeleteIndex, &None, "index").is_err());
    assert!(require_name(ExpressionKind::DeleteIndex, &Some(String::new()), "index").is_err());
    assert_eq!(
        require_name(ExpressionKind::DeleteIndex, &Some("IX_a".to_string()), "index").unwrap(),
        "IX_a"
    );
}

#[test]
fn test_constraint_clause_omits_empty_name() {
    let d = pg();
    let cols = vec!["Id".to_string()];
    assert_eq!(
        constraint_clause(&d, ConstraintKind::PrimaryKey, Some(""), &cols),
        "PRIMARY KEY (\"Id\")"
    );
    assert_eq!(
        constraint_clause(&d, ConstraintKind::PrimaryKey, Some("PK_T"), &cols),
        "CONSTRAINT \"PK_T\" PRIMARY KEY (\"Id\")"
    );
}

#[test]
fn test_where_clause_null_uses_is_null() {
    let d = pg();
    let filter = RowFilter::Where(vec![
        ("Name".to_string(), Value::from("a")),
        ("Deleted".to_string(), Value::Null),
    ]);
    assert_eq!(
        where_clause(&d, &filter),
        " WHERE \"Name\" = 'a' AND \"Deleted\" IS NULL"
    );
    assert_eq!(where_clause(&d, &RowFilter::AllRows), "");
}

#[test]
fn test_column_without_type_is_invalid() {
    let d = pg();
    let mut column = ColumnDefinition::int32("Age");
    column.column_type = None;
    let err = column_definition(&d, ExpressionKind::CreateColumn, &column).unwrap_err();
    assert!(matches!(err, SqlError::InvalidExpression { .. }));
}

#[test]
fn test_guarded_generates_inner_expression() {
    let d = pg();
    let expr = Expression::Guarded(GuardedExpression {
        guard: Guard::dialects(["Postgres"]),
        expression: Box::new(Expression::ExecuteSql(ExecuteSqlExpression {
            sql: "SELECT 1".to_string(),
        })),
    });
    assert_eq!(generate_standard(&d, &expr).unwrap(), vec!["SELECT 1"]);
}

#[test]
fn test_auto_script_must_be_resolved_first() {
    let d = pg();
    let expr = Expression::AutoScript(mg_core::expression::AutoScriptExpression::new(
        1,
        "Init",
        mg_core::ScriptDirection::Up,
    ));
    assert!(matches!(
        generate_standard(&d, &expr),
        Err(SqlError::UnresolvedScript { .. })
    ));
}

#[test]
fn test_blank_sql_is_invalid() {
    let d = pg();
    let expr = Expression::ExecuteSql(ExecuteSqlExpression {
        sql: "   ".to_string(),
    });
    assert!(generate_standard(&d, &expr).is_err());
}
