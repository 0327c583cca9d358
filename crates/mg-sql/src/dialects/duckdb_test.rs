use super::*;
use mg_core::expression::{
    ConstraintExpression, DeleteColumnExpression, ForeignKeyExpression, IndexExpression,
};
use mg_core::{ConstraintDefinition, ConventionSet, ForeignKeyDefinition, IndexColumn, IndexDefinition};

fn users_table() -> Expression {
    CreateTableExpression::new("Users")
        .with_column(ColumnDefinition::int32("Id").primary_key().identity())
        .with_column(ColumnDefinition::string("Name", 100).not_null())
        .with_column(ColumnDefinition::boolean("Active").with_default(true))
        .into()
}

#[test]
fn test_identity_uses_sequence() {
    let d = DuckDbDialect::new();
    let expr = users_table().resolve(&ConventionSet::default());
    let sql = d.generate(&expr).unwrap();
    assert_eq!(
        sql,
        vec![
            "CREATE SEQUENCE IF NOT EXISTS \"seq_Users_Id\"".to_string(),
            "CREATE TABLE \"Users\" (\"Id\" INTEGER DEFAULT nextval('seq_Users_Id') NOT NULL, \
             \"Name\" VARCHAR(100) NOT NULL, \"Active\" BOOLEAN DEFAULT TRUE, PRIMARY KEY (\"Id\"))"
                .to_string(),
        ]
    );
    for statement in &sql {
        d.parse(statement).unwrap();
    }
}

#[test]
fn test_identity_sequence_in_schema() {
    let d = DuckDbDialect::new();
    let expr: Expression = CreateTableExpression::new("Orders")
        .in_schema("app")
        .with_column(ColumnDefinition::int64("Id").primary_key().identity())
        .into();
    let sql = d.generate(&expr).unwrap();
    assert_eq!(sql[0], "CREATE SEQUENCE IF NOT EXISTS \"app\".\"seq_Orders_Id\"");
    assert!(sql[1].contains("nextval('app.seq_Orders_Id')"));
}

#[test]
fn test_add_not_null_column_sets_constraint_afterwards() {
    let d = DuckDbDialect::new();
    let expr = Expression::CreateColumn(ColumnExpression::new(
        "Users",
        ColumnDefinition::int32("Age").not_null().with_default(0).unique(),
    ));
    let sql = d.generate(&expr).unwrap();
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE \"Users\" ADD COLUMN \"Age\" INTEGER DEFAULT 0",
            "ALTER TABLE \"Users\" ALTER COLUMN \"Age\" SET NOT NULL",
            "CREATE UNIQUE INDEX \"UC_Users_Age\" ON \"Users\" (\"Age\")",
        ]
    );
}

#[test]
fn test_alter_column_is_split_into_statements() {
    let d = DuckDbDialect::new();
    let expr = Expression::AlterColumn(ColumnExpression::new(
        "Users",
        ColumnDefinition::string("Name", 200),
    ));
    let sql = d.generate(&expr).unwrap();
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE \"Users\" ALTER COLUMN \"Name\" TYPE VARCHAR(200)",
            "ALTER TABLE \"Users\" ALTER COLUMN \"Name\" DROP NOT NULL",
            "ALTER TABLE \"Users\" ALTER COLUMN \"Name\" DROP DEFAULT",
        ]
    );
}

#[test]
fn test_delete_columns_one_statement_each() {
    let d = DuckDbDialect::new();
    let expr = Expression::DeleteColumn(DeleteColumnExpression {
        schema_name: None,
        table_name: "Users".to_string(),
        column_names: vec!["A".to_string(), "B".to_string()],
    });
    assert_eq!(d.generate(&expr).unwrap().len(), 2);
}

#[test]
fn test_foreign_keys_unsupported() {
    let d = DuckDbDialect::new();
    let expr = Expression::CreateForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new("Users", ["GroupId"], "Groups", ["Id"]),
    });
    match d.generate(&expr) {
        Err(SqlError::UnsupportedOperation {
            dialect, operation, ..
        }) => {
            assert_eq!(dialect, "DuckDB");
            assert_eq!(operation, ExpressionKind::CreateForeignKey);
        }
        other => panic!("expected unsupported, got {:?}", other),
    }
}

#[test]
fn test_unique_constraint_becomes_index() {
    let d = DuckDbDialect::new();
    let create = Expression::CreateConstraint(ConstraintExpression {
        constraint: ConstraintDefinition::new(ConstraintKind::Unique, "Users", ["Email"]),
    })
    .resolve(&ConventionSet::default());
    assert_eq!(
        d.generate(&create).unwrap(),
        vec!["CREATE UNIQUE INDEX \"UC_Users_Email\" ON \"Users\" (\"Email\" ASC)"]
    );

    let delete = Expression::DeleteConstraint(ConstraintExpression {
        constraint: ConstraintDefinition::new(ConstraintKind::Unique, "Users", ["Email"])
            .named("UC_Users_Email"),
    });
    assert_eq!(
        d.generate(&delete).unwrap(),
        vec!["DROP INDEX \"UC_Users_Email\""]
    );

    let pk = Expression::CreateConstraint(ConstraintExpression {
        constraint: ConstraintDefinition::new(ConstraintKind::PrimaryKey, "Users", ["Id"]),
    });
    assert!(matches!(
        d.generate(&pk),
        Err(SqlError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_index_round_through_conventions() {
    let d = DuckDbDialect::new();
    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon")
            .column(IndexColumn::asc("BaconName"))
            .column(IndexColumn::desc("BaconSpice")),
    })
    .resolve(&ConventionSet::default());
    let sql = d.generate(&expr).unwrap();
    assert_eq!(
        sql,
        vec!["CREATE INDEX \"IX_Bacon_BaconName_BaconSpice\" ON \"Bacon\" (\"BaconName\" ASC, \"BaconSpice\" DESC)"]
    );
    d.parse(&sql[0]).unwrap();
}

#[test]
fn test_delete_index_without_name_is_invalid() {
    let d = DuckDbDialect::new();
    let expr = Expression::DeleteIndex(IndexExpression {
        index: IndexDefinition::new("Bacon").named(""),
    });
    assert!(matches!(
        d.generate(&expr),
        Err(SqlError::InvalidExpression { .. })
    ));
}

#[test]
fn test_column_reference_declared_at_creation_only() {
    let d = DuckDbDialect::new();
    let table: Expression = CreateTableExpression::new("Orders")
        .with_column(ColumnDefinition::int32("Id").primary_key())
        .with_column(ColumnDefinition::int32("UserId").references("Users", "Id"))
        .into();
    let sql = d.generate(&table.resolve(&ConventionSet::default())).unwrap();
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE \"Orders\" (\"Id\" INTEGER NOT NULL, \"UserId\" INTEGER, PRIMARY KEY (\"Id\"), \
             FOREIGN KEY (\"UserId\") REFERENCES \"Users\" (\"Id\"))"
        ]
    );
    d.parse(&sql[0]).unwrap();

    let added = Expression::CreateColumn(ColumnExpression::new(
        "Orders",
        ColumnDefinition::int32("GroupId").references("Groups", "Id"),
    ));
    assert!(matches!(
        d.generate(&added),
        Err(SqlError::UnsupportedOperation { .. })
    ));
}
