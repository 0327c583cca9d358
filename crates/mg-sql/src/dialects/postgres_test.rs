use super::*;
use mg_core::expression::{
    ColumnExpression, CreateTableExpression, DeleteColumnExpression, ForeignKeyExpression,
    IndexExpression, InsertDataExpression, RenameColumnExpression, RenameTableExpression,
    RowFilter, SchemaExpression, UpdateDataExpression,
};
use mg_core::{
    ColumnDefinition, ConventionSet, ForeignKeyDefinition, ForeignKeyRule, IndexColumn,
    IndexDefinition, Value,
};

fn generate(expr: Expression) -> Vec<String> {
    let d = PostgresDialect::new();
    let sql = d
        .generate(&expr.resolve(&ConventionSet::default()))
        .unwrap();
    for statement in &sql {
        d.parse(statement).unwrap();
    }
    sql
}

#[test]
fn test_create_table_with_identity() {
    let sql = generate(
        CreateTableExpression::new("Users")
            .in_schema("app")
            .with_column(ColumnDefinition::int64("Id").primary_key().identity())
            .with_column(ColumnDefinition::text("Email").not_null().unique())
            .into(),
    );
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE \"app\".\"Users\" (\"Id\" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL, \
             \"Email\" TEXT NOT NULL UNIQUE, CONSTRAINT \"PK_Users\" PRIMARY KEY (\"Id\"))"
        ]
    );
}

#[test]
fn test_alter_column_is_one_statement() {
    let sql = generate(Expression::AlterColumn(ColumnExpression::new(
        "Users",
        ColumnDefinition::string("Name", 50).not_null().with_default("x"),
    )));
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE \"Users\" ALTER COLUMN \"Name\" TYPE VARCHAR(50), \
             ALTER COLUMN \"Name\" SET NOT NULL, ALTER COLUMN \"Name\" SET DEFAULT 'x'"
        ]
    );
}

#[test]
fn test_delete_columns_combined() {
    let sql = generate(Expression::DeleteColumn(DeleteColumnExpression {
        schema_name: None,
        table_name: "Users".to_string(),
        column_names: vec!["A".to_string(), "B".to_string()],
    }));
    assert_eq!(
        sql,
        vec!["ALTER TABLE \"Users\" DROP COLUMN \"A\", DROP COLUMN \"B\""]
    );
}

#[test]
fn test_foreign_key_with_rules() {
    let sql = generate(Expression::CreateForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new("Users", ["GroupId"], "Groups", ["Id"])
            .on_delete(ForeignKeyRule::Cascade)
            .on_update(ForeignKeyRule::SetNull),
    }));
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE \"Users\" ADD CONSTRAINT \"FK_Users_GroupId_Groups_Id\" FOREIGN KEY (\"GroupId\") \
             REFERENCES \"Groups\" (\"Id\") ON DELETE CASCADE ON UPDATE SET NULL"
        ]
    );
}

#[test]
fn test_explicit_empty_foreign_key_name_is_unnamed() {
    let d = PostgresDialect::new();
    let expr = Expression::CreateForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new("Users", ["GroupId"], "Groups", ["Id"]).named(""),
    })
    .resolve(&ConventionSet::default());
    let sql = d.generate(&expr).unwrap();
    assert!(sql[0].starts_with("ALTER TABLE \"Users\" ADD FOREIGN KEY"));

    let drop = Expression::DeleteForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new("Users", Vec::<String>::new(), "", Vec::<String>::new())
            .named(""),
    });
    assert!(matches!(
        d.generate(&drop),
        Err(crate::error::SqlError::InvalidExpression { .. })
    ));
}

#[test]
fn test_drop_index_is_schema_qualified() {
    let mut index = IndexDefinition::new("Bacon")
        .named("IX_Bacon_BaconName")
        .column(IndexColumn::asc("BaconName"));
    index.schema_name = Some("app".to_string());
    let sql = generate(Expression::DeleteIndex(IndexExpression { index }));
    assert_eq!(sql, vec!["DROP INDEX \"app\".\"IX_Bacon_BaconName\""]);
}

#[test]
fn test_renames() {
    let sql = generate(Expression::RenameTable(RenameTableExpression {
        schema_name: None,
        old_name: "Old".to_string(),
        new_name: "New".to_string(),
    }));
    assert_eq!(sql, vec!["ALTER TABLE \"Old\" RENAME TO \"New\""]);

    let sql = generate(Expression::RenameColumn(RenameColumnExpression {
        schema_name: None,
        table_name: "T".to_string(),
        old_name: "a".to_string(),
        new_name: "b".to_string(),
    }));
    assert_eq!(sql, vec!["ALTER TABLE \"T\" RENAME COLUMN \"a\" TO \"b\""]);
}

#[test]
fn test_schema_statements() {
    assert_eq!(
        generate(Expression::CreateSchema(SchemaExpression {
            schema_name: "app".to_string()
        })),
        vec!["CREATE SCHEMA \"app\""]
    );
    assert_eq!(
        generate(Expression::DeleteSchema(SchemaExpression {
            schema_name: "app".to_string()
        })),
        vec!["DROP SCHEMA \"app\""]
    );
}

#[test]
fn test_data_statements() {
    let sql = generate(
        InsertDataExpression::new("Users")
            .row([("Id", Value::from(1)), ("Name", Value::from("Ann"))])
            .row([("Id", Value::from(2)), ("Name", Value::Null)])
            .into(),
    );
    assert_eq!(
        sql,
        vec![
            "INSERT INTO \"Users\" (\"Id\", \"Name\") VALUES (1, 'Ann')",
            "INSERT INTO \"Users\" (\"Id\", \"Name\") VALUES (2, NULL)",
        ]
    );

    let sql = generate(
        UpdateDataExpression {
            schema_name: None,
            table_name: "Users".to_string(),
            set: vec![("Name".to_string(), Value::from("Bob"))],
            filter: RowFilter::Where(vec![("Id".to_string(), Value::from(2))]),
        }
        .into(),
    );
    assert_eq!(
        sql,
        vec!["UPDATE \"Users\" SET \"Name\" = 'Bob' WHERE \"Id\" = 2"]
    );
}

#[test]
fn test_aliases() {
    let d = PostgresDialect::new();
    assert_eq!(d.name(), "Postgres");
    assert_eq!(d.aliases(), &["PostgreSQL"]);
}

#[test]
fn test_column_reference_in_create_table() {
    let sql = generate(
        CreateTableExpression::new("Teste2")
            .with_column(ColumnDefinition::int32("Id").primary_key())
            .with_column(
                ColumnDefinition::int32("Teste1Id")
                    .not_null()
                    .references("Teste1", "Id"),
            )
            .into(),
    );
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE \"Teste2\" (\"Id\" INTEGER NOT NULL, \"Teste1Id\" INTEGER NOT NULL, \
             CONSTRAINT \"PK_Teste2\" PRIMARY KEY (\"Id\"), \
             CONSTRAINT \"FK_Teste2_Teste1Id_Teste1_Id\" FOREIGN KEY (\"Teste1Id\") REFERENCES \"Teste1\" (\"Id\"))"
        ]
    );
}

#[test]
fn test_added_column_reference_follows_the_column() {
    let sql = generate(Expression::CreateColumn(ColumnExpression::new(
        "Orders",
        ColumnDefinition::int64("UserId").references("Users", "Id"),
    )));
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE \"Orders\" ADD COLUMN \"UserId\" BIGINT",
            "ALTER TABLE \"Orders\" ADD CONSTRAINT \"FK_Orders_UserId_Users_Id\" FOREIGN KEY (\"UserId\") \
             REFERENCES \"Users\" (\"Id\")",
        ]
    );
}
