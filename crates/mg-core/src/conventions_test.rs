use super::*;
use crate::autoname::ScriptDirection;
use crate::expression::{
    AutoScriptExpression, ColumnExpression, ConstraintExpression, CreateTableExpression,
    ForeignKeyExpression, Guard, IndexExpression, TableExpression,
};
use crate::model::{ColumnDefinition, IndexColumn};

fn create_fk(foreign_cols: &[&str], primary_cols: &[&str]) -> Expression {
    Expression::CreateForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new(
            "Users",
            foreign_cols.iter().copied(),
            "Groups",
            primary_cols.iter().copied(),
        ),
    })
}

fn fk_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::CreateForeignKey(f) | Expression::DeleteForeignKey(f) => {
            f.foreign_key.name.clone()
        }
        _ => None,
    }
}

fn index_of(expr: &Expression) -> Option<String> {
    match expr {
        Expression::CreateIndex(i) | Expression::DeleteIndex(i) => i.index.name.clone(),
        _ => None,
    }
}

#[test]
fn test_primary_key_name_prefixes_table() {
    let mut column = ColumnDefinition::int32("Id").primary_key();
    column.table_name = "Foo".to_string();
    let expr = Expression::CreateColumn(ColumnExpression {
        schema_name: None,
        table_name: "Foo".to_string(),
        column,
    });

    let resolved = expr.resolve(&ConventionSet::no_schema_name());
    let Expression::CreateColumn(c) = resolved else {
        panic!("unexpected variant");
    };
    assert_eq!(c.column.primary_key_name.as_deref(), Some("PK_Foo"));
}

#[test]
fn test_primary_key_name_on_create_table_columns() {
    let expr: Expression = CreateTableExpression::new("Orders")
        .with_column(ColumnDefinition::int64("Id").primary_key())
        .with_column(ColumnDefinition::text("Note"))
        .into();

    let Expression::CreateTable(t) = expr.resolve(&ConventionSet::default()) else {
        panic!("unexpected variant");
    };
    assert_eq!(t.columns[0].primary_key_name.as_deref(), Some("PK_Orders"));
    assert_eq!(t.columns[1].primary_key_name, None);
}

#[test]
fn test_explicit_empty_primary_key_name_is_kept() {
    let expr: Expression = CreateTableExpression::new("Orders")
        .with_column(ColumnDefinition::int64("Id").primary_key_named(""))
        .into();

    let Expression::CreateTable(t) = expr.resolve(&ConventionSet::default()) else {
        panic!("unexpected variant");
    };
    assert_eq!(t.columns[0].primary_key_name.as_deref(), Some(""));
}

#[test]
fn test_foreign_key_name_simple() {
    let resolved = create_fk(&["GroupId"], &["Id"]).resolve(&ConventionSet::no_schema_name());
    assert_eq!(fk_name(&resolved).as_deref(), Some("FK_Users_GroupId_Groups_Id"));
}

#[test]
fn test_foreign_key_name_composite() {
    let resolved = create_fk(&["ColumnA", "ColumnB"], &["ColumnC", "ColumnD"])
        .resolve(&ConventionSet::no_schema_name());
    assert_eq!(
        fk_name(&resolved).as_deref(),
        Some("FK_Users_ColumnA_ColumnB_Groups_ColumnC_ColumnD")
    );
}

#[test]
fn test_index_name_simple() {
    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon").column(IndexColumn::asc("BaconName")),
    });
    let resolved = expr.resolve(&ConventionSet::no_schema_name());
    assert_eq!(index_of(&resolved).as_deref(), Some("IX_Bacon_BaconName"));
}

#[test]
fn test_index_name_ignores_direction() {
    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon")
            .column(IndexColumn::asc("BaconName"))
            .column(IndexColumn::desc("BaconSpice")),
    });
    let resolved = expr.resolve(&ConventionSet::no_schema_name());
    assert_eq!(
        index_of(&resolved).as_deref(),
        Some("IX_Bacon_BaconName_BaconSpice")
    );
}

#[test]
fn test_constraint_names() {
    let pk = Expression::CreateConstraint(ConstraintExpression {
        constraint: ConstraintDefinition::new(ConstraintKind::PrimaryKey, "Users", ["Id"]),
    });
    let uc = Expression::CreateConstraint(ConstraintExpression {
        constraint: ConstraintDefinition::new(ConstraintKind::Unique, "Users", ["Email", "Tenant"]),
    });
    let conventions = ConventionSet::default();

    let Expression::CreateConstraint(pk) = pk.resolve(&conventions) else {
        panic!("unexpected variant");
    };
    let Expression::CreateConstraint(uc) = uc.resolve(&conventions) else {
        panic!("unexpected variant");
    };
    assert_eq!(pk.constraint.name.as_deref(), Some("PK_Users"));
    assert_eq!(uc.constraint.name.as_deref(), Some("UC_Users_Email_Tenant"));
}

#[test]
fn test_explicit_names_are_never_overwritten() {
    let expr = Expression::CreateForeignKey(ForeignKeyExpression {
        foreign_key: ForeignKeyDefinition::new("Users", ["GroupId"], "Groups", ["Id"])
            .named("fk_custom"),
    });
    let resolved = expr.resolve(&ConventionSet::no_schema_name());
    assert_eq!(fk_name(&resolved).as_deref(), Some("fk_custom"));

    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon")
            .named("")
            .column(IndexColumn::asc("BaconName")),
    });
    let resolved = expr.resolve(&ConventionSet::no_schema_name());
    assert_eq!(index_of(&resolved).as_deref(), Some(""));
}

#[test]
fn test_schema_convention_fills_unset_schema_only() {
    let conventions = ConventionSet::new(Some("app".to_string()), None, Vec::new());

    let unset = Expression::DeleteTable(TableExpression::new("Users"));
    let Expression::DeleteTable(t) = unset.resolve(&conventions) else {
        panic!("unexpected variant");
    };
    assert_eq!(t.schema_name.as_deref(), Some("app"));

    let set = Expression::DeleteTable(TableExpression::new("Users").in_schema("audit"));
    let Expression::DeleteTable(t) = set.resolve(&conventions) else {
        panic!("unexpected variant");
    };
    assert_eq!(t.schema_name.as_deref(), Some("audit"));
}

#[test]
fn test_no_default_schema_keeps_connection_default() {
    let expr = Expression::DeleteTable(TableExpression::new("Users"));
    let Expression::DeleteTable(t) = expr.resolve(&ConventionSet::no_schema_name()) else {
        panic!("unexpected variant");
    };
    assert_eq!(t.schema_name, None);
}

#[test]
fn test_conventions_reach_guarded_expressions() {
    let conventions = ConventionSet::new(Some("app".to_string()), None, Vec::new());
    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon").column(IndexColumn::asc("BaconName")),
    })
    .guarded(Guard::table_exists("Bacon"));

    let Expression::Guarded(g) = expr.resolve(&conventions) else {
        panic!("unexpected variant");
    };
    assert_eq!(
        g.guard,
        Guard::TableExists {
            schema_name: Some("app".to_string()),
            table_name: "Bacon".to_string(),
        }
    );
    assert_eq!(index_of(&g.expression).as_deref(), Some("IX_Bacon_BaconName"));
}

#[test]
fn test_resolution_is_idempotent() {
    let conventions = ConventionSet::new(
        Some("app".to_string()),
        Some("SqlServer2016".to_string()),
        vec!["SqlServer".to_string()],
    );
    let expressions = vec![
        create_fk(&["GroupId"], &["Id"]),
        CreateTableExpression::new("Orders")
            .with_column(ColumnDefinition::int64("Id").primary_key())
            .into(),
        Expression::AutoScript(AutoScriptExpression::new(1, "Init", ScriptDirection::Up)),
    ];

    for expr in expressions {
        let once = expr.resolve(&conventions);
        let twice = once.clone().resolve(&conventions);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_custom_convention_override() {
    struct LowerIndexNames;
    impl Convention for LowerIndexNames {
        fn apply(&self, mut expression: Expression) -> Expression {
            if let Expression::CreateIndex(i) = &mut expression {
                if i.index.name.is_none() {
                    i.index.name = Some(index_name(&i.index).to_lowercase());
                }
            }
            expression
        }
    }

    let conventions = ConventionSet::no_schema_name().with_index(LowerIndexNames);
    let expr = Expression::CreateIndex(IndexExpression {
        index: IndexDefinition::new("Bacon").column(IndexColumn::asc("BaconName")),
    });
    let resolved = expr.resolve(&conventions);
    assert_eq!(index_of(&resolved).as_deref(), Some("ix_bacon_baconname"));
}

fn column_fk(expr: &Expression, column: &str) -> Option<ForeignKeyDefinition> {
    let Expression::CreateTable(table) = expr else {
        return None;
    };
    table
        .columns
        .iter()
        .find(|c| c.name == column)
        .and_then(|c| c.foreign_key.clone())
}

#[test]
fn test_column_foreign_key_is_named_like_table_level_ones() {
    let expr = Expression::from(
        CreateTableExpression::new("Teste2")
            .with_column(ColumnDefinition::int32("Id").primary_key())
            .with_column(ColumnDefinition::int32("Teste1Id").references("Teste1", "Id"))
            .with_column(
                ColumnDefinition::int32("OwnerId").with_foreign_key(
                    ForeignKeyDefinition::new("", Vec::<String>::new(), "Owners", ["Id"])
                        .named(""),
                ),
            ),
    );

    let resolved = expr.resolve(&ConventionSet::new(Some("app".into()), None, Vec::new()));
    let fk = column_fk(&resolved, "Teste1Id").unwrap();
    assert_eq!(fk.name.as_deref(), Some("FK_Teste2_Teste1Id_Teste1_Id"));
    assert_eq!(fk.foreign_table_schema.as_deref(), Some("app"));
    assert_eq!(fk.primary_table_schema.as_deref(), Some("app"));

    let explicit = column_fk(&resolved, "OwnerId").unwrap();
    assert_eq!(explicit.name.as_deref(), Some(""));
    assert_eq!(explicit.foreign_table, "Teste2");
    assert_eq!(explicit.foreign_columns, vec!["OwnerId".to_string()]);
    assert_eq!(resolved.clone().resolve(&ConventionSet::no_schema_name()), resolved);
}
