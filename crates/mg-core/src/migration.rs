//! Migration definitions and the builder context their producers write into

use crate::autoname::ScriptDirection;
use crate::expression::{
    AutoScriptExpression, ExecuteSqlExpression, Expression, TableExpression,
};
use crate::tags::TagGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Whether a migration runs inside its own transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionBehavior {
    #[default]
    Default,
    /// Statements run without an enclosing transaction
    None,
}

/// When a maintenance migration runs relative to regular migrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStage {
    /// A regular, versioned migration
    #[default]
    None,
    BeforeAll,
    BeforeEach,
    AfterEach,
    AfterAll,
}

/// Collects the expressions produced by one direction of a migration
#[derive(Debug)]
pub struct MigrationContext {
    pub version: i64,
    pub name: String,
    expressions: Vec<Expression>,
}

impl MigrationContext {
    pub fn new(version: i64, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            expressions: Vec::new(),
        }
    }

    /// Append an expression; order is execution order
    pub fn add(&mut self, expression: impl Into<Expression>) -> &mut Self {
        self.expressions.push(expression.into());
        self
    }

    pub fn execute_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        self.add(ExecuteSqlExpression { sql: sql.into() })
    }

    pub fn delete_table(&mut self, table_name: impl Into<String>) -> &mut Self {
        self.add(Expression::DeleteTable(TableExpression::new(table_name)))
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn into_expressions(self) -> Vec<Expression> {
        self.expressions
    }
}

/// Appends expressions for one direction of a migration
pub type Producer = Arc<dyn Fn(&mut MigrationContext) + Send + Sync>;

/// A named tag carrier that migrations may derive from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBase {
    pub name: String,
    pub parent: Option<String>,
    pub tags: Vec<TagGroup>,
}

impl MigrationBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            tags: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_tags(mut self, group: TagGroup) -> Self {
        self.tags.push(group);
        self
    }
}

/// An immutable, versioned migration
#[derive(Clone)]
pub struct MigrationDefinition {
    pub version: i64,
    pub name: String,
    pub description: Option<String>,
    pub transaction_behavior: TransactionBehavior,
    pub maintenance_stage: MaintenanceStage,
    /// Own tag groups; inherited groups come from `base`
    pub tags: Vec<TagGroup>,
    /// Free-form key/value metadata, reported but never interpreted
    pub traits: BTreeMap<String, String>,
    pub base: Option<String>,
    up: Producer,
    down: Option<Producer>,
}

impl MigrationDefinition {
    /// A migration whose up producer is `up` and which has no down producer yet
    pub fn new<F>(version: i64, name: impl Into<String>, up: F) -> Self
    where
        F: Fn(&mut MigrationContext) + Send + Sync + 'static,
    {
        Self {
            version,
            name: name.into(),
            description: None,
            transaction_behavior: TransactionBehavior::Default,
            maintenance_stage: MaintenanceStage::None,
            tags: Vec::new(),
            traits: BTreeMap::new(),
            base: None,
            up: Arc::new(up),
            down: None,
        }
    }

    /// A migration whose up and down steps are both external scripts
    pub fn auto_script(version: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        let up_name = name.clone();
        let down_name = name.clone();
        Self::new(version, name, move |ctx| {
            ctx.add(AutoScriptExpression::new(
                version,
                up_name.clone(),
                ScriptDirection::Up,
            ));
        })
        .down(move |ctx| {
            ctx.add(AutoScriptExpression::new(
                version,
                down_name.clone(),
                ScriptDirection::Down,
            ));
        })
    }

    pub fn down<F>(mut self, down: F) -> Self
    where
        F: Fn(&mut MigrationContext) + Send + Sync + 'static,
    {
        self.down = Some(Arc::new(down));
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, group: TagGroup) -> Self {
        self.tags.push(group);
        self
    }

    /// Attach a trait; a repeated key keeps the last value
    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.insert(key.into(), value.into());
        self
    }

    pub fn trait_value(&self, key: &str) -> Option<&str> {
        self.traits.get(key).map(String::as_str)
    }

    pub fn with_transaction(mut self, behavior: TransactionBehavior) -> Self {
        self.transaction_behavior = behavior;
        self
    }

    /// Turn this into a maintenance migration for the given stage
    pub fn maintenance(mut self, stage: MaintenanceStage) -> Self {
        self.maintenance_stage = stage;
        self
    }

    pub fn derived_from(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn is_maintenance(&self) -> bool {
        self.maintenance_stage != MaintenanceStage::None
    }

    pub fn is_reversible(&self) -> bool {
        self.down.is_some()
    }

    /// Run the up producer against a fresh context
    pub fn up_expressions(&self) -> Vec<Expression> {
        let mut ctx = MigrationContext::new(self.version, self.name.clone());
        (self.up)(&mut ctx);
        ctx.into_expressions()
    }

    /// Run the down producer, `None` when the migration is irreversible
    pub fn down_expressions(&self) -> Option<Vec<Expression>> {
        let down = self.down.as_ref()?;
        let mut ctx = MigrationContext::new(self.version, self.name.clone());
        down(&mut ctx);
        Some(ctx.into_expressions())
    }

    /// Text stored in the history table
    pub fn history_description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Debug for MigrationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationDefinition")
            .field("version", &self.version)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("transaction_behavior", &self.transaction_behavior)
            .field("maintenance_stage", &self.maintenance_stage)
            .field("tags", &self.tags)
            .field("traits", &self.traits)
            .field("base", &self.base)
            .field("reversible", &self.is_reversible())
            .finish()
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
