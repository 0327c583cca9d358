//! mg-core - Core library for Migrant
//!
//! This crate provides the dialect-independent expression model, the
//! convention engine that fills in generated names, tag-based migration
//! selection, auto-script naming, migration definitions and configuration
//! parsing shared by the other Migrant crates.

pub mod autoname;
pub mod config;
pub mod conventions;
pub mod error;
pub mod expression;
pub mod migration;
pub mod model;
pub mod tags;

pub use autoname::{
    auto_name_candidates, DirectoryScripts, InMemoryScripts, ScriptDirection, ScriptProvider,
    ScriptResource,
};
pub use config::{Config, DatabaseConfig, HistoryConfig};
pub use conventions::{Convention, ConventionSet};
pub use error::{CoreError, CoreResult};
pub use expression::{Expression, ExpressionKind, Guard, ValidationError};
pub use migration::{
    MaintenanceStage, MigrationBase, MigrationContext, MigrationDefinition, Producer,
    TransactionBehavior,
};
pub use model::{
    ColumnDefinition, ColumnType, ConstraintDefinition, ConstraintKind, Direction,
    ForeignKeyDefinition, ForeignKeyRule, IndexColumn, IndexDefinition, Value,
};
pub use tags::{has_tags, is_selected, matches_tags, MatchBehavior, TagGroup};
