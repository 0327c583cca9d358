//! mg-runner - Versioned migration runner for Migrant
//!
//! Loads migration definitions, selects them by tag, orders them by version
//! with maintenance migrations interleaved, and applies or reverts them one
//! transaction at a time while keeping the schema history table current.

pub mod error;
pub mod history;
pub mod loader;
pub mod plan;
pub mod runner;
pub mod state;
pub mod transaction;

pub use error::{MigrationError, MigrationResult};
pub use history::{HistoryRecord, SchemaHistory};
pub use loader::{LoadedMigration, MigrationCatalog, MigrationRegistry, MigrationSource};
pub use plan::{MigrationPlan, PlanStep, RunDirection, RunRequest};
pub use runner::{CancelHandle, MigrationRunner, RunnerOptions};
pub use state::{MigrationInfo, RunReport, RunStatus, RunnerState, StepReport};
pub use transaction::TransactionScope;
