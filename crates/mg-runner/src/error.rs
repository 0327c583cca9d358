//! Error types for mg-runner

use mg_core::CoreError;
use mg_db::DbError;
use mg_sql::SqlError;
use thiserror::Error;

/// Migration run errors
///
/// Errors raised while a migration is being prepared or executed carry its
/// version and name.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Expressions failed validation; nothing was executed (R001)
    #[error("[R001] Validation failed for {} expression(s):\n  {}", .failures.len(), .failures.join("\n  "))]
    Validation { failures: Vec<String> },

    /// Two definitions share a version (R002)
    #[error("[R002] Version {version} is declared by both '{first}' and '{second}'")]
    VersionConflict {
        version: i64,
        first: String,
        second: String,
    },

    /// The dialect cannot express an operation (R003)
    #[error("[R003] Migration {version} '{name}': {source}")]
    UnsupportedOperation {
        version: i64,
        name: String,
        source: SqlError,
    },

    /// SQL generation failed (R004)
    #[error("[R004] Migration {version} '{name}' could not be generated: {source}")]
    Generation {
        version: i64,
        name: String,
        source: SqlError,
    },

    /// A statement failed; the migration was rolled back (R005)
    #[error("[R005] Migration {version} '{name}' failed executing `{statement}`: {source}")]
    Execution {
        version: i64,
        name: String,
        statement: String,
        source: DbError,
    },

    /// No script resource matched any candidate name (R006)
    #[error("[R006] Migration {version} '{name}': no script found, tried {}", .candidates.join(", "))]
    MissingScriptResource {
        version: i64,
        name: String,
        candidates: Vec<String>,
    },

    /// Reverse run of a migration without a down step (R007)
    #[error("[R007] Migration {version} '{name}' cannot be reverted: it has no down step")]
    Irreversible { version: i64, name: String },

    /// A definition derives from a base that was never registered (R008)
    #[error("[R008] '{name}' derives from unknown base '{base}'")]
    UnknownBase { name: String, base: String },

    /// The base chain loops back on itself (R009)
    #[error("[R009] Circular base chain through '{base}'")]
    CircularBase { base: String },

    /// Schema history could not be read or written (R010)
    #[error("[R010] Schema history error: {0}")]
    History(String),

    /// Dialect lookup failed (R011)
    #[error("[R011] {0}")]
    Dialect(#[from] SqlError),

    /// A script could not be loaded or split (R012)
    #[error("[R012] Migration {version} '{name}': {message}")]
    Script {
        version: i64,
        name: String,
        message: String,
    },

    /// History records a version that no loaded migration declares (R013)
    #[error("[R013] Applied version {version} has no matching migration")]
    MissingMigration { version: i64 },

    /// Connection-level failure outside any migration (R014)
    #[error("[R014] Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration error (R015)
    #[error("[R015] {0}")]
    Config(#[from] CoreError),

    /// Opening or finishing a migration's transaction failed (R016)
    #[error("[R016] Migration {version} '{name}' transaction failed: {source}")]
    Transaction {
        version: i64,
        name: String,
        source: DbError,
    },

    /// A guard could not query the database (R017)
    #[error("[R017] Migration {version} '{name}' could not evaluate guard: {source}")]
    GuardCheck {
        version: i64,
        name: String,
        source: DbError,
    },

    /// The migration committed but its history row was not written (R018)
    #[error("[R018] Migration {version} '{name}' committed but not recorded: {source}")]
    HistoryWrite {
        version: i64,
        name: String,
        source: DbError,
    },
}

/// Result type alias for MigrationError
pub type MigrationResult<T> = Result<T, MigrationError>;

impl MigrationError {
    /// Version of the migration the error belongs to, if any
    pub fn version(&self) -> Option<i64> {
        match self {
            MigrationError::VersionConflict { version, .. }
            | MigrationError::UnsupportedOperation { version, .. }
            | MigrationError::Generation { version, .. }
            | MigrationError::Execution { version, .. }
            | MigrationError::MissingScriptResource { version, .. }
            | MigrationError::Irreversible { version, .. }
            | MigrationError::Script { version, .. }
            | MigrationError::Transaction { version, .. }
            | MigrationError::GuardCheck { version, .. }
            | MigrationError::HistoryWrite { version, .. }
            | MigrationError::MissingMigration { version } => Some(*version),
            _ => None,
        }
    }
}
