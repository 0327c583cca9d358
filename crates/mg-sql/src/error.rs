//! Error types for mg-sql

use mg_core::ExpressionKind;
use thiserror::Error;

/// SQL generation and parsing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// No dialect registered under the name (S002)
    #[error("[S002] Unknown dialect '{name}'. Known dialects: {known}")]
    UnknownDialect { name: String, known: String },

    /// The dialect cannot express the operation (S003)
    #[error("[S003] {dialect} does not support {operation}: {reason}")]
    UnsupportedOperation {
        dialect: String,
        operation: ExpressionKind,
        reason: String,
    },

    /// The expression lacks something generation needs (S004)
    #[error("[S004] Cannot generate {operation}: {message}")]
    InvalidExpression {
        operation: ExpressionKind,
        message: String,
    },

    /// Script text could not be tokenized (S005)
    #[error("[S005] Failed to tokenize script: {0}")]
    Tokenize(String),

    /// Auto-script expressions are resolved to script text by the runner (S006)
    #[error("[S006] Auto-script for '{migration_name}' must be resolved to a script before generation")]
    UnresolvedScript { migration_name: String },
}

impl SqlError {
    pub(crate) fn unsupported(
        dialect: &str,
        operation: ExpressionKind,
        reason: impl Into<String>,
    ) -> Self {
        SqlError::UnsupportedOperation {
            dialect: dialect.to_string(),
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(operation: ExpressionKind, message: impl Into<String>) -> Self {
        SqlError::InvalidExpression {
            operation,
            message: message.into(),
        }
    }
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
