//! Error types for groceries
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation, bad args, unknown item)
//! - 4: Operation failed (storage, io, serialization)

use thiserror::Error;

/// Exit codes for the groceries CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for groceries operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Item not found: {0}")]
    TaskNotFound(i64),

    // Operation failures (exit code 4)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid status '{0}' (expected planned|purchased)")]
    InvalidStatus(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::TaskNotFound(_) => exit_codes::USER_ERROR,

            Error::Constraint(_)
            | Error::InvalidStatus(_)
            | Error::Sqlite(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for groceries operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_exit_with_two() {
        assert_eq!(
            Error::validation("item", "is required").exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(Error::TaskNotFound(7).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(
            Error::InvalidConfig("bad".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn storage_errors_exit_with_four() {
        assert_eq!(
            Error::Constraint("NOT NULL".to_string()).exit_code(),
            exit_codes::OPERATION_FAILED
        );
        assert_eq!(
            Error::InvalidStatus("done".to_string()).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn validation_message_names_field() {
        let err = Error::validation("category", "is required");
        assert_eq!(err.to_string(), "category: is required");
        assert_eq!(
            err.details(),
            Some(serde_json::json!({ "field": "category" }))
        );
    }
}
