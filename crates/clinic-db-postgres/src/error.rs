//! Error types for the PostgreSQL storage backend.

use clinic_core::{EntityKind, ValidationError};
use clinic_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// PostgreSQL error code for unique constraint violations (23505).
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for foreign key violations (23503).
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx_core::error::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => StorageError::connection_error(e.to_string()),
            PostgresError::Migration(e) => StorageError::internal(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                StorageError::internal(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

/// Maps a failed statement to a storage error.
///
/// Unique violations on `email` become `AlreadyExists` when `email` is given;
/// foreign key violations name the referenced entity.
pub(crate) fn query_error(
    err: SqlxError,
    entity: EntityKind,
    email: Option<&str>,
) -> StorageError {
    if let Some(email) = email
        && has_pg_error_code(&err, PG_UNIQUE_VIOLATION)
    {
        return StorageError::already_exists(entity, "email", email);
    }
    if has_pg_error_code(&err, PG_FOREIGN_KEY_VIOLATION) {
        return StorageError::invalid_input(format!("{entity} references a missing row: {err}"));
    }
    StorageError::internal(format!("{entity} query failed: {err}"))
}

/// A stored value that no longer parses, e.g. a status outside the CHECK set.
pub(crate) fn decode_error(err: ValidationError) -> StorageError {
    StorageError::internal(format!("Corrupt column value: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgresError::config("invalid URL");
        assert!(err.to_string().contains("Configuration error"));

        let err = PostgresError::Migration("boom".into());
        assert_eq!(err.to_string(), "Migration error: boom");
    }

    #[test]
    fn test_conversion_to_storage_error() {
        let pg_err = PostgresError::config("test error");
        let storage_err: StorageError = pg_err.into();
        assert!(matches!(storage_err, StorageError::Internal { .. }));
    }

    #[test]
    fn test_non_database_error_is_internal() {
        let err = query_error(SqlxError::RowNotFound, EntityKind::Patient, Some("a@b.io"));
        assert!(matches!(err, StorageError::Internal { .. }));
        assert!(!has_pg_error_code(&SqlxError::RowNotFound, PG_UNIQUE_VIOLATION));
    }
}
