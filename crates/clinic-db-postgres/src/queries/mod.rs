//! SQL query implementations, one module per table.
//!
//! Reads run on the pool; writes run on the connection of an open
//! transaction. Row mappers convert `TEXT` status columns back into the
//! `clinic-core` enums.

pub mod appointments;
pub mod billing;
pub mod doctors;
pub mod patients;
pub mod records;

use clinic_storage::StorageError;
use sqlx_core::decode::Decode;
use sqlx_core::row::Row;
use sqlx_core::types::Type;
use sqlx_postgres::{PgRow, Postgres};

/// Reads one named column, mapping decode failures to `StorageError::Internal`.
pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StorageError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| StorageError::internal(format!("Failed to decode column {name}: {e}")))
}
