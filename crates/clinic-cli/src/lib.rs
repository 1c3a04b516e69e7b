//! # clinic-cli
//!
//! Interactive console over the clinic repository. The binary (`clinic`)
//! wires configuration, logging and storage together and hands a
//! [`Console`](console::Console) over stdin/stdout to [`menu::run`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod menu;
pub mod observability;
pub mod output;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clinic_db_postgres::{PostgresStorage, mask_password};
use clinic_storage::{DynStorage, StorageError};
use tracing::info;

use crate::config::{BackendKind, StorageSettings};

/// Message for a `.env` that exists but could not be loaded. A missing file is fine.
pub fn env_file_warning(result: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(ref err)) if err.kind() == io::ErrorKind::NotFound => None,
        Err(e) => Some(format!("Warning: Failed to load .env file: {e}")),
    }
}

/// Opens the configured backend. For PostgreSQL this connects and, when
/// enabled, applies pending migrations.
pub async fn open_storage(settings: &StorageSettings) -> Result<DynStorage, StorageError> {
    match settings.backend {
        BackendKind::Memory => {
            info!("Using in-memory storage");
            Ok(clinic_db_memory::create_storage())
        }
        BackendKind::Postgres => {
            let pg = settings.postgres.to_postgres_config();
            info!(url = %mask_password(&pg.url), "Connecting to PostgreSQL");
            Ok(Arc::new(PostgresStorage::new(pg).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_file_is_silent() {
        let missing = dotenvy::Error::Io(io::Error::new(io::ErrorKind::NotFound, "no .env"));
        assert_eq!(env_file_warning(Err(missing)), None);
        assert_eq!(env_file_warning(Ok(PathBuf::from(".env"))), None);
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let bad = dotenvy::Error::LineParse("FOO BAR=baz".into(), 4);
        let warning = env_file_warning(Err(bad)).unwrap();
        assert!(warning.starts_with("Warning: Failed to load .env file"));

        let denied = dotenvy::Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(env_file_warning(Err(denied)).is_some());
    }
}
