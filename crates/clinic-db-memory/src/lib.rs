//! In-memory storage backend for the clinic console.
//!
//! Implements [`ClinicStorage`] over plain ordered maps behind a single
//! async mutex. A transaction works on a private copy of the tables and
//! publishes it on commit, so a failed write never leaves partial rows.
//!
//! # Example
//!
//! ```ignore
//! use clinic_db_memory::create_storage;
//! use clinic_storage::ClinicRepository;
//!
//! let repo = ClinicRepository::new(create_storage());
//! let id = repo.register_patient(&new_patient).await?;
//! ```

pub mod storage;
pub mod transaction;

pub use clinic_storage::{ClinicStorage, DynStorage, StorageError};
pub use storage::InMemoryStorage;
pub use transaction::InMemoryTransaction;

/// Creates a new, empty in-memory storage instance.
pub fn create_storage() -> DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
