//! # clinic-storage
//!
//! Storage abstraction layer and entity repository for the clinic console.
//!
//! Backends (`clinic-db-postgres`, `clinic-db-memory`) implement
//! [`ClinicStorage`] and [`Transaction`]. Callers go through
//! [`ClinicRepository`], which owns the write rules:
//!
//! ```ignore
//! use std::sync::Arc;
//! use clinic_storage::ClinicRepository;
//!
//! let repo = ClinicRepository::new(Arc::new(storage));
//! match repo.book_appointment(&appointment).await {
//!     Ok(id) => println!("Appointment booked! Appointment ID: {id}"),
//!     Err(e) if e.is_not_found() => println!("{e}"),
//!     Err(e) => println!("Booking failed: {e}"),
//! }
//! ```

mod error;
mod repository;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use repository::ClinicRepository;
pub use traits::{ClinicStorage, Transaction};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn ClinicStorage>;
