//! Storage traits for the clinic storage abstraction layer.
//!
//! Backends implement two traits: [`ClinicStorage`] for reads and for
//! opening transactions, and [`Transaction`] for every write. Business rules
//! (referential checks, date checks) live in
//! [`ClinicRepository`](crate::ClinicRepository), not in the backends.

use async_trait::async_trait;
use clinic_core::{
    AppointmentDetails, AppointmentUpdate, Bill, BillDetails, Doctor, EntityId,
    MedicalRecordDetails, NewAppointment, NewBill, NewDoctor, NewMedicalRecord, NewPatient,
    Patient, PatientUpdate, PaymentStatus,
};

use crate::error::StorageError;

/// The main storage trait that all clinic storage backends implement.
///
/// Reads return `Ok(None)` (or an empty list) for missing data; errors are
/// reserved for infrastructure failures.
#[async_trait]
pub trait ClinicStorage: Send + Sync {
    // ==================== Transactions ====================

    /// Begins a new transaction. All writes go through a transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if a transaction cannot be started.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError>;

    // ==================== Reads ====================

    async fn get_patient(&self, id: EntityId) -> Result<Option<Patient>, StorageError>;

    /// All patients, ordered by ID.
    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError>;

    async fn get_doctor(&self, id: EntityId) -> Result<Option<Doctor>, StorageError>;

    /// All doctors, ordered by ID.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError>;

    async fn get_appointment(
        &self,
        id: EntityId,
    ) -> Result<Option<AppointmentDetails>, StorageError>;

    /// All appointments, ascending by date, then time, then ID.
    async fn list_appointments(&self) -> Result<Vec<AppointmentDetails>, StorageError>;

    /// Medical records of one patient, most recent visit first.
    async fn list_medical_records(
        &self,
        patient_id: EntityId,
    ) -> Result<Vec<MedicalRecordDetails>, StorageError>;

    async fn get_bill(&self, id: EntityId) -> Result<Option<BillDetails>, StorageError>;

    /// Bills of one patient, most recent first.
    async fn list_bills(&self, patient_id: EntityId) -> Result<Vec<Bill>, StorageError>;

    // ==================== Lifecycle ====================

    /// Releases the underlying connection(s). Further calls may fail.
    async fn close(&self);

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// A transaction for performing atomic writes.
///
/// If an error occurs or `rollback` is called, all operations are undone.
/// Dropping a transaction without committing also rolls it back.
///
/// The `update_*` methods return `Ok(false)` when no row has the given ID.
#[async_trait]
pub trait Transaction: Send {
    /// Commits all operations in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if the commit fails.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Rolls back all operations in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if the rollback fails.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;

    /// Referential check; backends may lock the row until the transaction ends.
    async fn patient_exists(&mut self, id: EntityId) -> Result<bool, StorageError>;

    async fn doctor_exists(&mut self, id: EntityId) -> Result<bool, StorageError>;

    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<EntityId, StorageError>;

    async fn insert_doctor(&mut self, doctor: &NewDoctor) -> Result<EntityId, StorageError>;

    async fn insert_appointment(
        &mut self,
        appointment: &NewAppointment,
    ) -> Result<EntityId, StorageError>;

    async fn insert_medical_record(
        &mut self,
        record: &NewMedicalRecord,
    ) -> Result<EntityId, StorageError>;

    async fn insert_bill(&mut self, bill: &NewBill) -> Result<EntityId, StorageError>;

    async fn update_patient(
        &mut self,
        id: EntityId,
        update: &PatientUpdate,
    ) -> Result<bool, StorageError>;

    async fn update_appointment(
        &mut self,
        id: EntityId,
        update: &AppointmentUpdate,
    ) -> Result<bool, StorageError>;

    async fn update_bill_status(
        &mut self,
        id: EntityId,
        status: PaymentStatus,
    ) -> Result<bool, StorageError>;
}
