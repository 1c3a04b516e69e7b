//! PostgreSQL transaction wrapper.
//!
//! Every write of the clinic console runs inside one of these. The wrapped
//! sqlx transaction rolls back on drop if neither `commit` nor `rollback`
//! was called.

use async_trait::async_trait;
use sqlx_postgres::{PgConnection, PgTransaction};

use clinic_core::{
    AppointmentUpdate, EntityId, NewAppointment, NewBill, NewDoctor, NewMedicalRecord, NewPatient,
    PatientUpdate, PaymentStatus,
};
use clinic_storage::{StorageError, Transaction};

use crate::queries;

pub struct PostgresTransaction {
    /// `None` once committed or rolled back.
    tx: Option<PgTransaction<'static>>,
}

impl PostgresTransaction {
    pub fn new(tx: PgTransaction<'static>) -> Self {
        Self { tx: Some(tx) }
    }

    fn conn(&mut self) -> Result<&mut PgConnection, StorageError> {
        self.tx.as_deref_mut().ok_or_else(|| {
            StorageError::transaction_error(
                "Transaction already completed (committed or rolled back)",
            )
        })
    }
}

#[async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to commit transaction: {e}"))
            })?;
            tracing::debug!("Transaction committed successfully");
        }
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to rollback transaction: {e}"))
            })?;
            tracing::debug!("Transaction rolled back successfully");
        }
        Ok(())
    }

    async fn patient_exists(&mut self, id: EntityId) -> Result<bool, StorageError> {
        queries::patients::exists(self.conn()?, id).await
    }

    async fn doctor_exists(&mut self, id: EntityId) -> Result<bool, StorageError> {
        queries::doctors::exists(self.conn()?, id).await
    }

    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<EntityId, StorageError> {
        queries::patients::insert(self.conn()?, patient).await
    }

    async fn insert_doctor(&mut self, doctor: &NewDoctor) -> Result<EntityId, StorageError> {
        queries::doctors::insert(self.conn()?, doctor).await
    }

    async fn insert_appointment(
        &mut self,
        appointment: &NewAppointment,
    ) -> Result<EntityId, StorageError> {
        queries::appointments::insert(self.conn()?, appointment).await
    }

    async fn insert_medical_record(
        &mut self,
        record: &NewMedicalRecord,
    ) -> Result<EntityId, StorageError> {
        queries::records::insert(self.conn()?, record).await
    }

    async fn insert_bill(&mut self, bill: &NewBill) -> Result<EntityId, StorageError> {
        queries::billing::insert(self.conn()?, bill).await
    }

    async fn update_patient(
        &mut self,
        id: EntityId,
        update: &PatientUpdate,
    ) -> Result<bool, StorageError> {
        queries::patients::update(self.conn()?, id, update).await
    }

    async fn update_appointment(
        &mut self,
        id: EntityId,
        update: &AppointmentUpdate,
    ) -> Result<bool, StorageError> {
        queries::appointments::update(self.conn()?, id, update).await
    }

    async fn update_bill_status(
        &mut self,
        id: EntityId,
        status: PaymentStatus,
    ) -> Result<bool, StorageError> {
        queries::billing::update_status(self.conn()?, id, status).await
    }
}

impl Drop for PostgresTransaction {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::warn!(
                "PostgresTransaction dropped without explicit commit/rollback - will auto-rollback"
            );
        }
    }
}
