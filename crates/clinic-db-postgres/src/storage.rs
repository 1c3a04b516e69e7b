//! PostgreSQL implementation of the `ClinicStorage` trait.

use async_trait::async_trait;
use sqlx_postgres::PgPool;
use tracing::{debug, info};

use clinic_core::{
    AppointmentDetails, Bill, BillDetails, Doctor, EntityId, MedicalRecordDetails, Patient,
};
use clinic_storage::{ClinicStorage, StorageError, Transaction};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries;
use crate::transaction::PostgresTransaction;

/// PostgreSQL storage backend for the clinic tables.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects, verifies the connection, and creates the schema if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        info!("PostgreSQL storage ready");
        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are not run.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClinicStorage for PostgresStorage {
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError> {
        let tx = self.pool.begin().await.map_err(|e| {
            StorageError::transaction_error(format!("Failed to begin transaction: {e}"))
        })?;
        debug!("Began PostgreSQL transaction");
        Ok(Box::new(PostgresTransaction::new(tx)))
    }

    async fn get_patient(&self, id: EntityId) -> Result<Option<Patient>, StorageError> {
        queries::patients::get(&self.pool, id).await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError> {
        queries::patients::list(&self.pool).await
    }

    async fn get_doctor(&self, id: EntityId) -> Result<Option<Doctor>, StorageError> {
        queries::doctors::get(&self.pool, id).await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
        queries::doctors::list(&self.pool).await
    }

    async fn get_appointment(
        &self,
        id: EntityId,
    ) -> Result<Option<AppointmentDetails>, StorageError> {
        queries::appointments::get(&self.pool, id).await
    }

    async fn list_appointments(&self) -> Result<Vec<AppointmentDetails>, StorageError> {
        queries::appointments::list(&self.pool).await
    }

    async fn list_medical_records(
        &self,
        patient_id: EntityId,
    ) -> Result<Vec<MedicalRecordDetails>, StorageError> {
        queries::records::list_for_patient(&self.pool, patient_id).await
    }

    async fn get_bill(&self, id: EntityId) -> Result<Option<BillDetails>, StorageError> {
        queries::billing::get(&self.pool, id).await
    }

    async fn list_bills(&self, patient_id: EntityId) -> Result<Vec<Bill>, StorageError> {
        queries::billing::list_for_patient(&self.pool, patient_id).await
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("PostgreSQL pool closed");
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
