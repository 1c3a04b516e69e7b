//! Entity repository enforcing the clinic's write rules.
//!
//! `ClinicRepository` wraps any [`ClinicStorage`](crate::ClinicStorage) backend and adds:
//! - validation of submitted payloads
//! - referential checks on patient/doctor IDs inside the write transaction
//! - the "no appointments in the past" rule
//! - commit on success, rollback on every failure path
//!
//! # Example
//!
//! ```ignore
//! use clinic_storage::ClinicRepository;
//!
//! let repo = ClinicRepository::new(storage);
//! let id = repo.book_appointment(&new_appointment).await?;
//! repo.update_appointment(id, AppointmentUpdate::Cancel).await?;
//! ```

use chrono::{Local, NaiveDate};
use clinic_core::{
    AppointmentDetails, AppointmentUpdate, Bill, BillDetails, Doctor, EntityId, EntityKind,
    MedicalRecordDetails, NewAppointment, NewBill, NewDoctor, NewMedicalRecord, NewPatient,
    Patient, PatientUpdate, PaymentStatus, validation,
};
use tracing::{debug, info, instrument, warn};

use crate::DynStorage;
use crate::error::StorageError;
use crate::traits::Transaction;

type Result<T> = std::result::Result<T, StorageError>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Create/read/update operations for every clinic entity.
pub struct ClinicRepository {
    storage: DynStorage,
    today: fn() -> NaiveDate,
}

impl ClinicRepository {
    pub fn new(storage: DynStorage) -> Self {
        Self {
            storage,
            today: local_today,
        }
    }

    /// Replaces the clock used for the past-date rule.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Releases the data-store handle.
    pub async fn close(&self) {
        info!(backend = self.storage.backend_name(), "Closing storage");
        self.storage.close().await;
    }

    // ==================== Patients ====================

    #[instrument(skip_all, fields(email = %patient.email))]
    pub async fn register_patient(&self, patient: &NewPatient) -> Result<EntityId> {
        patient.validate()?;
        let mut tx = self.storage.begin_transaction().await?;
        let result = tx.insert_patient(patient).await;
        let id = finish(tx, result).await?;
        info!(patient_id = id, "Patient registered");
        Ok(id)
    }

    pub async fn patient(&self, id: EntityId) -> Result<Patient> {
        self.storage
            .get_patient(id)
            .await?
            .ok_or_else(|| StorageError::not_found(EntityKind::Patient, id))
    }

    pub async fn patients(&self) -> Result<Vec<Patient>> {
        self.storage.list_patients().await
    }

    #[instrument(skip(self, update), fields(field = update.field_name()))]
    pub async fn update_patient(&self, id: EntityId, update: &PatientUpdate) -> Result<()> {
        update.validate()?;
        let mut tx = self.storage.begin_transaction().await?;
        let result = tx.update_patient(id, update).await;
        let updated = finish(tx, result).await?;
        found_or(updated, EntityKind::Patient, id)
    }

    // ==================== Doctors ====================

    #[instrument(skip_all, fields(email = %doctor.email))]
    pub async fn register_doctor(&self, doctor: &NewDoctor) -> Result<EntityId> {
        doctor.validate()?;
        let mut tx = self.storage.begin_transaction().await?;
        let result = tx.insert_doctor(doctor).await;
        let id = finish(tx, result).await?;
        info!(doctor_id = id, "Doctor registered");
        Ok(id)
    }

    pub async fn doctor(&self, id: EntityId) -> Result<Doctor> {
        self.storage
            .get_doctor(id)
            .await?
            .ok_or_else(|| StorageError::not_found(EntityKind::Doctor, id))
    }

    pub async fn doctors(&self) -> Result<Vec<Doctor>> {
        self.storage.list_doctors().await
    }

    // ==================== Appointments ====================

    /// Books an appointment in `Scheduled` status.
    ///
    /// Rejects dates before today without touching the store, then checks
    /// patient and doctor inside the write transaction.
    #[instrument(
        skip_all,
        fields(
            patient_id = appointment.patient_id,
            doctor_id = appointment.doctor_id,
            date = %appointment.date,
        )
    )]
    pub async fn book_appointment(&self, appointment: &NewAppointment) -> Result<EntityId> {
        self.ensure_not_past(appointment.date)?;

        let mut tx = self.storage.begin_transaction().await?;
        let result = insert_appointment_checked(tx.as_mut(), appointment).await;
        let id = finish(tx, result).await?;
        info!(appointment_id = id, "Appointment booked");
        Ok(id)
    }

    pub async fn appointment(&self, id: EntityId) -> Result<AppointmentDetails> {
        self.storage
            .get_appointment(id)
            .await?
            .ok_or_else(|| StorageError::not_found(EntityKind::Appointment, id))
    }

    pub async fn appointments(&self) -> Result<Vec<AppointmentDetails>> {
        self.storage.list_appointments().await
    }

    /// Changes status, reschedules, or cancels. Cancelled appointments stay listed.
    #[instrument(skip(self))]
    pub async fn update_appointment(&self, id: EntityId, update: AppointmentUpdate) -> Result<()> {
        if let AppointmentUpdate::Reschedule { date, .. } = update {
            self.ensure_not_past(date)?;
        }
        let mut tx = self.storage.begin_transaction().await?;
        let result = tx.update_appointment(id, &update).await;
        let updated = finish(tx, result).await?;
        found_or(updated, EntityKind::Appointment, id)
    }

    // ==================== Medical records ====================

    #[instrument(skip_all, fields(patient_id = record.patient_id, doctor_id = record.doctor_id))]
    pub async fn add_medical_record(&self, record: &NewMedicalRecord) -> Result<EntityId> {
        let mut tx = self.storage.begin_transaction().await?;
        let result = insert_medical_record_checked(tx.as_mut(), record).await;
        let id = finish(tx, result).await?;
        info!(record_id = id, "Medical record added");
        Ok(id)
    }

    /// Records of an existing patient, most recent first.
    pub async fn medical_history(&self, patient_id: EntityId) -> Result<Vec<MedicalRecordDetails>> {
        self.patient(patient_id).await?;
        self.storage.list_medical_records(patient_id).await
    }

    // ==================== Billing ====================

    #[instrument(skip_all, fields(patient_id = bill.patient_id, amount = %bill.total_amount))]
    pub async fn generate_bill(&self, bill: &NewBill) -> Result<EntityId> {
        bill.validate()?;
        let mut tx = self.storage.begin_transaction().await?;
        let result = insert_bill_checked(tx.as_mut(), bill).await;
        let id = finish(tx, result).await?;
        info!(bill_id = id, "Bill generated");
        Ok(id)
    }

    pub async fn bill(&self, id: EntityId) -> Result<BillDetails> {
        self.storage
            .get_bill(id)
            .await?
            .ok_or_else(|| StorageError::not_found(EntityKind::Bill, id))
    }

    /// Bills of an existing patient, most recent first.
    pub async fn billing_history(&self, patient_id: EntityId) -> Result<Vec<Bill>> {
        self.patient(patient_id).await?;
        self.storage.list_bills(patient_id).await
    }

    #[instrument(skip(self))]
    pub async fn update_bill_status(&self, id: EntityId, status: PaymentStatus) -> Result<()> {
        let mut tx = self.storage.begin_transaction().await?;
        let result = tx.update_bill_status(id, status).await;
        let updated = finish(tx, result).await?;
        found_or(updated, EntityKind::Bill, id)
    }

    fn ensure_not_past(&self, date: NaiveDate) -> Result<()> {
        let today = self.today();
        validation::ensure_not_past(date, today).map_err(|err| {
            debug!(%date, %today, "Rejected appointment date in the past");
            StorageError::from(err)
        })
    }
}

async fn ensure_patient(tx: &mut dyn Transaction, id: EntityId) -> Result<()> {
    if tx.patient_exists(id).await? {
        Ok(())
    } else {
        Err(StorageError::not_found(EntityKind::Patient, id))
    }
}

async fn ensure_doctor(tx: &mut dyn Transaction, id: EntityId) -> Result<()> {
    if tx.doctor_exists(id).await? {
        Ok(())
    } else {
        Err(StorageError::not_found(EntityKind::Doctor, id))
    }
}

async fn insert_appointment_checked(
    tx: &mut dyn Transaction,
    appointment: &NewAppointment,
) -> Result<EntityId> {
    ensure_patient(tx, appointment.patient_id).await?;
    ensure_doctor(tx, appointment.doctor_id).await?;
    tx.insert_appointment(appointment).await
}

async fn insert_medical_record_checked(
    tx: &mut dyn Transaction,
    record: &NewMedicalRecord,
) -> Result<EntityId> {
    ensure_patient(tx, record.patient_id).await?;
    ensure_doctor(tx, record.doctor_id).await?;
    tx.insert_medical_record(record).await
}

async fn insert_bill_checked(tx: &mut dyn Transaction, bill: &NewBill) -> Result<EntityId> {
    ensure_patient(tx, bill.patient_id).await?;
    tx.insert_bill(bill).await
}

fn found_or(updated: bool, entity: EntityKind, id: EntityId) -> Result<()> {
    if updated {
        Ok(())
    } else {
        Err(StorageError::not_found(entity, id))
    }
}

/// Commits on success; rolls back and returns the failing error otherwise.
async fn finish<T>(tx: Box<dyn Transaction>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            debug!(category = %err.category(), "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
