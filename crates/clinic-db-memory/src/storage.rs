//! Table layout and read path of the in-memory backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use tokio::sync::Mutex;
use tracing::debug;

use clinic_core::{
    Appointment, AppointmentDetails, Bill, BillDetails, Doctor, EntityId, MedicalRecord,
    MedicalRecordDetails, Patient,
};
use clinic_storage::{ClinicStorage, StorageError, Transaction};

use crate::transaction::InMemoryTransaction;

/// One ordered map per table, keyed by ID.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) patients: BTreeMap<EntityId, Patient>,
    pub(crate) doctors: BTreeMap<EntityId, Doctor>,
    pub(crate) appointments: BTreeMap<EntityId, Appointment>,
    pub(crate) medical_records: BTreeMap<EntityId, MedicalRecord>,
    pub(crate) bills: BTreeMap<EntityId, Bill>,
}

/// Next auto-increment value for a table.
pub(crate) fn next_id<T>(table: &BTreeMap<EntityId, T>) -> EntityId {
    table.keys().next_back().map_or(1, |last| last + 1)
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Tables {
    fn appointment_details(&self, appointment: &Appointment) -> Option<AppointmentDetails> {
        let patient = self.patients.get(&appointment.patient_id)?;
        let doctor = self.doctors.get(&appointment.doctor_id)?;
        Some(AppointmentDetails {
            appointment: appointment.clone(),
            patient_name: patient.full_name(),
            doctor_name: doctor.full_name(),
            doctor_specialization: doctor.specialization.clone(),
        })
    }

    fn bill_details(&self, bill: &Bill) -> Option<BillDetails> {
        let patient = self.patients.get(&bill.patient_id)?;
        Some(BillDetails {
            bill: bill.clone(),
            patient_name: patient.full_name(),
        })
    }
}

/// In-memory clinic storage.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts per table, in schema order.
    pub async fn row_counts(&self) -> [usize; 5] {
        let tables = self.tables.lock().await;
        [
            tables.patients.len(),
            tables.doctors.len(),
            tables.appointments.len(),
            tables.medical_records.len(),
            tables.bills.len(),
        ]
    }
}

#[async_trait]
impl ClinicStorage for InMemoryStorage {
    /// Holds the table lock until the transaction ends; reads issued on the
    /// same task while a transaction is open wait for it.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        debug!("Began in-memory transaction");
        Ok(Box::new(InMemoryTransaction::new(guard)))
    }

    async fn get_patient(&self, id: EntityId) -> Result<Option<Patient>, StorageError> {
        Ok(self.tables.lock().await.patients.get(&id).cloned())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError> {
        Ok(self.tables.lock().await.patients.values().cloned().collect())
    }

    async fn get_doctor(&self, id: EntityId) -> Result<Option<Doctor>, StorageError> {
        Ok(self.tables.lock().await.doctors.get(&id).cloned())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
        Ok(self.tables.lock().await.doctors.values().cloned().collect())
    }

    async fn get_appointment(
        &self,
        id: EntityId,
    ) -> Result<Option<AppointmentDetails>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .appointments
            .get(&id)
            .and_then(|a| tables.appointment_details(a)))
    }

    async fn list_appointments(&self) -> Result<Vec<AppointmentDetails>, StorageError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<AppointmentDetails> = tables
            .appointments
            .values()
            .filter_map(|a| tables.appointment_details(a))
            .collect();
        rows.sort_by_key(|d| (d.appointment.date, d.appointment.time, d.appointment.id));
        Ok(rows)
    }

    async fn list_medical_records(
        &self,
        patient_id: EntityId,
    ) -> Result<Vec<MedicalRecordDetails>, StorageError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<MedicalRecordDetails> = tables
            .medical_records
            .values()
            .filter(|r| r.patient_id == patient_id)
            .filter_map(|r| {
                let doctor = tables.doctors.get(&r.doctor_id)?;
                Some(MedicalRecordDetails {
                    record: r.clone(),
                    doctor_name: doctor.full_name(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (b.record.visited_at, b.record.id).cmp(&(a.record.visited_at, a.record.id))
        });
        Ok(rows)
    }

    async fn get_bill(&self, id: EntityId) -> Result<Option<BillDetails>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables.bills.get(&id).and_then(|b| tables.bill_details(b)))
    }

    async fn list_bills(&self, patient_id: EntityId) -> Result<Vec<Bill>, StorageError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Bill> = tables
            .bills
            .values()
            .filter(|b| b.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.billed_at, b.id).cmp(&(a.billed_at, a.id)));
        Ok(rows)
    }

    async fn close(&self) {
        debug!("In-memory storage closed");
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
