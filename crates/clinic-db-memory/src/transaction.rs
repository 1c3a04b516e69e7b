//! Snapshot transactions for the in-memory backend.
//!
//! A transaction owns the table lock and mutates a working copy. `commit`
//! writes the copy back; `rollback` and drop discard it.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use clinic_core::{
    Appointment, AppointmentStatus, AppointmentUpdate, Bill, Doctor, EntityId, EntityKind,
    MedicalRecord, NewAppointment, NewBill, NewDoctor, NewMedicalRecord, NewPatient, Patient,
    PatientUpdate, PaymentStatus,
};
use clinic_storage::{StorageError, Transaction};

use crate::storage::{Tables, next_id, now};

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

impl InMemoryTransaction {
    pub(crate) fn new(guard: OwnedMutexGuard<Tables>) -> Self {
        let working = guard.clone();
        Self { guard, working }
    }

    fn ensure_unique_patient_email(
        &self,
        email: &str,
        except: Option<EntityId>,
    ) -> Result<(), StorageError> {
        let taken = self
            .working
            .patients
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(email) && Some(p.id) != except);
        if taken {
            return Err(StorageError::already_exists(EntityKind::Patient, "email", email));
        }
        Ok(())
    }

    fn ensure_unique_doctor_email(&self, email: &str) -> Result<(), StorageError> {
        if self
            .working
            .doctors
            .values()
            .any(|d| d.email.eq_ignore_ascii_case(email))
        {
            return Err(StorageError::already_exists(EntityKind::Doctor, "email", email));
        }
        Ok(())
    }

    /// Foreign keys are enforced here as well as by the repository.
    fn ensure_references(
        &self,
        patient_id: EntityId,
        doctor_id: Option<EntityId>,
    ) -> Result<(), StorageError> {
        if !self.working.patients.contains_key(&patient_id) {
            return Err(StorageError::not_found(EntityKind::Patient, patient_id));
        }
        match doctor_id {
            Some(doctor_id) if !self.working.doctors.contains_key(&doctor_id) => {
                Err(StorageError::not_found(EntityKind::Doctor, doctor_id))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let Self { mut guard, working } = *self;
        *guard = working;
        debug!("Committed in-memory transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        debug!("Rolled back in-memory transaction");
        Ok(())
    }

    async fn patient_exists(&mut self, id: EntityId) -> Result<bool, StorageError> {
        Ok(self.working.patients.contains_key(&id))
    }

    async fn doctor_exists(&mut self, id: EntityId) -> Result<bool, StorageError> {
        Ok(self.working.doctors.contains_key(&id))
    }

    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<EntityId, StorageError> {
        self.ensure_unique_patient_email(&patient.email, None)?;
        let id = next_id(&self.working.patients);
        self.working.patients.insert(
            id,
            Patient {
                id,
                first_name: patient.first_name.clone(),
                last_name: patient.last_name.clone(),
                date_of_birth: patient.date_of_birth,
                gender: patient.gender,
                contact_number: patient.contact_number.clone(),
                email: patient.email.clone(),
                address: patient.address.clone(),
                blood_group: patient.blood_group,
                registered_at: now(),
            },
        );
        Ok(id)
    }

    async fn insert_doctor(&mut self, doctor: &NewDoctor) -> Result<EntityId, StorageError> {
        self.ensure_unique_doctor_email(&doctor.email)?;
        let id = next_id(&self.working.doctors);
        self.working.doctors.insert(
            id,
            Doctor {
                id,
                first_name: doctor.first_name.clone(),
                last_name: doctor.last_name.clone(),
                specialization: doctor.specialization.clone(),
                contact_number: doctor.contact_number.clone(),
                email: doctor.email.clone(),
                department: doctor.department.clone(),
                joining_date: doctor.joining_date,
                consultation_fee: doctor.consultation_fee,
            },
        );
        Ok(id)
    }

    async fn insert_appointment(
        &mut self,
        appointment: &NewAppointment,
    ) -> Result<EntityId, StorageError> {
        self.ensure_references(appointment.patient_id, Some(appointment.doctor_id))?;
        let id = next_id(&self.working.appointments);
        self.working.appointments.insert(
            id,
            Appointment {
                id,
                patient_id: appointment.patient_id,
                doctor_id: appointment.doctor_id,
                date: appointment.date,
                time: appointment.time,
                status: AppointmentStatus::Scheduled,
                reason: appointment.reason.clone(),
            },
        );
        Ok(id)
    }

    async fn insert_medical_record(
        &mut self,
        record: &NewMedicalRecord,
    ) -> Result<EntityId, StorageError> {
        self.ensure_references(record.patient_id, Some(record.doctor_id))?;
        let id = next_id(&self.working.medical_records);
        self.working.medical_records.insert(
            id,
            MedicalRecord {
                id,
                patient_id: record.patient_id,
                doctor_id: record.doctor_id,
                diagnosis: record.diagnosis.clone(),
                prescription: record.prescription.clone(),
                treatment_plan: record.treatment_plan.clone(),
                visited_at: now(),
            },
        );
        Ok(id)
    }

    async fn insert_bill(&mut self, bill: &NewBill) -> Result<EntityId, StorageError> {
        self.ensure_references(bill.patient_id, None)?;
        let id = next_id(&self.working.bills);
        self.working.bills.insert(
            id,
            Bill {
                id,
                patient_id: bill.patient_id,
                total_amount: bill.total_amount,
                payment_status: bill.payment_status,
                billed_at: now(),
            },
        );
        Ok(id)
    }

    async fn update_patient(
        &mut self,
        id: EntityId,
        update: &PatientUpdate,
    ) -> Result<bool, StorageError> {
        if let PatientUpdate::Email(email) = update {
            self.ensure_unique_patient_email(email, Some(id))?;
        }
        let Some(patient) = self.working.patients.get_mut(&id) else {
            return Ok(false);
        };
        match update {
            PatientUpdate::ContactNumber(phone) => patient.contact_number = phone.clone(),
            PatientUpdate::Email(email) => patient.email = email.clone(),
            PatientUpdate::Address(address) => patient.address = address.clone(),
            PatientUpdate::BloodGroup(group) => patient.blood_group = *group,
        }
        Ok(true)
    }

    async fn update_appointment(
        &mut self,
        id: EntityId,
        update: &AppointmentUpdate,
    ) -> Result<bool, StorageError> {
        let Some(appointment) = self.working.appointments.get_mut(&id) else {
            return Ok(false);
        };
        match *update {
            AppointmentUpdate::Status(status) => appointment.status = status,
            AppointmentUpdate::Reschedule { date, time } => {
                appointment.date = date;
                appointment.time = time;
            }
            AppointmentUpdate::Cancel => appointment.status = AppointmentStatus::Cancelled,
        }
        Ok(true)
    }

    async fn update_bill_status(
        &mut self,
        id: EntityId,
        status: PaymentStatus,
    ) -> Result<bool, StorageError> {
        let Some(bill) = self.working.bills.get_mut(&id) else {
            return Ok(false);
        };
        bill.payment_status = status;
        Ok(true)
    }
}
