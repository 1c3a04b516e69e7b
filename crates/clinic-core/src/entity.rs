//! Clinic entities, their insert payloads and joined display projections.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::{AppointmentStatus, BloodGroup, Gender, PaymentStatus};
use crate::validation;

/// Auto-assigned primary key of every clinic table.
pub type EntityId = i64;

/// The five entity types, used to label lookups and not-found outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Doctor,
    Appointment,
    MedicalRecord,
    Bill,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patient => write!(f, "Patient"),
            Self::Doctor => write!(f, "Doctor"),
            Self::Appointment => write!(f, "Appointment"),
            Self::MedicalRecord => write!(f, "Medical record"),
            Self::Bill => write!(f, "Bill"),
        }
    }
}

fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

// =============================================================================
// Patient
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub blood_group: Option<BloodGroup>,
    pub registered_at: NaiveDateTime,
}

impl Patient {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub blood_group: Option<BloodGroup>,
}

impl NewPatient {
    /// Re-checks the fields the console validates, for callers that bypass it.
    pub fn validate(&self) -> Result<()> {
        validation::parse_name("First Name", &self.first_name)?;
        validation::parse_name("Last Name", &self.last_name)?;
        validation::parse_phone(&self.contact_number)?;
        validation::parse_email(&self.email)?;
        Ok(())
    }
}

/// A single-field patient update, chosen from the update menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientUpdate {
    ContactNumber(String),
    Email(String),
    Address(String),
    BloodGroup(Option<BloodGroup>),
}

impl PatientUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ContactNumber(_) => "Contact number",
            Self::Email(_) => "Email address",
            Self::Address(_) => "Home address",
            Self::BloodGroup(_) => "Blood group",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::ContactNumber(phone) => validation::parse_phone(phone).map(|_| ()),
            Self::Email(email) => validation::parse_email(email).map(|_| ()),
            Self::Address(_) | Self::BloodGroup(_) => Ok(()),
        }
    }
}

// =============================================================================
// Doctor
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
    pub department: String,
    pub joining_date: NaiveDate,
    pub consultation_fee: Decimal,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
    pub department: String,
    pub joining_date: NaiveDate,
    pub consultation_fee: Decimal,
}

impl NewDoctor {
    pub fn validate(&self) -> Result<()> {
        validation::parse_name("First Name", &self.first_name)?;
        validation::parse_name("Last Name", &self.last_name)?;
        validation::parse_label("Specialization", &self.specialization)?;
        validation::parse_label("Department", &self.department)?;
        validation::parse_phone(&self.contact_number)?;
        validation::parse_email(&self.email)?;
        validation::check_amount(&self.consultation_fee)?;
        Ok(())
    }
}

// =============================================================================
// Appointment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: EntityId,
    pub patient_id: EntityId,
    pub doctor_id: EntityId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: String,
}

/// Appointment joined with the names shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
    pub doctor_specialization: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: EntityId,
    pub doctor_id: EntityId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentUpdate {
    Status(AppointmentStatus),
    Reschedule { date: NaiveDate, time: NaiveTime },
    Cancel,
}

// =============================================================================
// Medical record
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: EntityId,
    pub patient_id: EntityId,
    pub doctor_id: EntityId,
    pub diagnosis: String,
    pub prescription: String,
    pub treatment_plan: String,
    pub visited_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecordDetails {
    pub record: MedicalRecord,
    pub doctor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub patient_id: EntityId,
    pub doctor_id: EntityId,
    pub diagnosis: String,
    pub prescription: String,
    pub treatment_plan: String,
}

// =============================================================================
// Bill
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: EntityId,
    pub patient_id: EntityId,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub billed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDetails {
    pub bill: Bill,
    pub patient_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBill {
    pub patient_id: EntityId,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
}

impl NewBill {
    pub fn validate(&self) -> Result<()> {
        validation::check_amount(&self.total_amount)
    }
}
