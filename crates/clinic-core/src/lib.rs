//! # clinic-core
//!
//! Domain types and input validation for the clinic console.
//!
//! This crate has no I/O. It defines:
//! - the five clinic entities ([`Patient`], [`Doctor`], [`Appointment`],
//!   [`MedicalRecord`], [`Bill`]) plus their insert payloads and joined
//!   display projections
//! - the enumerated columns ([`Gender`], [`AppointmentStatus`],
//!   [`PaymentStatus`], [`BloodGroup`]) and the [`StatusTone`] used by reports
//! - pure validators for operator input (see [`validation`])

pub mod entity;
pub mod error;
pub mod status;
pub mod validation;

pub use entity::{
    Appointment, AppointmentDetails, AppointmentUpdate, Bill, BillDetails, Doctor, EntityId,
    EntityKind, MedicalRecord, MedicalRecordDetails, NewAppointment, NewBill, NewDoctor,
    NewMedicalRecord, NewPatient, Patient, PatientUpdate,
};
pub use error::{Result, ValidationError};
pub use status::{AppointmentStatus, BloodGroup, Gender, PaymentStatus, StatusTone};
pub use validation::{validate_email, validate_phone};
