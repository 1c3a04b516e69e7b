//! Menu command handlers.
//!
//! Handlers return `Err` only for console I/O failures. Storage failures are
//! shown to the operator and the handler returns `Ok(())`, so the menu loop
//! keeps running.

pub mod appointments;
pub mod billing;
pub mod doctors;
pub mod patients;
pub mod records;

use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::{Doctor, Patient, validation};
use clinic_storage::{ClinicRepository, StorageError, StorageResult};
use tracing::warn;

use crate::console::Console;
use crate::menu::MenuCommand;

pub async fn dispatch<R: BufRead, W: Write>(
    command: MenuCommand,
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    match command {
        MenuCommand::RegisterPatient => patients::register(console, repo).await,
        MenuCommand::ListPatients => patients::list(console, repo).await,
        MenuCommand::UpdatePatient => patients::update(console, repo).await,
        MenuCommand::RegisterDoctor => doctors::register(console, repo).await,
        MenuCommand::ListDoctors => doctors::list(console, repo).await,
        MenuCommand::BookAppointment => appointments::book(console, repo).await,
        MenuCommand::ListAppointments => appointments::list(console, repo).await,
        MenuCommand::ManageAppointment => appointments::manage(console, repo).await,
        MenuCommand::AddMedicalRecord => records::add(console, repo).await,
        MenuCommand::MedicalHistory => records::history(console, repo).await,
        MenuCommand::GenerateBill => billing::generate(console, repo).await,
        MenuCommand::BillingHistory => billing::history(console, repo).await,
        MenuCommand::UpdatePaymentStatus => billing::update_status(console, repo).await,
        MenuCommand::Exit => Ok(()),
    }
}

/// Unwraps a repository result, or reports the failure and yields `None`.
///
/// Not-found, duplicate and validation outcomes print as-is; anything else is prefixed
/// with `context` and logged.
pub(crate) fn report<T, R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    context: &str,
    result: StorageResult<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            err @ (StorageError::NotFound { .. }
            | StorageError::AlreadyExists { .. }
            | StorageError::InvalidInput { .. }),
        ) => {
            console.error(&err.to_string())?;
            Ok(None)
        }
        Err(err) => {
            warn!(category = %err.category(), error = %err, "{context}");
            console.error(&format!("{context}: {err}"))?;
            Ok(None)
        }
    }
}

/// Asks for a patient ID and echoes the patient's name, or reports that it does not exist.
pub(crate) async fn select_patient<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
    label: &str,
) -> Result<Option<Patient>> {
    let id = console.prompt_until(label, validation::parse_id)?;
    let patient = report(console, "Patient lookup failed", repo.patient(id).await)?;
    if let Some(p) = &patient {
        console.success(&format!("Patient: {}", p.full_name()))?;
    }
    Ok(patient)
}

pub(crate) async fn select_doctor<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
    label: &str,
) -> Result<Option<Doctor>> {
    let id = console.prompt_until(label, validation::parse_id)?;
    let doctor = report(console, "Doctor lookup failed", repo.doctor(id).await)?;
    if let Some(d) = &doctor {
        console.success(&format!("Doctor: {} ({})", d.full_name(), d.specialization))?;
    }
    Ok(doctor)
}
