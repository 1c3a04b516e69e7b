use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::NewMedicalRecord;
use clinic_storage::ClinicRepository;

use super::{report, select_doctor, select_patient};
use crate::console::Console;
use crate::output;

pub async fn add<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Add Medical Record")?;
    let Some(patient) = select_patient(console, repo, "Enter Patient ID").await? else {
        return Ok(());
    };
    let Some(doctor) = select_doctor(console, repo, "Enter Doctor ID").await? else {
        return Ok(());
    };

    let record = NewMedicalRecord {
        patient_id: patient.id,
        doctor_id: doctor.id,
        diagnosis: console.prompt_line("Diagnosis")?,
        prescription: console.prompt_line("Prescription")?,
        treatment_plan: console.prompt_line("Treatment Plan")?,
    };

    let added = repo.add_medical_record(&record).await;
    if let Some(id) = report(console, "Failed to add record", added)? {
        console.success(&format!("Medical record added successfully! Record ID: {id}"))?;
    }
    Ok(())
}

pub async fn history<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Patient Medical History")?;
    let Some(patient) = select_patient(console, repo, "Enter Patient ID").await? else {
        return Ok(());
    };
    let Some(records) = report(
        console,
        "Error retrieving medical history",
        repo.medical_history(patient.id).await,
    )?
    else {
        return Ok(());
    };
    if records.is_empty() {
        return console.notice("No medical records found for this patient.");
    }
    console.say(output::render_medical_history(&records))
}
