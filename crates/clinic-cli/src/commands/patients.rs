use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::{NewPatient, PatientUpdate, validation};
use clinic_storage::ClinicRepository;

use super::report;
use crate::console::Console;
use crate::output;

pub async fn register<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Add New Patient")?;
    let patient = NewPatient {
        first_name: console.prompt_until("First Name", |s| {
            validation::parse_name("First Name", s)
        })?,
        last_name: console.prompt_until("Last Name", |s| {
            validation::parse_name("Last Name", s)
        })?,
        date_of_birth: console
            .prompt_until("Date of Birth (YYYY-MM-DD)", validation::parse_date)?,
        gender: console.prompt_until("Gender (Male/Female/Other)", validation::parse_gender)?,
        contact_number: console.prompt_until("Contact Number", validation::parse_phone)?,
        email: console.prompt_until("Email Address", validation::parse_email)?,
        address: console.prompt_line("Home Address")?,
        blood_group: console.prompt_until(
            "Blood Group (A+, A-, B+, B-, AB+, AB-, O+, O-; blank if unknown)",
            validation::parse_blood_group,
        )?,
    };

    let registered = repo.register_patient(&patient).await;
    if let Some(id) = report(console, "Registration failed", registered)? {
        console.success(&format!("Patient registration successful! Patient ID: {id}"))?;
    }
    Ok(())
}

pub async fn list<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    let Some(patients) = report(console, "Error retrieving patients", repo.patients().await)?
    else {
        return Ok(());
    };
    if patients.is_empty() {
        return console.notice("No patients found.");
    }
    console.heading("Patient List")?;
    console.say(output::render_patients(&patients))
}

pub async fn update<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Update Patient Information")?;
    let id = console.prompt_until("Enter Patient ID", validation::parse_id)?;
    let Some(patient) = report(console, "Patient lookup failed", repo.patient(id).await)? else {
        return Ok(());
    };
    console.say(format!("\n{}", output::render_patient_card(&patient)))?;

    console.say(
        "\nUpdate Options:\n1. Contact Number\n2. Email Address\n3. Home Address\n\
         4. Blood Group\n5. Back to Main Menu",
    )?;
    let choice = console.prompt_until("Select an option (1-5)", |s| {
        validation::parse_menu_index(s, 5)
    })?;
    let update = match choice {
        0 => PatientUpdate::ContactNumber(
            console.prompt_until("New Contact Number", validation::parse_phone)?,
        ),
        1 => PatientUpdate::Email(
            console.prompt_until("New Email Address", validation::parse_email)?,
        ),
        2 => PatientUpdate::Address(console.prompt_line("New Home Address")?),
        3 => PatientUpdate::BloodGroup(console.prompt_until(
            "New Blood Group (blank to clear)",
            validation::parse_blood_group,
        )?),
        _ => return Ok(()),
    };

    if report(console, "Update failed", repo.update_patient(id, &update).await)?.is_some() {
        console.success(&format!("{} updated successfully.", update.field_name()))?;
    }
    Ok(())
}
