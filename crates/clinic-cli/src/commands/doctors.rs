use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::{NewDoctor, validation};
use clinic_storage::ClinicRepository;

use super::report;
use crate::console::Console;
use crate::output;

pub async fn register<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Add New Doctor")?;
    let doctor = NewDoctor {
        first_name: console.prompt_until("First Name", |s| {
            validation::parse_name("First Name", s)
        })?,
        last_name: console.prompt_until("Last Name", |s| {
            validation::parse_name("Last Name", s)
        })?,
        specialization: console.prompt_until("Medical Specialization", |s| {
            validation::parse_label("Specialization", s)
        })?,
        contact_number: console.prompt_until("Contact Number", validation::parse_phone)?,
        email: console.prompt_until("Email Address", validation::parse_email)?,
        department: console.prompt_until("Department", |s| {
            validation::parse_label("Department", s)
        })?,
        consultation_fee: console.prompt_until("Consultation Fee", validation::parse_amount)?,
        joining_date: console.prompt_until("Joining Date (YYYY-MM-DD)", validation::parse_date)?,
    };

    if let Some(id) = report(console, "Registration failed", repo.register_doctor(&doctor).await)? {
        console.success(&format!("Doctor registration successful! Doctor ID: {id}"))?;
    }
    Ok(())
}

pub async fn list<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    let Some(doctors) = report(console, "Error retrieving doctors", repo.doctors().await)? else {
        return Ok(());
    };
    if doctors.is_empty() {
        return console.notice("No doctors found.");
    }
    console.heading("Doctor List")?;
    console.say(output::render_doctors(&doctors))
}
