use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::{AppointmentStatus, AppointmentUpdate, NewAppointment, validation};
use clinic_storage::ClinicRepository;

use super::{report, select_doctor, select_patient};
use crate::console::Console;
use crate::output;

pub async fn book<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Schedule Appointment")?;
    let Some(patient) = select_patient(console, repo, "Enter Patient ID").await? else {
        return Ok(());
    };
    let Some(doctor) = select_doctor(console, repo, "Enter Doctor ID").await? else {
        return Ok(());
    };

    let today = repo.today();
    let appointment = NewAppointment {
        patient_id: patient.id,
        doctor_id: doctor.id,
        date: console.prompt_until("Appointment Date (YYYY-MM-DD)", |s| {
            validation::parse_appointment_date(s, today)
        })?,
        time: console.prompt_until("Appointment Time (HH:MM)", validation::parse_time)?,
        reason: console.prompt_line("Reason for Visit")?,
    };

    let booked = repo.book_appointment(&appointment).await;
    if let Some(id) = report(console, "Booking failed", booked)? {
        console.success(&format!("Appointment booked successfully! Appointment ID: {id}"))?;
    }
    Ok(())
}

pub async fn list<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    let Some(appointments) =
        report(console, "Error retrieving appointments", repo.appointments().await)?
    else {
        return Ok(());
    };
    if appointments.is_empty() {
        return console.notice("No appointments found.");
    }
    console.heading("Appointments")?;
    console.say(output::render_appointments(&appointments))
}

pub async fn manage<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Manage Appointment")?;
    let id = console.prompt_until("Enter Appointment ID", validation::parse_id)?;
    let Some(details) = report(console, "Appointment lookup failed", repo.appointment(id).await)?
    else {
        return Ok(());
    };
    console.say(format!("\n{}", output::render_appointment_card(&details)))?;

    console.say(
        "\nOptions:\n1. Update Status\n2. Reschedule\n3. Cancel Appointment\n4. Back to Main Menu",
    )?;
    let choice = console.prompt_until("Select an option (1-4)", |s| {
        validation::parse_menu_index(s, 4)
    })?;

    let (update, done) = match choice {
        0 => {
            let status = console.choose(
                "Available statuses:",
                &AppointmentStatus::ALL,
                "Select new status (1-3)",
            )?;
            (
                AppointmentUpdate::Status(status),
                format!("Appointment status updated to {status}."),
            )
        }
        1 => {
            let today = repo.today();
            let date = console.prompt_until("New Date (YYYY-MM-DD)", |s| {
                validation::parse_appointment_date(s, today)
            })?;
            let time = console.prompt_until("New Time (HH:MM)", validation::parse_time)?;
            (
                AppointmentUpdate::Reschedule { date, time },
                format!("Appointment rescheduled to {date} at {}.", time.format("%H:%M")),
            )
        }
        2 => {
            if !console.confirm("Are you sure you want to cancel this appointment?")? {
                return console.notice("Cancellation aborted.");
            }
            (AppointmentUpdate::Cancel, "Appointment cancelled.".to_string())
        }
        _ => return Ok(()),
    };

    if report(console, "Update failed", repo.update_appointment(id, update).await)?.is_some() {
        console.success(&done)?;
    }
    Ok(())
}
