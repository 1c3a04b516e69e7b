use std::io::{BufRead, Write};

use anyhow::Result;
use clinic_core::{NewBill, PaymentStatus, validation};
use clinic_storage::ClinicRepository;

use super::{report, select_patient};
use crate::console::Console;
use crate::output;

/// Creates a bill and prints its receipt.
pub async fn generate<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Generate Bill")?;
    let Some(patient) = select_patient(console, repo, "Enter Patient ID").await? else {
        return Ok(());
    };

    let bill = NewBill {
        patient_id: patient.id,
        total_amount: console.prompt_until("Total Amount", validation::parse_amount)?,
        payment_status: console.choose(
            "Payment Status:",
            &PaymentStatus::ALL,
            "Select payment status (1-3)",
        )?,
    };

    let Some(id) = report(console, "Failed to generate bill", repo.generate_bill(&bill).await)?
    else {
        return Ok(());
    };
    console.success(&format!("Bill generated successfully! Bill ID: {id}"))?;

    if let Some(details) = report(console, "Failed to load receipt", repo.bill(id).await)? {
        console.say(format!("\n{}", output::render_receipt(&details)))?;
    }
    Ok(())
}

pub async fn history<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Billing History")?;
    let Some(patient) = select_patient(console, repo, "Enter Patient ID").await? else {
        return Ok(());
    };
    let Some(bills) = report(
        console,
        "Error retrieving billing history",
        repo.billing_history(patient.id).await,
    )?
    else {
        return Ok(());
    };
    if bills.is_empty() {
        return console.notice("No billing records found for this patient.");
    }
    console.say(output::render_bills(&bills))
}

pub async fn update_status<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> Result<()> {
    console.heading("Update Payment Status")?;
    let id = console.prompt_until("Enter Bill ID", validation::parse_id)?;
    let Some(details) = report(console, "Bill lookup failed", repo.bill(id).await)? else {
        return Ok(());
    };
    console.say(format!("\n{}", output::render_bill_card(&details)))?;

    let status = console.choose(
        "Payment Status:",
        &PaymentStatus::ALL,
        "Select payment status (1-3)",
    )?;
    if report(console, "Update failed", repo.update_bill_status(id, status).await)?.is_some() {
        console.success(&format!("Payment status updated to {status}."))?;
    }
    Ok(())
}
