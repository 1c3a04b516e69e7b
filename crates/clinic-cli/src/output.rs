//! Report rendering: tables, detail cards and the bill receipt.
//!
//! Renderers return `String`s; the console decides where they go.

use chrono::NaiveDateTime;
use clinic_core::{
    AppointmentDetails, Bill, BillDetails, Doctor, MedicalRecordDetails, Patient, StatusTone,
};
use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::settings::Style;

const RULE_WIDTH: usize = 50;

pub fn success_line(msg: &str) -> String {
    format!("{} {}", "✓".green(), msg.green())
}

pub fn error_line(msg: &str) -> String {
    format!("{} {}", "✗".red(), msg.red())
}

pub fn print_success(msg: &str) {
    println!("{}", success_line(msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", error_line(msg));
}

/// Colors a status by its tone: green for success, yellow for neutral, red for warning.
pub fn tone(text: &str, tone: StatusTone) -> ColoredString {
    match tone {
        StatusTone::Success => text.green(),
        StatusTone::Neutral => text.yellow(),
        StatusTone::Warning => text.red(),
    }
}

pub fn money(amount: &Decimal) -> String {
    format!("${amount:.2}")
}

fn timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() { "N/A" } else { value }
}

fn table(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

pub fn render_patients(patients: &[Patient]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID",
        "Name",
        "Date of Birth",
        "Gender",
        "Contact",
        "Email",
        "Blood Group",
    ]);
    for p in patients {
        builder.push_record([
            p.id.to_string(),
            p.full_name(),
            p.date_of_birth.to_string(),
            p.gender.to_string(),
            p.contact_number.clone(),
            p.email.clone(),
            p.blood_group
                .map_or_else(|| "N/A".to_string(), |g| g.to_string()),
        ]);
    }
    table(builder)
}

pub fn render_doctors(doctors: &[Doctor]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID",
        "Name",
        "Specialization",
        "Department",
        "Contact",
        "Email",
        "Fee ($)",
    ]);
    for d in doctors {
        builder.push_record([
            d.id.to_string(),
            d.full_name(),
            d.specialization.clone(),
            d.department.clone(),
            d.contact_number.clone(),
            d.email.clone(),
            format!("{:.2}", d.consultation_fee),
        ]);
    }
    table(builder)
}

pub fn render_appointments(appointments: &[AppointmentDetails]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Date", "Time", "Patient", "Doctor", "Status", "Reason"]);
    for details in appointments {
        let a = &details.appointment;
        builder.push_record([
            a.id.to_string(),
            a.date.to_string(),
            a.time.format("%H:%M").to_string(),
            details.patient_name.clone(),
            format!("{} ({})", details.doctor_name, details.doctor_specialization),
            tone(a.status.as_str(), a.status.tone()).to_string(),
            a.reason.clone(),
        ]);
    }
    table(builder)
}

pub fn render_bills(bills: &[Bill]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Bill ID", "Date", "Amount ($)", "Status"]);
    for b in bills {
        builder.push_record([
            b.id.to_string(),
            timestamp(&b.billed_at),
            format!("{:.2}", b.total_amount),
            tone(b.payment_status.as_str(), b.payment_status.tone()).to_string(),
        ]);
    }
    table(builder)
}

/// Numbered record blocks, most recent first as given.
pub fn render_medical_history(records: &[MedicalRecordDetails]) -> String {
    let mut out = String::new();
    for (i, details) in records.iter().enumerate() {
        let r = &details.record;
        out.push_str(&format!(
            "\n{}\nDoctor: {}\nDiagnosis: {}\nPrescription: {}\nTreatment Plan: {}\n{}\n",
            format!("Record #{} - {}", i + 1, timestamp(&r.visited_at)).cyan(),
            details.doctor_name,
            r.diagnosis,
            r.prescription,
            r.treatment_plan,
            "-".repeat(RULE_WIDTH).cyan(),
        ));
    }
    out
}

pub fn render_patient_card(p: &Patient) -> String {
    format!(
        "{}\nID: {}\nName: {}\nDate of Birth: {}\nGender: {}\nContact: {}\nEmail: {}\nAddress: {}\nBlood Group: {}",
        "Current Patient Information:".cyan(),
        p.id,
        p.full_name(),
        p.date_of_birth,
        p.gender,
        p.contact_number,
        p.email,
        or_na(&p.address),
        p.blood_group
            .map_or_else(|| "N/A".to_string(), |g| g.to_string()),
    )
}

pub fn render_appointment_card(details: &AppointmentDetails) -> String {
    let a = &details.appointment;
    format!(
        "{}\nID: {}\nDate: {}\nTime: {}\nPatient: {}\nDoctor: {}\nStatus: {}\nReason: {}",
        "Appointment Details:".cyan(),
        a.id,
        a.date,
        a.time.format("%H:%M"),
        details.patient_name,
        details.doctor_name,
        tone(a.status.as_str(), a.status.tone()),
        or_na(&a.reason),
    )
}

pub fn render_bill_card(details: &BillDetails) -> String {
    let b = &details.bill;
    format!(
        "{}\nBill ID: {}\nPatient: {} (ID: {})\nAmount: {}\nDate: {}\nCurrent Status: {}",
        "Current Bill Information:".cyan(),
        b.id,
        details.patient_name,
        b.patient_id,
        money(&b.total_amount),
        timestamp(&b.billed_at),
        tone(b.payment_status.as_str(), b.payment_status.tone()),
    )
}

/// Fixed-format receipt printed after a bill is generated.
pub fn render_receipt(details: &BillDetails) -> String {
    let b = &details.bill;
    let double = "=".repeat(RULE_WIDTH);
    let single = "-".repeat(RULE_WIDTH);
    format!(
        "{double}\n{:^width$}\n{double}\n\
         Bill ID: {}\n\
         Date: {}\n\
         Patient: {} (ID: {})\n\
         {single}\n\
         Amount Due: {}\n\
         Payment Status: {}\n\
         {single}\n\
         {double}",
        "HOSPITAL BILL RECEIPT",
        b.id,
        timestamp(&b.billed_at),
        details.patient_name,
        b.patient_id,
        money(&b.total_amount),
        b.payment_status,
        width = RULE_WIDTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use clinic_core::{Appointment, AppointmentStatus, BloodGroup, Gender, PaymentStatus};
    use std::str::FromStr;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn bill_details(status: PaymentStatus) -> BillDetails {
        BillDetails {
            bill: Bill {
                id: 12,
                patient_id: 3,
                total_amount: Decimal::from_str("120.5").unwrap(),
                payment_status: status,
                billed_at: at(2024, 3, 9, 14, 5),
            },
            patient_name: "John Doe".into(),
        }
    }

    #[test]
    fn test_receipt_layout() {
        colored::control::set_override(false);
        let receipt = render_receipt(&bill_details(PaymentStatus::Pending));
        let lines: Vec<&str> = receipt.lines().collect();
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1].trim(), "HOSPITAL BILL RECEIPT");
        assert!(receipt.contains("Bill ID: 12\n"));
        assert!(receipt.contains("Date: 2024-03-09 14:05\n"));
        assert!(receipt.contains("Patient: John Doe (ID: 3)\n"));
        assert!(receipt.contains("Amount Due: $120.50\n"));
        assert!(receipt.contains("Payment Status: Pending\n"));
        assert_eq!(*lines.last().unwrap(), "=".repeat(50));
    }

    #[test]
    fn test_appointments_table_has_headers_and_rows() {
        colored::control::set_override(false);
        let rows = vec![AppointmentDetails {
            appointment: Appointment {
                id: 1,
                patient_id: 1,
                doctor_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                status: AppointmentStatus::Cancelled,
                reason: "Checkup".into(),
            },
            patient_name: "John Doe".into(),
            doctor_name: "Jane Smith".into(),
            doctor_specialization: "Cardiology".into(),
        }];
        let table = render_appointments(&rows);
        for needle in [
            "ID", "Date", "Time", "Patient", "Doctor", "Status", "Reason", "2024-01-02", "09:30",
            "Jane Smith (Cardiology)", "Cancelled",
        ] {
            assert!(table.contains(needle), "missing {needle} in\n{table}");
        }
        assert!(table.starts_with('╭'));
    }

    #[test]
    fn test_patient_table_shows_na_for_missing_blood_group() {
        colored::control::set_override(false);
        let mut patient = Patient {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            gender: Gender::Female,
            contact_number: "5551234567".into(),
            email: "ada@example.org".into(),
            address: String::new(),
            blood_group: None,
            registered_at: at(2024, 1, 1, 9, 0),
        };
        assert!(render_patients(&[patient.clone()]).contains("N/A"));
        assert!(render_patient_card(&patient).contains("Address: N/A"));

        patient.blood_group = Some(BloodGroup::AbNegative);
        assert!(render_patients(&[patient]).contains("AB-"));
    }

    #[test]
    fn test_money_formats_two_decimals() {
        assert_eq!(money(&Decimal::from_str("7").unwrap()), "$7.00");
        assert_eq!(money(&Decimal::from_str("99.5").unwrap()), "$99.50");
    }
}
