//! Main menu: command codes, rendering and the dispatch loop.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use clinic_storage::ClinicRepository;
use colored::Colorize;
use tracing::{debug, info};

use crate::commands;
use crate::console::{Console, is_end_of_input};

/// One entry of the main menu, selected by its exact code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    RegisterPatient,
    ListPatients,
    UpdatePatient,
    RegisterDoctor,
    ListDoctors,
    BookAppointment,
    ListAppointments,
    ManageAppointment,
    AddMedicalRecord,
    MedicalHistory,
    GenerateBill,
    BillingHistory,
    UpdatePaymentStatus,
    Exit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 14] = [
        MenuCommand::RegisterPatient,
        MenuCommand::ListPatients,
        MenuCommand::UpdatePatient,
        MenuCommand::RegisterDoctor,
        MenuCommand::ListDoctors,
        MenuCommand::BookAppointment,
        MenuCommand::ListAppointments,
        MenuCommand::ManageAppointment,
        MenuCommand::AddMedicalRecord,
        MenuCommand::MedicalHistory,
        MenuCommand::GenerateBill,
        MenuCommand::BillingHistory,
        MenuCommand::UpdatePaymentStatus,
        MenuCommand::Exit,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::RegisterPatient => "1a",
            Self::ListPatients => "1b",
            Self::UpdatePatient => "1c",
            Self::RegisterDoctor => "2a",
            Self::ListDoctors => "2b",
            Self::BookAppointment => "3a",
            Self::ListAppointments => "3b",
            Self::ManageAppointment => "3c",
            Self::AddMedicalRecord => "4a",
            Self::MedicalHistory => "4b",
            Self::GenerateBill => "5a",
            Self::BillingHistory => "5b",
            Self::UpdatePaymentStatus => "5c",
            Self::Exit => "6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RegisterPatient => "Register New Patient",
            Self::ListPatients => "View All Patients",
            Self::UpdatePatient => "Update Patient Information",
            Self::RegisterDoctor => "Register New Doctor",
            Self::ListDoctors => "View All Doctors",
            Self::BookAppointment => "Book New Appointment",
            Self::ListAppointments => "View All Appointments",
            Self::ManageAppointment => "Manage Appointment Status",
            Self::AddMedicalRecord => "Add New Medical Record",
            Self::MedicalHistory => "View Patient Medical History",
            Self::GenerateBill => "Generate New Bill",
            Self::BillingHistory => "View Billing History",
            Self::UpdatePaymentStatus => "Update Payment Status",
            Self::Exit => "Exit System",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid choice '{0}'. Please enter a code from the menu")]
pub struct UnknownCommand(pub String);

impl FromStr for MenuCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| UnknownCommand(code.to_string()))
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const SECTIONS: [(&str, &str); 5] = [
    ("1", "Patient Management"),
    ("2", "Doctor Management"),
    ("3", "Appointment Management"),
    ("4", "Medical Records"),
    ("5", "Billing"),
];

pub fn render_menu() -> String {
    let rule = "=".repeat(50);
    let mut out = format!(
        "\n{}\n{}\n{}\n",
        rule.cyan(),
        format!("{:^50}", "HOSPITAL MANAGEMENT SYSTEM").cyan(),
        rule.cyan()
    );
    for (number, title) in SECTIONS {
        out.push_str(&format!("\n{} {}\n", format!("{number}.").yellow(), title));
        for command in MenuCommand::ALL
            .iter()
            .filter(|c| c.code().len() == 2 && c.code().starts_with(number))
        {
            let letter = &command.code()[1..];
            out.push_str(&format!("   {} {}\n", format!("{letter}.").cyan(), command.label()));
        }
    }
    out.push_str(&format!(
        "\n{} {}",
        format!("{}.", MenuCommand::Exit.code()).yellow(),
        MenuCommand::Exit.label().red()
    ));
    out
}

/// Runs the menu until the operator exits or input ends, then closes storage.
pub async fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> anyhow::Result<()> {
    info!(backend = repo.storage().backend_name(), "Console session started");
    let result = session(console, repo).await;
    repo.close().await;
    result
}

async fn session<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    repo: &ClinicRepository,
) -> anyhow::Result<()> {
    loop {
        console.say(render_menu())?;
        let line = match console.prompt_line("\nEnter your choice") {
            Ok(line) => line,
            Err(err) if is_end_of_input(&err) => {
                debug!("Input closed at main menu");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let command = match line.parse::<MenuCommand>() {
            Ok(command) => command,
            Err(err) => {
                console.error(&err.to_string())?;
                continue;
            }
        };
        debug!(code = command.code(), "Menu command selected");

        if command == MenuCommand::Exit {
            console.success("Thank you for using the Hospital Management System. Goodbye!")?;
            return Ok(());
        }

        match commands::dispatch(command, console, repo).await {
            Ok(()) => {}
            Err(err) if is_end_of_input(&err) => {
                debug!(code = command.code(), "Input closed mid-command");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    }
}
