//! Write rules of `ClinicRepository` exercised against the in-memory backend.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use clinic_core::{
    AppointmentStatus, AppointmentUpdate, BloodGroup, EntityKind, Gender, NewAppointment,
    NewBill, NewDoctor, NewMedicalRecord, NewPatient, PatientUpdate, PaymentStatus,
};
use clinic_db_memory::InMemoryStorage;
use clinic_storage::{ClinicRepository, StorageError};
use rust_decimal::Decimal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn setup() -> (Arc<InMemoryStorage>, ClinicRepository) {
    let storage = Arc::new(InMemoryStorage::new());
    let repo = ClinicRepository::new(storage.clone()).with_clock(today);
    (storage, repo)
}

fn patient(email: &str) -> NewPatient {
    NewPatient {
        first_name: "John".into(),
        last_name: "Doe".into(),
        date_of_birth: date("1990-05-01"),
        gender: Gender::Male,
        contact_number: "5551234567".into(),
        email: email.into(),
        address: "1 Main St".into(),
        blood_group: Some(BloodGroup::APositive),
    }
}

fn doctor(email: &str) -> NewDoctor {
    NewDoctor {
        first_name: "Jane".into(),
        last_name: "Smith".into(),
        specialization: "Cardiology".into(),
        contact_number: "5559876543".into(),
        email: email.into(),
        department: "Heart".into(),
        joining_date: date("2020-01-01"),
        consultation_fee: Decimal::from_str("150.00").unwrap(),
    }
}

fn appointment(patient_id: i64, doctor_id: i64, on: &str, at: &str) -> NewAppointment {
    NewAppointment {
        patient_id,
        doctor_id,
        date: date(on),
        time: time(at),
        reason: "Checkup".into(),
    }
}

async fn seed(repo: &ClinicRepository) -> (i64, i64) {
    let p = repo.register_patient(&patient("john@example.com")).await.unwrap();
    let d = repo.register_doctor(&doctor("jane@example.com")).await.unwrap();
    (p, d)
}

#[tokio::test]
async fn test_register_and_fetch_patient() {
    let (_, repo) = setup();
    let id = repo.register_patient(&patient("john@example.com")).await.unwrap();
    assert_eq!(id, 1);

    let stored = repo.patient(id).await.unwrap();
    assert_eq!(stored.full_name(), "John Doe");
    assert_eq!(stored.blood_group, Some(BloodGroup::APositive));
    assert_eq!(repo.patients().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_with_unknown_patient_writes_nothing() {
    let (storage, repo) = setup();
    let (_, d) = seed(&repo).await;
    let before = storage.row_counts().await;

    let err = repo
        .book_appointment(&appointment(999, d, "2024-06-01", "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound { entity: EntityKind::Patient, id: 999 }
    ));
    assert_eq!(err.to_string(), "Patient ID 999 does not exist");
    assert_eq!(storage.row_counts().await, before);
}

#[tokio::test]
async fn test_booking_with_unknown_doctor_is_not_found() {
    let (storage, repo) = setup();
    let (p, _) = seed(&repo).await;

    let err = repo
        .book_appointment(&appointment(p, 42, "2024-06-01", "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound { entity: EntityKind::Doctor, id: 42 }
    ));
    assert!(repo.appointments().await.unwrap().is_empty());
    assert_eq!(storage.row_counts().await[2], 0);
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let (_, repo) = setup();
    let (p, d) = seed(&repo).await;

    let err = repo
        .book_appointment(&appointment(p, d, "2023-12-31", "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));
    assert!(err.to_string().contains("cannot be in the past"));
    assert!(repo.appointments().await.unwrap().is_empty());

    // Today itself is allowed.
    let id = repo
        .book_appointment(&appointment(p, d, "2024-01-01", "08:00"))
        .await
        .unwrap();
    assert_eq!(
        repo.appointment(id).await.unwrap().appointment.status,
        AppointmentStatus::Scheduled
    );
}

#[tokio::test]
async fn test_appointments_listed_in_date_then_time_order() {
    let (_, repo) = setup();
    let (p, d) = seed(&repo).await;

    for (on, at) in [
        ("2024-01-03", "09:00"),
        ("2024-01-01", "15:00"),
        ("2024-01-02", "09:00"),
        ("2024-01-01", "09:30"),
    ] {
        repo.book_appointment(&appointment(p, d, on, at)).await.unwrap();
    }

    let order: Vec<(String, String)> = repo
        .appointments()
        .await
        .unwrap()
        .into_iter()
        .map(|a| {
            (
                a.appointment.date.to_string(),
                a.appointment.time.format("%H:%M").to_string(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("2024-01-01".to_string(), "09:30".to_string()),
            ("2024-01-01".to_string(), "15:00".to_string()),
            ("2024-01-02".to_string(), "09:00".to_string()),
            ("2024-01-03".to_string(), "09:00".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_cancelled_appointment_stays_listed() {
    let (_, repo) = setup();
    let (p, d) = seed(&repo).await;
    let id = repo
        .book_appointment(&appointment(p, d, "2024-03-10", "11:00"))
        .await
        .unwrap();

    repo.update_appointment(id, AppointmentUpdate::Cancel)
        .await
        .unwrap();

    let listed = repo.appointments().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].appointment.status, AppointmentStatus::Cancelled);
    assert_eq!(listed[0].patient_name, "John Doe");
    assert_eq!(listed[0].doctor_name, "Jane Smith");
    assert_eq!(listed[0].doctor_specialization, "Cardiology");
}

#[tokio::test]
async fn test_reschedule_updates_date_and_time_only() {
    let (_, repo) = setup();
    let (p, d) = seed(&repo).await;
    let id = repo
        .book_appointment(&appointment(p, d, "2024-03-10", "11:00"))
        .await
        .unwrap();

    repo.update_appointment(
        id,
        AppointmentUpdate::Reschedule {
            date: date("2024-04-01"),
            time: time("13:15"),
        },
    )
    .await
    .unwrap();

    let a = repo.appointment(id).await.unwrap().appointment;
    assert_eq!(a.date, date("2024-04-01"));
    assert_eq!(a.time, time("13:15"));
    assert_eq!(a.status, AppointmentStatus::Scheduled);
    assert_eq!(a.reason, "Checkup");

    let err = repo
        .update_appointment(
            id,
            AppointmentUpdate::Reschedule {
                date: date("2023-01-01"),
                time: time("13:15"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_update_missing_appointment_is_not_found() {
    let (_, repo) = setup();
    let err = repo
        .update_appointment(5, AppointmentUpdate::Status(AppointmentStatus::Completed))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound { entity: EntityKind::Appointment, id: 5 }
    ));
}

#[tokio::test]
async fn test_bill_status_update_changes_only_status() {
    let (_, repo) = setup();
    let (p, _) = seed(&repo).await;
    let id = repo
        .generate_bill(&NewBill {
            patient_id: p,
            total_amount: Decimal::from_str("120.50").unwrap(),
            payment_status: PaymentStatus::Pending,
        })
        .await
        .unwrap();
    let before = repo.bill(id).await.unwrap();

    repo.update_bill_status(id, PaymentStatus::Paid).await.unwrap();

    let after = repo.bill(id).await.unwrap();
    assert_eq!(after.bill.payment_status, PaymentStatus::Paid);
    assert_eq!(after.bill.total_amount, before.bill.total_amount);
    assert_eq!(after.bill.patient_id, before.bill.patient_id);
    assert_eq!(after.bill.billed_at, before.bill.billed_at);
    assert_eq!(after.patient_name, "John Doe");
}

#[tokio::test]
async fn test_bill_for_unknown_patient_writes_nothing() {
    let (storage, repo) = setup();
    seed(&repo).await;

    let err = repo
        .generate_bill(&NewBill {
            patient_id: 77,
            total_amount: Decimal::from_str("10.00").unwrap(),
            payment_status: PaymentStatus::Pending,
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(storage.row_counts().await[4], 0);

    let err = repo.update_bill_status(1, PaymentStatus::Paid).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound { entity: EntityKind::Bill, id: 1 }
    ));
}

#[tokio::test]
async fn test_billing_history_is_per_patient_most_recent_first() {
    let (_, repo) = setup();
    let (p, _) = seed(&repo).await;
    let other = repo.register_patient(&patient("other@example.com")).await.unwrap();

    for (who, amount) in [(p, "10.00"), (other, "99.00"), (p, "20.00")] {
        repo.generate_bill(&NewBill {
            patient_id: who,
            total_amount: Decimal::from_str(amount).unwrap(),
            payment_status: PaymentStatus::Pending,
        })
        .await
        .unwrap();
    }

    let history = repo.billing_history(p).await.unwrap();
    let amounts: Vec<String> = history.iter().map(|b| b.total_amount.to_string()).collect();
    assert_eq!(amounts, vec!["20.00", "10.00"]);

    assert!(repo.billing_history(404).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_medical_history_most_recent_first() {
    let (_, repo) = setup();
    let (p, d) = seed(&repo).await;

    for diagnosis in ["Flu", "Sprain"] {
        repo.add_medical_record(&NewMedicalRecord {
            patient_id: p,
            doctor_id: d,
            diagnosis: diagnosis.into(),
            prescription: "Rest".into(),
            treatment_plan: String::new(),
        })
        .await
        .unwrap();
    }

    let history = repo.medical_history(p).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].record.diagnosis, "Sprain");
    assert_eq!(history[1].record.diagnosis, "Flu");
    assert_eq!(history[0].doctor_name, "Jane Smith");

    let err = repo
        .add_medical_record(&NewMedicalRecord {
            patient_id: p,
            doctor_id: 9,
            diagnosis: "x".into(),
            prescription: String::new(),
            treatment_plan: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound { entity: EntityKind::Doctor, id: 9 }
    ));
    assert!(repo.medical_history(12).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_rows() {
    let (storage, repo) = setup();
    seed(&repo).await;

    let err = repo
        .register_patient(&patient("john@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(storage.row_counts().await[0], 1);

    let err = repo
        .register_patient(&patient("JOHN@Example.com"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(storage.row_counts().await[0], 1);

    let err = repo
        .register_doctor(&doctor("jane@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(storage.row_counts().await[1], 1);
}

#[tokio::test]
async fn test_patient_updates() {
    let (_, repo) = setup();
    let (p, _) = seed(&repo).await;
    repo.register_patient(&patient("taken@example.com")).await.unwrap();

    repo.update_patient(p, &PatientUpdate::ContactNumber("+15550001111".into()))
        .await
        .unwrap();
    repo.update_patient(p, &PatientUpdate::BloodGroup(None))
        .await
        .unwrap();
    // Re-submitting the patient's own email is not a conflict.
    repo.update_patient(p, &PatientUpdate::Email("john@example.com".into()))
        .await
        .unwrap();

    let stored = repo.patient(p).await.unwrap();
    assert_eq!(stored.contact_number, "+15550001111");
    assert_eq!(stored.blood_group, None);
    assert_eq!(stored.address, "1 Main St");

    let err = repo
        .update_patient(p, &PatientUpdate::Email("taken@example.com".into()))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    let err = repo
        .update_patient(p, &PatientUpdate::Email("not-an-email".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));

    let err = repo
        .update_patient(31, &PatientUpdate::Address("x".into()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_payload_never_opens_a_transaction() {
    let (storage, repo) = setup();
    let mut bad = patient("bad");
    bad.contact_number = "12".into();

    let err = repo.register_patient(&bad).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));
    assert_eq!(storage.row_counts().await, [0; 5]);
}

#[tokio::test]
async fn test_values_wider_than_their_columns_are_rejected() {
    let (storage, repo) = setup();

    let mut long_name = patient("john@example.com");
    long_name.first_name = "J".repeat(60);
    let err = repo.register_patient(&long_name).await.unwrap_err();
    assert!(err.to_string().contains("First Name must be at most 50 characters"));

    let mut long_department = doctor("jane@example.com");
    long_department.department = "D".repeat(101);
    let err = repo.register_doctor(&long_department).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));

    let long_email = format!("{}@example.com", "j".repeat(90));
    let err = repo.register_patient(&patient(&long_email)).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput { .. }));

    assert_eq!(storage.row_counts().await, [0; 5]);
}
