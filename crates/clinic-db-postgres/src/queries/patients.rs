//! Queries against the `patients` table.

use clinic_core::{BloodGroup, EntityId, EntityKind, Gender, NewPatient, Patient, PatientUpdate};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool, PgRow};

use super::column;
use crate::error::{decode_error, query_error};

fn patient_from_row(row: &PgRow) -> Result<Patient, StorageError> {
    let gender: String = column(row, "gender")?;
    let blood_group: Option<String> = column(row, "blood_group")?;
    Ok(Patient {
        id: column(row, "patient_id")?,
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        date_of_birth: column(row, "date_of_birth")?,
        gender: gender.parse::<Gender>().map_err(decode_error)?,
        contact_number: column(row, "contact_number")?,
        email: column(row, "email")?,
        address: column(row, "address")?,
        blood_group: blood_group
            .as_deref()
            .map(str::parse::<BloodGroup>)
            .transpose()
            .map_err(decode_error)?,
        registered_at: column(row, "registration_date")?,
    })
}

pub async fn get(pool: &PgPool, id: EntityId) -> Result<Option<Patient>, StorageError> {
    let row = query(
        "SELECT patient_id, first_name, last_name, date_of_birth, gender, contact_number, \
         email, address, blood_group, registration_date \
         FROM patients WHERE patient_id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Patient, None))?;

    row.as_ref().map(patient_from_row).transpose()
}

pub async fn list(pool: &PgPool) -> Result<Vec<Patient>, StorageError> {
    let rows = query(
        "SELECT patient_id, first_name, last_name, date_of_birth, gender, contact_number, \
         email, address, blood_group, registration_date \
         FROM patients ORDER BY patient_id",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Patient, None))?;

    rows.iter().map(patient_from_row).collect()
}

/// Locks the row against deletion until the transaction ends.
pub async fn exists(conn: &mut PgConnection, id: EntityId) -> Result<bool, StorageError> {
    let found: Option<EntityId> =
        query_scalar("SELECT patient_id FROM patients WHERE patient_id = $1 FOR KEY SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| query_error(e, EntityKind::Patient, None))?;
    Ok(found.is_some())
}

pub async fn insert(
    conn: &mut PgConnection,
    patient: &NewPatient,
) -> Result<EntityId, StorageError> {
    query_scalar(
        "INSERT INTO patients \
         (first_name, last_name, date_of_birth, gender, contact_number, email, \
         address, blood_group) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING patient_id",
    )
    .bind(patient.first_name.as_str())
    .bind(patient.last_name.as_str())
    .bind(patient.date_of_birth)
    .bind(patient.gender.as_str())
    .bind(patient.contact_number.as_str())
    .bind(patient.email.as_str())
    .bind(patient.address.as_str())
    .bind(patient.blood_group.map(|g| g.as_str()))
    .fetch_one(conn)
    .await
    .map_err(|e| query_error(e, EntityKind::Patient, Some(&patient.email)))
}

pub async fn update(
    conn: &mut PgConnection,
    id: EntityId,
    update: &PatientUpdate,
) -> Result<bool, StorageError> {
    let (sql, value, email) = match update {
        PatientUpdate::ContactNumber(phone) => (
            "UPDATE patients SET contact_number = $2 WHERE patient_id = $1",
            Some(phone.as_str()),
            None,
        ),
        PatientUpdate::Email(email) => (
            "UPDATE patients SET email = $2 WHERE patient_id = $1",
            Some(email.as_str()),
            Some(email.as_str()),
        ),
        PatientUpdate::Address(address) => (
            "UPDATE patients SET address = $2 WHERE patient_id = $1",
            Some(address.as_str()),
            None,
        ),
        PatientUpdate::BloodGroup(group) => (
            "UPDATE patients SET blood_group = $2 WHERE patient_id = $1",
            group.map(|g| g.as_str()),
            None,
        ),
    };

    let result = query(sql)
        .bind(id)
        .bind(value)
        .execute(conn)
        .await
        .map_err(|e| query_error(e, EntityKind::Patient, email))?;
    Ok(result.rows_affected() > 0)
}
