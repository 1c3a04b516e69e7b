//! Queries against the `doctors` table.

use clinic_core::{Doctor, EntityId, EntityKind, NewDoctor};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool, PgRow};

use super::column;
use crate::error::query_error;

fn doctor_from_row(row: &PgRow) -> Result<Doctor, StorageError> {
    Ok(Doctor {
        id: column(row, "doctor_id")?,
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        specialization: column(row, "specialization")?,
        contact_number: column(row, "contact_number")?,
        email: column(row, "email")?,
        department: column(row, "department")?,
        joining_date: column(row, "joining_date")?,
        consultation_fee: column(row, "consultation_fee")?,
    })
}

pub async fn get(pool: &PgPool, id: EntityId) -> Result<Option<Doctor>, StorageError> {
    let row = query(
        "SELECT doctor_id, first_name, last_name, specialization, contact_number, email, \
         department, joining_date, consultation_fee \
         FROM doctors WHERE doctor_id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Doctor, None))?;

    row.as_ref().map(doctor_from_row).transpose()
}

pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>, StorageError> {
    let rows = query(
        "SELECT doctor_id, first_name, last_name, specialization, contact_number, email, \
         department, joining_date, consultation_fee \
         FROM doctors ORDER BY doctor_id",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Doctor, None))?;

    rows.iter().map(doctor_from_row).collect()
}

pub async fn exists(conn: &mut PgConnection, id: EntityId) -> Result<bool, StorageError> {
    let found: Option<EntityId> =
        query_scalar("SELECT doctor_id FROM doctors WHERE doctor_id = $1 FOR KEY SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| query_error(e, EntityKind::Doctor, None))?;
    Ok(found.is_some())
}

pub async fn insert(conn: &mut PgConnection, doctor: &NewDoctor) -> Result<EntityId, StorageError> {
    query_scalar(
        "INSERT INTO doctors \
         (first_name, last_name, specialization, contact_number, email, department, \
          joining_date, consultation_fee) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING doctor_id",
    )
    .bind(doctor.first_name.as_str())
    .bind(doctor.last_name.as_str())
    .bind(doctor.specialization.as_str())
    .bind(doctor.contact_number.as_str())
    .bind(doctor.email.as_str())
    .bind(doctor.department.as_str())
    .bind(doctor.joining_date)
    .bind(doctor.consultation_fee)
    .fetch_one(conn)
    .await
    .map_err(|e| query_error(e, EntityKind::Doctor, Some(&doctor.email)))
}
