//! Queries against the `appointments` table, joined with patient and doctor names.

use clinic_core::{
    Appointment, AppointmentDetails, AppointmentStatus, AppointmentUpdate, EntityId, EntityKind,
    NewAppointment,
};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool, PgRow};

use super::column;
use crate::error::{decode_error, query_error};

const SELECT_DETAILS: &str = "SELECT a.appointment_id, a.patient_id, a.doctor_id, \
     a.appointment_date, a.appointment_time, a.status, a.reason, \
     p.first_name || ' ' || p.last_name AS patient_name, \
     d.first_name || ' ' || d.last_name AS doctor_name, \
     d.specialization AS doctor_specialization \
     FROM appointments a \
     JOIN patients p ON p.patient_id = a.patient_id \
     JOIN doctors d ON d.doctor_id = a.doctor_id";

fn details_from_row(row: &PgRow) -> Result<AppointmentDetails, StorageError> {
    let status: String = column(row, "status")?;
    Ok(AppointmentDetails {
        appointment: Appointment {
            id: column(row, "appointment_id")?,
            patient_id: column(row, "patient_id")?,
            doctor_id: column(row, "doctor_id")?,
            date: column(row, "appointment_date")?,
            time: column(row, "appointment_time")?,
            status: status.parse::<AppointmentStatus>().map_err(decode_error)?,
            reason: column(row, "reason")?,
        },
        patient_name: column(row, "patient_name")?,
        doctor_name: column(row, "doctor_name")?,
        doctor_specialization: column(row, "doctor_specialization")?,
    })
}

pub async fn get(pool: &PgPool, id: EntityId) -> Result<Option<AppointmentDetails>, StorageError> {
    let sql = format!("{SELECT_DETAILS} WHERE a.appointment_id = $1");
    let row = query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_error(e, EntityKind::Appointment, None))?;

    row.as_ref().map(details_from_row).transpose()
}

pub async fn list(pool: &PgPool) -> Result<Vec<AppointmentDetails>, StorageError> {
    let sql = format!(
        "{SELECT_DETAILS} ORDER BY a.appointment_date, a.appointment_time, a.appointment_id"
    );
    let rows = query(&sql)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error(e, EntityKind::Appointment, None))?;

    rows.iter().map(details_from_row).collect()
}

pub async fn insert(
    conn: &mut PgConnection,
    appointment: &NewAppointment,
) -> Result<EntityId, StorageError> {
    query_scalar(
        "INSERT INTO appointments \
         (patient_id, doctor_id, appointment_date, appointment_time, status, reason) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING appointment_id",
    )
    .bind(appointment.patient_id)
    .bind(appointment.doctor_id)
    .bind(appointment.date)
    .bind(appointment.time)
    .bind(AppointmentStatus::Scheduled.as_str())
    .bind(appointment.reason.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| query_error(e, EntityKind::Appointment, None))
}

pub async fn update(
    conn: &mut PgConnection,
    id: EntityId,
    update: &AppointmentUpdate,
) -> Result<bool, StorageError> {
    let result = match *update {
        AppointmentUpdate::Status(status) => {
            query("UPDATE appointments SET status = $2 WHERE appointment_id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(conn)
                .await
        }
        AppointmentUpdate::Reschedule { date, time } => {
            query(
                "UPDATE appointments SET appointment_date = $2, appointment_time = $3 \
                 WHERE appointment_id = $1",
            )
            .bind(id)
            .bind(date)
            .bind(time)
            .execute(conn)
            .await
        }
        AppointmentUpdate::Cancel => {
            query("UPDATE appointments SET status = $2 WHERE appointment_id = $1")
                .bind(id)
                .bind(AppointmentStatus::Cancelled.as_str())
                .execute(conn)
                .await
        }
    }
    .map_err(|e| query_error(e, EntityKind::Appointment, None))?;

    Ok(result.rows_affected() > 0)
}
