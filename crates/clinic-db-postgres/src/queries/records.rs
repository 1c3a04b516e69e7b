//! Queries against the `medical_records` table.

use clinic_core::{EntityId, EntityKind, MedicalRecord, MedicalRecordDetails, NewMedicalRecord};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool, PgRow};

use super::column;
use crate::error::query_error;

fn details_from_row(row: &PgRow) -> Result<MedicalRecordDetails, StorageError> {
    Ok(MedicalRecordDetails {
        record: MedicalRecord {
            id: column(row, "record_id")?,
            patient_id: column(row, "patient_id")?,
            doctor_id: column(row, "doctor_id")?,
            diagnosis: column(row, "diagnosis")?,
            prescription: column(row, "prescription")?,
            treatment_plan: column(row, "treatment_plan")?,
            visited_at: column(row, "visit_date")?,
        },
        doctor_name: column(row, "doctor_name")?,
    })
}

/// Records of one patient, most recent visit first.
pub async fn list_for_patient(
    pool: &PgPool,
    patient_id: EntityId,
) -> Result<Vec<MedicalRecordDetails>, StorageError> {
    let rows = query(
        "SELECT m.record_id, m.patient_id, m.doctor_id, m.diagnosis, m.prescription, \
         m.treatment_plan, m.visit_date, \
         d.first_name || ' ' || d.last_name AS doctor_name \
         FROM medical_records m \
         JOIN doctors d ON d.doctor_id = m.doctor_id \
         WHERE m.patient_id = $1 \
         ORDER BY m.visit_date DESC, m.record_id DESC",
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::MedicalRecord, None))?;

    rows.iter().map(details_from_row).collect()
}

pub async fn insert(
    conn: &mut PgConnection,
    record: &NewMedicalRecord,
) -> Result<EntityId, StorageError> {
    query_scalar(
        "INSERT INTO medical_records \
         (patient_id, doctor_id, diagnosis, prescription, treatment_plan) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING record_id",
    )
    .bind(record.patient_id)
    .bind(record.doctor_id)
    .bind(record.diagnosis.as_str())
    .bind(record.prescription.as_str())
    .bind(record.treatment_plan.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| query_error(e, EntityKind::MedicalRecord, None))
}
