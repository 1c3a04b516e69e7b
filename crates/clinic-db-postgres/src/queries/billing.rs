//! Queries against the `billing` table.

use clinic_core::{Bill, BillDetails, EntityId, EntityKind, NewBill, PaymentStatus};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool, PgRow};

use super::column;
use crate::error::{decode_error, query_error};

fn bill_from_row(row: &PgRow) -> Result<Bill, StorageError> {
    let status: String = column(row, "payment_status")?;
    Ok(Bill {
        id: column(row, "bill_id")?,
        patient_id: column(row, "patient_id")?,
        total_amount: column(row, "total_amount")?,
        payment_status: status.parse::<PaymentStatus>().map_err(decode_error)?,
        billed_at: column(row, "bill_date")?,
    })
}

pub async fn get(pool: &PgPool, id: EntityId) -> Result<Option<BillDetails>, StorageError> {
    let row = query(
        "SELECT b.bill_id, b.patient_id, b.total_amount, b.payment_status, b.bill_date, \
         p.first_name || ' ' || p.last_name AS patient_name \
         FROM billing b \
         JOIN patients p ON p.patient_id = b.patient_id \
         WHERE b.bill_id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Bill, None))?;

    row.as_ref()
        .map(|row| {
            Ok(BillDetails {
                bill: bill_from_row(row)?,
                patient_name: column(row, "patient_name")?,
            })
        })
        .transpose()
}

/// Bills of one patient, most recent first.
pub async fn list_for_patient(
    pool: &PgPool,
    patient_id: EntityId,
) -> Result<Vec<Bill>, StorageError> {
    let rows = query(
        "SELECT bill_id, patient_id, total_amount, payment_status, bill_date \
         FROM billing WHERE patient_id = $1 \
         ORDER BY bill_date DESC, bill_id DESC",
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await
    .map_err(|e| query_error(e, EntityKind::Bill, None))?;

    rows.iter().map(bill_from_row).collect()
}

pub async fn insert(conn: &mut PgConnection, bill: &NewBill) -> Result<EntityId, StorageError> {
    query_scalar(
        "INSERT INTO billing (patient_id, total_amount, payment_status) \
         VALUES ($1, $2, $3) \
         RETURNING bill_id",
    )
    .bind(bill.patient_id)
    .bind(bill.total_amount)
    .bind(bill.payment_status.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| query_error(e, EntityKind::Bill, None))
}

pub async fn update_status(
    conn: &mut PgConnection,
    id: EntityId,
    status: PaymentStatus,
) -> Result<bool, StorageError> {
    let result = query("UPDATE billing SET payment_status = $2 WHERE bill_id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(conn)
        .await
        .map_err(|e| query_error(e, EntityKind::Bill, None))?;
    Ok(result.rows_affected() > 0)
}
