use crate::models::DbAppointment;
use eyre::Result;
use sqlx::PgConnection;
use trgnexus_core::models::booking::{APPOINTMENT_STATUS_SCHEDULED, APPOINTMENT_TYPE_FIRST_SESSION};
use uuid::Uuid;

/// Inserts a first-session appointment.
///
/// `date` and `time` are passed through as text and cast by Postgres, so a
/// malformed value fails the statement.
pub async fn create_appointment(
    conn: &mut PgConnection,
    patient_id: Uuid,
    date: &str,
    time: &str,
    notes: &str,
    therapist_id: Option<Uuid>,
) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO appointments (patient_id, date, time, status, type, notes, therapist_id)
        VALUES ($1, $2::date, $3::time, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(patient_id)
    .bind(date)
    .bind(time)
    .bind(APPOINTMENT_STATUS_SCHEDULED)
    .bind(APPOINTMENT_TYPE_FIRST_SESSION)
    .bind(notes)
    .bind(therapist_id)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!("Appointment created: id={}, patient_id={}", id, patient_id);
    Ok(id)
}

pub async fn get_appointments_by_patient_id(
    conn: &mut PgConnection,
    patient_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_id, date, time, status, type, notes, therapist_id, created_at
        FROM appointments
        WHERE patient_id = $1
        ORDER BY date, time
        "#,
    )
    .bind(patient_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(appointments)
}
