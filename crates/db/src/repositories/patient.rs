use crate::models::DbPatient;
use eyre::Result;
use sqlx::PgConnection;
use trgnexus_core::models::booking::PATIENT_STATUS_ACTIVE;
use uuid::Uuid;

pub async fn find_patient_id_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<Uuid>> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM patients WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn get_patient_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, email, phone, status, notes, therapist_id, created_at
        FROM patients
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(patient)
}

/// Refreshes the contact details of a returning patient.
pub async fn update_patient_contact(
    conn: &mut PgConnection,
    id: Uuid,
    name: &str,
    phone: Option<&str>,
) -> Result<()> {
    tracing::debug!("Updating contact details of patient: id={}", id);

    sqlx::query(
        r#"
        UPDATE patients
        SET name = $1, phone = $2
        WHERE id = $3
        "#,
    )
    .bind(name)
    .bind(phone)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn create_patient(
    conn: &mut PgConnection,
    name: &str,
    email: &str,
    phone: Option<&str>,
    notes: &str,
    therapist_id: Option<Uuid>,
) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO patients (name, email, phone, status, notes, therapist_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(PATIENT_STATUS_ACTIVE)
    .bind(notes)
    .bind(therapist_id)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!("Patient created: id={}", id);
    Ok(id)
}
