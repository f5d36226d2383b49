use crate::models::DbTherapist;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_therapist_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTherapist>> {
    tracing::debug!("Getting therapist by id: {}", id);

    let therapist = sqlx::query_as::<_, DbTherapist>(
        r#"
        SELECT id, name, email, created_at
        FROM therapists
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if therapist.is_none() {
        tracing::debug!("Therapist not found: id={}", id);
    }

    Ok(therapist)
}
