use crate::models::DbNotification;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn create_notification(
    conn: &mut PgConnection,
    recipient_id: Uuid,
    recipient_role: &str,
    title: &str,
    message: &str,
    kind: &str,
) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO notifications (recipient_id, recipient_role, title, message, type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(recipient_id)
    .bind(recipient_role)
    .bind(title)
    .bind(message)
    .bind(kind)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!("Notification created: id={}, recipient_id={}", id, recipient_id);
    Ok(id)
}

pub async fn get_notifications_for_recipient(
    conn: &mut PgConnection,
    recipient_id: Uuid,
) -> Result<Vec<DbNotification>> {
    let notifications = sqlx::query_as::<_, DbNotification>(
        r#"
        SELECT id, recipient_id, recipient_role, title, message, type, read, created_at
        FROM notifications
        WHERE recipient_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(recipient_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(notifications)
}
