//! The booking write path: one transaction covering the patient upsert, the
//! appointment and the therapist notification.

use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::{debug, error, warn};
use trgnexus_core::models::booking::{
    NOTIFICATION_ROLE_THERAPIST, NOTIFICATION_TITLE_NEW_BOOKING, NOTIFICATION_TYPE_INFO,
    NewBooking,
};
use uuid::Uuid;

use crate::models::RecordedBooking;
use crate::repositories::{appointment, notification, patient};

/// Writes a booking atomically.
///
/// Any failing statement rolls back the whole transaction, leaving no
/// patient, appointment, or notification row behind.
pub async fn record_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<RecordedBooking> {
    let mut tx = pool.begin().await?;

    match write_booking(&mut *tx, booking).await {
        Ok(recorded) => {
            tx.commit().await?;
            debug!(
                "Booking committed: patient_id={}, appointment_id={}",
                recorded.patient_id, recorded.appointment_id
            );
            Ok(recorded)
        }
        Err(err) => {
            error!("Booking transaction failed, rolling back: {:#}", err);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn write_booking(conn: &mut PgConnection, booking: &NewBooking) -> Result<RecordedBooking> {
    let (patient_id, patient_created) = upsert_patient(conn, booking).await?;

    let appointment_id = appointment::create_appointment(
        conn,
        patient_id,
        &booking.date,
        &booking.time,
        &booking.anamnesis,
        booking.therapist_id,
    )
    .await?;

    let notification_id = match booking.therapist_id {
        Some(therapist_id) => Some(
            notification::create_notification(
                conn,
                therapist_id,
                NOTIFICATION_ROLE_THERAPIST,
                NOTIFICATION_TITLE_NEW_BOOKING,
                &booking.therapist_notification_message(),
                NOTIFICATION_TYPE_INFO,
            )
            .await?,
        ),
        None => None,
    };

    Ok(RecordedBooking {
        patient_id,
        patient_created,
        appointment_id,
        notification_id,
    })
}

/// Matches the patient by email; a returning patient keeps their id and gets
/// name and phone refreshed.
async fn upsert_patient(conn: &mut PgConnection, booking: &NewBooking) -> Result<(Uuid, bool)> {
    match patient::find_patient_id_by_email(conn, &booking.email).await? {
        Some(id) => {
            patient::update_patient_contact(conn, id, &booking.name, booking.phone.as_deref())
                .await?;
            Ok((id, false))
        }
        None => {
            let id = patient::create_patient(
                conn,
                &booking.name,
                &booking.email,
                booking.phone.as_deref(),
                &booking.patient_notes(),
                booking.therapist_id,
            )
            .await?;
            Ok((id, true))
        }
    }
}
