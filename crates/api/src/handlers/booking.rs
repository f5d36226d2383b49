//! # Booking Handlers
//!
//! `POST /api/booking` records a first session for a patient and then
//! notifies everyone involved. Notification delivery happens after the
//! commit, so a booking stays confirmed even when every channel fails.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{info, warn};
use trgnexus_core::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{BookingRequest, BookingResponse, NewBooking},
        delivery::BookingNotice,
    },
};
use trgnexus_db::{models::RecordedBooking, store::BookingStore};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    payload: Option<Json<BookingRequest>>,
) -> Result<Json<BookingResponse>, AppError> {
    // An unreadable body is treated like an empty form
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let booking = request.validate().inspect_err(|err| {
        warn!("Rejected booking request: {}", err);
    })?;

    let connector = state
        .store
        .as_ref()
        .ok_or_else(|| BookingError::Configuration("Missing Database URL".to_string()))?;

    let store = connector.connect().await.map_err(BookingError::Database)?;
    let outcome = record(store.as_ref(), &booking).await;
    store.close().await;
    let (recorded, notice) = outcome?;

    info!(
        "Booking confirmed: patient_id={}, new_patient={}, appointment_id={}",
        recorded.patient_id, recorded.patient_created, recorded.appointment_id
    );

    let email_debug = state.dispatcher.dispatch(&notice).await;

    Ok(Json(BookingResponse::confirmed(recorded.patient_id, email_debug)))
}

/// Anything other than POST on the booking route.
pub async fn method_not_allowed() -> AppError {
    AppError(BookingError::MethodNotAllowed)
}

/// Resolves the therapist contact and runs the booking transaction.
async fn record(
    store: &dyn BookingStore,
    booking: &NewBooking,
) -> BookingResult<(RecordedBooking, BookingNotice)> {
    let therapist = match booking.therapist_id {
        Some(id) => {
            let therapist = store.find_therapist(id).await?;
            if therapist.is_none() {
                warn!("Therapist {} not found, using default display name", id);
            }
            therapist
        }
        None => None,
    };

    let recorded = store.record_booking(booking).await?;

    let (therapist_name, therapist_email) = match therapist {
        Some(therapist) => (Some(therapist.name), therapist.email),
        None => (None, None),
    };

    Ok((
        recorded,
        BookingNotice::new(booking, therapist_name, therapist_email),
    ))
}
