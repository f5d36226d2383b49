//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and JSON error bodies so every
//! failure reaches the client as `{"error": "<message>"}`.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use trgnexus_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use trgnexus_api::middleware::error_handling::AppError;
/// use trgnexus_core::errors::BookingError;
///
/// async fn handler() -> Result<&'static str, AppError> {
///     Err(AppError(BookingError::Validation("Missing required fields".to_string())))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            BookingError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        let mut response = (status, Json(json!({ "error": message }))).into_response();

        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Unclassified `eyre` reports are treated as database failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
