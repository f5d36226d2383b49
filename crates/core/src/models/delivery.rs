use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::booking::{DEFAULT_THERAPIST_NAME, NewBooking};

/// Everything the notification channels need to know about a committed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingNotice {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    pub therapist_name: String,
    pub therapist_email: Option<String>,
    pub main_complaint: String,
}

impl BookingNotice {
    pub fn new(
        booking: &NewBooking,
        therapist_name: Option<String>,
        therapist_email: Option<String>,
    ) -> Self {
        Self {
            name: booking.name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            date: booking.date.clone(),
            time: booking.time.clone(),
            therapist_name: therapist_name
                .unwrap_or_else(|| DEFAULT_THERAPIST_NAME.to_string()),
            therapist_email: therapist_email.filter(|e| !e.trim().is_empty()),
            main_complaint: booking.main_complaint.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    SkippedNoCredentials,
    Error,
}

/// Outcome of the patient confirmation email, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub status: DeliveryStatus,
    pub error: Option<String>,
    pub info: Option<Value>,
}

impl DeliveryReport {
    pub fn sent(info: Value) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            error: None,
            info: Some(info),
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: DeliveryStatus::SkippedNoCredentials,
            error: None,
            info: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Error,
            error: Some(error.into()),
            info: None,
        }
    }
}
