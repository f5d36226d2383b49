use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::delivery::DeliveryReport;

/// Intake field holding the patient's main complaint.
pub const MAIN_COMPLAINT_FIELD: &str = "queixaPrincipal";
pub const MAIN_COMPLAINT_FALLBACK: &str = "Não informado";

/// Display name used when no therapist is assigned or the lookup misses.
pub const DEFAULT_THERAPIST_NAME: &str = "Terapeuta TRG";

pub const PATIENT_STATUS_ACTIVE: &str = "Ativo";
pub const APPOINTMENT_STATUS_SCHEDULED: &str = "Agendado";
pub const APPOINTMENT_TYPE_FIRST_SESSION: &str = "Primeira Consulta";

pub const NOTIFICATION_ROLE_THERAPIST: &str = "therapist";
pub const NOTIFICATION_TITLE_NEW_BOOKING: &str = "Novo Agendamento";
pub const NOTIFICATION_TYPE_INFO: &str = "info";

/// Raw booking form submission.
///
/// Every field is optional at this stage so that a missing value surfaces as
/// a validation error instead of a deserialization rejection. Numbers and
/// booleans in the contact and slot fields are taken as text. Anything the
/// form sends beyond those fields is anamnesis data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(rename = "therapistId", default, deserialize_with = "lenient_text")]
    pub therapist_id: Option<String>,
    #[serde(flatten)]
    pub anamnesis: Map<String, Value>,
}

/// A booking that passed validation and is ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    pub therapist_id: Option<Uuid>,
    /// Anamnesis fields serialized as pretty-printed JSON.
    pub anamnesis: String,
    pub main_complaint: String,
}

/// Text form of a submitted value, `None` for null, `false` and zero.
///
/// Empty strings are kept so callers can decide whether they count.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl BookingRequest {
    /// Checks the required fields and turns the submission into a [`NewBooking`].
    pub fn validate(self) -> BookingResult<NewBooking> {
        let (Some(name), Some(email), Some(date), Some(time)) = (
            present(self.name),
            present(self.email),
            present(self.date),
            present(self.time),
        ) else {
            return Err(BookingError::Validation("Missing required fields".to_string()));
        };

        let therapist_id = match present(self.therapist_id) {
            Some(raw) => Some(Uuid::parse_str(raw.trim()).map_err(|_| {
                BookingError::Validation(format!("Invalid therapistId: {}", raw))
            })?),
            None => None,
        };

        let complaint = self.anamnesis.get(MAIN_COMPLAINT_FIELD).and_then(value_text);
        let main_complaint =
            present(complaint).unwrap_or_else(|| MAIN_COMPLAINT_FALLBACK.to_string());

        let anamnesis = serde_json::to_string_pretty(&self.anamnesis)
            .map_err(|e| BookingError::Internal(Box::new(e)))?;

        Ok(NewBooking {
            name,
            email,
            phone: present(self.phone),
            date,
            time,
            therapist_id,
            anamnesis,
            main_complaint,
        })
    }
}

impl NewBooking {
    /// Notes stored on a freshly created patient.
    pub fn patient_notes(&self) -> String {
        format!("Queixa Principal: {}", self.main_complaint)
    }

    /// Body of the in-app notification left for the therapist.
    pub fn therapist_notification_message(&self) -> String {
        format!(
            "{} agendou uma sessão para {} às {}.",
            self.name, self.date, self.time
        )
    }
}

/// Successful booking payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub message: String,
    pub patient_id: Uuid,
    pub email_debug: DeliveryReport,
}

impl BookingResponse {
    pub fn confirmed(patient_id: Uuid, email_debug: DeliveryReport) -> Self {
        Self {
            message: "Booking confirmed".to_string(),
            patient_id,
            email_debug,
        }
    }
}
