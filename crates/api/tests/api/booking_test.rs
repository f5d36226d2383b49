use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use trgnexus_core::models::booking::NewBooking;
use trgnexus_db::mock::{MockBookingStore, OnceConnector};
use trgnexus_notify::NotificationDispatcher;
use trgnexus_notify::mailer::MailSender;
use trgnexus_notify::config::WhatsAppConfig;
use trgnexus_notify::mailer::OutgoingEmail;
use trgnexus_notify::mock::MockMailSender;
use trgnexus_notify::whatsapp::WhatsAppClient;
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{
    DASHBOARD, accepted, build_server, build_server_timed, build_server_with, closing_store,
    recorded, therapist,
};

fn ana() -> Value {
    json!({
        "name": "Ana",
        "email": "ana@x.com",
        "date": "2024-05-01",
        "time": "10:00"
    })
}

#[tokio::test]
async fn test_booking_without_therapist() {
    let patient_id = Uuid::new_v4();

    let mut store = closing_store();
    store.expect_find_therapist().never();
    store
        .expect_record_booking()
        .withf(|booking: &NewBooking| {
            booking.name == "Ana"
                && booking.email == "ana@x.com"
                && booking.date == "2024-05-01"
                && booking.time == "10:00"
                && booking.therapist_id.is_none()
                && booking.anamnesis == "{}"
        })
        .times(1)
        .returning(move |_| Ok(recorded(patient_id, None)));

    let connector = Arc::new(OnceConnector::new(store));
    let server = build_server(Some(connector.clone()));

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Booking confirmed",
            "patientId": patient_id,
            "emailDebug": {
                "status": "skipped_no_credentials",
                "error": null,
                "info": null
            }
        })
    );
    assert_eq!(connector.connects(), 1);
}

#[tokio::test]
async fn test_booking_with_therapist_and_anamnesis() {
    let patient_id = Uuid::new_v4();
    let therapist_id = Uuid::new_v4();

    let mut store = closing_store();
    store
        .expect_find_therapist()
        .with(predicate::eq(therapist_id))
        .times(1)
        .returning(move |id| Ok(Some(therapist(id))));
    store
        .expect_record_booking()
        .withf(move |booking: &NewBooking| {
            booking.therapist_id == Some(therapist_id)
                && booking.phone.as_deref() == Some("(11) 98765-4321")
                && booking.main_complaint == "Ansiedade"
                && booking.anamnesis.contains("\"queixaPrincipal\": \"Ansiedade\"")
        })
        .times(1)
        .returning(move |_| Ok(recorded(patient_id, Some(Uuid::new_v4()))));

    let server = build_server(Some(Arc::new(OnceConnector::new(store))));

    let response = server
        .post("/api/booking")
        .json(&json!({
            "name": "Ana",
            "email": "ana@x.com",
            "phone": "(11) 98765-4321",
            "date": "2024-05-01",
            "time": "10:00",
            "therapistId": therapist_id.to_string(),
            "queixaPrincipal": "Ansiedade"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["patientId"], json!(patient_id));
}

#[tokio::test]
async fn test_unknown_therapist_still_books() {
    let patient_id = Uuid::new_v4();
    let therapist_id = Uuid::new_v4();

    let mut store = closing_store();
    store
        .expect_find_therapist()
        .times(1)
        .returning(|_| Ok(None));
    store
        .expect_record_booking()
        .times(1)
        .returning(move |_| Ok(recorded(patient_id, Some(Uuid::new_v4()))));

    let server = build_server(Some(Arc::new(OnceConnector::new(store))));

    let mut body = ana();
    body["therapistId"] = json!(therapist_id.to_string());
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_therapist_lookup_reaches_notifications() {
    let therapist_id = Uuid::new_v4();

    let mut store = closing_store();
    store
        .expect_find_therapist()
        .with(predicate::eq(therapist_id))
        .times(1)
        .returning(move |id| Ok(Some(therapist(id))));
    store
        .expect_record_booking()
        .times(1)
        .returning(|_| Ok(recorded(Uuid::new_v4(), Some(Uuid::new_v4()))));

    let mut mailer = MockMailSender::new();
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| {
            email.to == "paula@trg.com" && email.html.contains("<strong>Cliente:</strong> Ana")
        })
        .times(1)
        .returning(|_| accepted());
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| {
            email.to == "ana@x.com" && email.html.contains("<strong>Terapeuta:</strong> Dra. Paula")
        })
        .times(1)
        .returning(|_| accepted());
    let mailer: Arc<dyn MailSender> = Arc::new(mailer);

    let server = build_server_with(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(Some(mailer), None, DASHBOARD),
    );

    let mut body = ana();
    body["therapistId"] = json!(therapist_id.to_string());
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["emailDebug"]["status"], json!("sent"));
}

#[tokio::test]
async fn test_therapist_lookup_miss_uses_default_name() {
    let mut store = closing_store();
    store
        .expect_find_therapist()
        .times(1)
        .returning(|_| Ok(None));
    store
        .expect_record_booking()
        .times(1)
        .returning(|_| Ok(recorded(Uuid::new_v4(), Some(Uuid::new_v4()))));

    let mut mailer = MockMailSender::new();
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| {
            email.to == "ana@x.com"
                && email.html.contains("<strong>Terapeuta:</strong> Terapeuta TRG")
        })
        .times(1)
        .returning(|_| accepted());
    let mailer: Arc<dyn MailSender> = Arc::new(mailer);

    let server = build_server_with(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(Some(mailer), None, DASHBOARD),
    );

    let mut body = ana();
    body["therapistId"] = json!(Uuid::new_v4().to_string());
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_numeric_phone_is_stored_as_text() {
    let patient_id = Uuid::new_v4();

    let mut store = closing_store();
    store
        .expect_record_booking()
        .withf(|booking: &NewBooking| booking.phone.as_deref() == Some("11987654321"))
        .times(1)
        .returning(move |_| Ok(recorded(patient_id, None)));

    let server = build_server(Some(Arc::new(OnceConnector::new(store))));

    let mut body = ana();
    body["phone"] = json!(11987654321u64);
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["patientId"], json!(patient_id));
}

#[tokio::test]
async fn test_slow_notifications_outlast_request_timeout() {
    let whatsapp = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&whatsapp)
        .await;

    let client = WhatsAppClient::new(WhatsAppConfig {
        api_url: format!("{}/send-text", whatsapp.uri()),
        token: Some("secret-token".to_string()),
    })
    .unwrap();

    let mut store = closing_store();
    store
        .expect_record_booking()
        .times(1)
        .returning(|_| Ok(recorded(Uuid::new_v4(), None)));

    let server = build_server_timed(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(None, Some(client), DASHBOARD),
        Duration::from_millis(50),
    );

    let mut body = ana();
    body["phone"] = json!("(11) 98765-4321");
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], json!("Booking confirmed"));
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let connector = Arc::new(OnceConnector::unreachable());
    let server = build_server(Some(connector.clone()));

    let response = server.get("/api/booking").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Method not allowed" })
    );
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_missing_date_is_rejected() {
    let connector = Arc::new(OnceConnector::unreachable());
    let server = build_server(Some(connector.clone()));

    let mut body = ana();
    body.as_object_mut().unwrap().remove("date");
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Validation error: Missing required fields" })
    );
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let server = build_server(Some(Arc::new(OnceConnector::unreachable())));

    let response = server.post("/api/booking").text("name=Ana").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_therapist_id_is_rejected() {
    let server = build_server(Some(Arc::new(OnceConnector::unreachable())));

    let mut body = ana();
    body["therapistId"] = json!("42");
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_database_url() {
    let server = build_server(None);

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Configuration error: Missing Database URL" })
    );
}

#[tokio::test]
async fn test_unreachable_database() {
    let server = build_server(Some(Arc::new(OnceConnector::unreachable())));

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Database error: connection refused" })
    );
}

#[tokio::test]
async fn test_transaction_failure_closes_store_and_skips_notifications() {
    let mut store = closing_store();
    store
        .expect_record_booking()
        .times(1)
        .returning(|_| Err(eyre::eyre!("invalid input syntax for type date")));

    let mut mailer = MockMailSender::new();
    mailer.expect_send().never();
    let mailer: Arc<dyn MailSender> = Arc::new(mailer);

    let server = build_server_with(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(Some(mailer), None, DASHBOARD),
    );

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("invalid input syntax for type date"));
}

#[tokio::test]
async fn test_therapist_lookup_failure_is_server_error() {
    let mut store: MockBookingStore = closing_store();
    store
        .expect_find_therapist()
        .times(1)
        .returning(|_| Err(eyre::eyre!("relation \"therapists\" does not exist")));
    store.expect_record_booking().never();

    let server = build_server(Some(Arc::new(OnceConnector::new(store))));

    let mut body = ana();
    body["therapistId"] = json!(Uuid::new_v4().to_string());
    let response = server.post("/api/booking").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_email_failure_still_confirms_booking() {
    let patient_id = Uuid::new_v4();

    let mut store = closing_store();
    store
        .expect_record_booking()
        .times(1)
        .returning(move |_| Ok(recorded(patient_id, None)));

    let mut mailer = MockMailSender::new();
    mailer
        .expect_send()
        .times(1)
        .returning(|_| Err(eyre::eyre!("Connection refused")));
    let mailer: Arc<dyn MailSender> = Arc::new(mailer);

    let server = build_server_with(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(Some(mailer), None, DASHBOARD),
    );

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["emailDebug"]["status"], json!("error"));
    assert_eq!(body["emailDebug"]["error"], json!("Connection refused"));
}

#[tokio::test]
async fn test_email_sent_is_reported() {
    let mut store = closing_store();
    store
        .expect_record_booking()
        .times(1)
        .returning(|_| Ok(recorded(Uuid::new_v4(), None)));

    let mut mailer = MockMailSender::new();
    mailer
        .expect_send()
        .withf(|email| email.to == "ana@x.com")
        .times(1)
        .returning(|_| accepted());
    let mailer: Arc<dyn MailSender> = Arc::new(mailer);

    let server = build_server_with(
        Some(Arc::new(OnceConnector::new(store))),
        NotificationDispatcher::new(Some(mailer), None, DASHBOARD),
    );

    let response = server.post("/api/booking").json(&ana()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["emailDebug"],
        json!({
            "status": "sent",
            "error": null,
            "info": { "messageId": "<id@trgnexus.com>", "response": "250 2.0.0 OK" }
        })
    );
}
