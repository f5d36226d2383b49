use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use chrono::Utc;
use trgnexus_api::{ApiState, app};
use trgnexus_db::mock::{MockBookingStore, OnceConnector};
use trgnexus_db::models::{DbTherapist, RecordedBooking};
use trgnexus_db::store::StoreConnector;
use trgnexus_notify::NotificationDispatcher;
use trgnexus_notify::mailer::SentEmail;
use uuid::Uuid;

pub const DASHBOARD: &str = "https://dash.trg.test";

/// Server whose store comes from `connector`; no notification channel is configured.
pub fn build_server(connector: Option<Arc<OnceConnector>>) -> TestServer {
    build_server_with(connector, NotificationDispatcher::new(None, None, DASHBOARD))
}

pub fn build_server_with(
    connector: Option<Arc<OnceConnector>>,
    dispatcher: NotificationDispatcher,
) -> TestServer {
    build_server_timed(connector, dispatcher, Duration::from_secs(30))
}

pub fn build_server_timed(
    connector: Option<Arc<OnceConnector>>,
    dispatcher: NotificationDispatcher,
    request_timeout: Duration,
) -> TestServer {
    let state = Arc::new(ApiState {
        store: connector.map(|c| c as Arc<dyn StoreConnector>),
        dispatcher,
    });

    TestServer::new(app(state, request_timeout)).expect("Failed to build test server")
}

/// A store that must be closed exactly once.
pub fn closing_store() -> MockBookingStore {
    let mut store = MockBookingStore::new();
    store.expect_close().times(1).return_const(());
    store
}

pub fn recorded(patient_id: Uuid, notification_id: Option<Uuid>) -> RecordedBooking {
    RecordedBooking {
        patient_id,
        patient_created: true,
        appointment_id: Uuid::new_v4(),
        notification_id,
    }
}

pub fn therapist(id: Uuid) -> DbTherapist {
    DbTherapist {
        id,
        name: "Dra. Paula".to_string(),
        email: Some("paula@trg.com".to_string()),
        created_at: Utc::now(),
    }
}

/// Mail sender expectation result for an accepted message.
pub fn accepted() -> eyre::Result<SentEmail> {
    Ok(SentEmail {
        message_id: "<id@trgnexus.com>".to_string(),
        response: "250 2.0.0 OK".to_string(),
    })
}
