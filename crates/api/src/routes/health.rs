use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

/// Liveness plus which integrations are configured.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: bool,
    smtp: bool,
    whatsapp: bool,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        database: state.store.is_some(),
        smtp: state.dispatcher.email_configured(),
        whatsapp: state.dispatcher.whatsapp_configured(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
