use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/booking",
        post(handlers::booking::create_booking).fallback(handlers::booking::method_not_allowed),
    )
}
