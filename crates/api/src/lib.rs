//! # TRG Nexus API
//!
//! The API crate provides the web server for the TRG Nexus booking flow. It
//! exposes the public booking endpoint used by the intake form and a couple
//! of operational endpoints.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Database access goes through the
//! `trgnexus-db` store traits and notifications through `trgnexus-notify`.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use eyre::Result;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use trgnexus_db::store::{PgStoreConnector, StoreConnector};
use trgnexus_notify::NotificationDispatcher;

/// Shared application state that is accessible to all request handlers
///
/// Nothing in here holds a database connection: each booking request opens
/// its own pool through `store` and closes it before responding.
pub struct ApiState {
    /// Opens a request-scoped booking store, `None` without a database URL
    pub store: Option<Arc<dyn StoreConnector>>,
    /// Best-effort delivery of booking confirmations
    pub dispatcher: NotificationDispatcher,
}

impl ApiState {
    /// Builds the state from configuration
    pub fn from_config(config: &config::ApiConfig) -> Result<Self> {
        let store = match &config.database {
            Some(settings) => {
                Some(Arc::new(PgStoreConnector::new(settings.clone())) as Arc<dyn StoreConnector>)
            }
            None => {
                warn!("No database URL configured; booking requests will fail");
                None
            }
        };

        let dispatcher = NotificationDispatcher::from_config(&config.notify)?;

        Ok(Self { store, dispatcher })
    }
}

/// Builds the application router with all routes attached to `state`
///
/// `request_timeout` bounds the operational endpoints only. The booking
/// endpoint always runs to completion so that a committed booking is never
/// answered with a timeout while notifications are still in flight.
pub fn app(state: Arc<ApiState>, request_timeout: Duration) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes().layer(TimeoutLayer::new(request_timeout)))
        // Booking endpoint
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration
///
/// Initializes logging, builds the shared state, applies CORS and request
/// tracing layers, and serves until the process is stopped.
pub async fn start_server(config: config::ApiConfig) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_config(&config)?);
    info!(
        "Channels configured: database={}, smtp={}, whatsapp={}",
        state.store.is_some(),
        state.dispatcher.email_configured(),
        state.dispatcher.whatsapp_configured()
    );

    let app = app(state, Duration::from_secs(config.request_timeout));

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed = origins
            .iter()
            .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();

        let cors = CorsLayer::new()
            .allow_methods([axum::http::Method::POST, axum::http::Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
            .allow_origin(allowed);

        app.layer(cors)
    } else {
        app
    };

    // Request logging
    let app = app.layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
