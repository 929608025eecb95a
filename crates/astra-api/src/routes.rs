//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, and body limits, and
//! binds the HTTP server.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The web widget may be served from anywhere; the API carries no
    // credentials, so a permissive CORS policy is acceptable here.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/query", post(handlers::query))
        .route("/webhook/whatsapp", post(handlers::whatsapp_webhook))
        .route("/webhook/whatsapp/status", get(handlers::webhook_status))
        .route("/health", get(handlers::health))
        .route("/api/stats", get(handlers::stats))
        .route("/api/explore/{category}", get(handlers::explore))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
pub async fn start_server(state: AppState) -> Result<(), astra_core::AstraError> {
    let port = state.config.general.port;
    let addr = format!("0.0.0.0:{}", port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| astra_core::AstraError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| astra_core::AstraError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
