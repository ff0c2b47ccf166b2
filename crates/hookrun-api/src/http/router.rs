//! Axum router configuration with middleware.
//!
//! Static routes (`/`, `/health`, `/manual/{project}`) take priority over
//! the catch-all `POST /{project}` webhook route. Middleware: CORS and
//! request tracing.

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .route("/manual/{project}", post(handlers::manual::manual_trigger))
        .route("/{project}", post(handlers::webhook::receive_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origins and the headers the trigger
/// routes actually read.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-hub-signature-256"),
            HeaderName::from_static("x-password"),
        ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
