//! HTTP status publisher for the cascade scanner.
//!
//! Serves the tracker's latest snapshot at `GET /api/status` so overlays and
//! browser widgets can poll it. The handler only reads the published
//! snapshot and never touches the tracking loop.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cascade_core::SessionTracker;
use cascade_types::StatusSnapshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const STATUS_ROUTE: &str = "/api/status";

/// Build the router with permissive CORS and request tracing.
pub fn router(tracker: Arc<SessionTracker>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(STATUS_ROUTE, get(status))
        .fallback(not_found)
        .with_state(tracker)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn status(State(tracker): State<Arc<SessionTracker>>) -> Json<StatusSnapshot> {
    Json(StatusSnapshot::clone(&tracker.snapshot()))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
