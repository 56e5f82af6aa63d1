//! HTTP server for the relay.
//!
//! Provides endpoints for:
//! - Library refresh (`/refresh`)

use std::sync::Arc;

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;

pub use handlers::{run_refresh, SUCCESS_BODY};

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Every method is routed so the handler can log and reject it.
        .route("/refresh", any(handlers::refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
