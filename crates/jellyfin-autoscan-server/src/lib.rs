//! jellyfin-autoscan server library
//!
//! Exposes `GET /refresh`, which looks up Jellyfin's `RefreshLibrary`
//! scheduled task and starts it.

pub mod error;
pub mod http;
pub mod logging;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

pub use error::RefreshError;
pub use state::AppState;

/// Default listen address: every interface, port 8282.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8282";

/// Default log file, appended to on every start.
pub const DEFAULT_LOG_FILE: &str = "jellyfin-autoscan.log";

/// Serve the HTTP router on an already bound listener.
///
/// Peer addresses are made available to handlers for logging.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let router = http::create_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
