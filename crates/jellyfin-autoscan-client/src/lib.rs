//! Jellyfin client for jellyfin-autoscan.
//!
//! Resolves the library refresh task from the scheduled task list and
//! starts it through the Jellyfin HTTP API.

pub mod api;
pub mod error;
pub mod http;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::TaskApi;
pub use error::ClientError;
pub use http::JellyfinClient;
