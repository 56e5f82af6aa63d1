//! Shared application state.

use std::sync::Arc;

use jellyfin_autoscan_client::{JellyfinClient, TaskApi};
use jellyfin_autoscan_core::Config;

/// Shared application state.
///
/// Read-only once built; requests never mutate it.
pub struct AppState {
    /// Jellyfin task API used by the refresh handler.
    pub tasks: Arc<dyn TaskApi>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(tasks: Arc<dyn TaskApi>) -> Arc<Self> {
        Arc::new(Self { tasks })
    }

    /// Build state backed by a real Jellyfin client.
    pub fn from_config(config: &Config) -> Arc<Self> {
        let client = JellyfinClient::new(config.base_url.clone(), config.api_key.clone());
        Self::new(Arc::new(client))
    }
}
