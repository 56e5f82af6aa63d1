//! Task API abstraction used by the HTTP handler.

use async_trait::async_trait;

use crate::error::ClientError;

/// Operations the refresh workflow needs from Jellyfin.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Look up the instance id of the `RefreshLibrary` task.
    async fn refresh_library_task_id(&self) -> Result<String, ClientError>;

    /// Start the scheduled task with the given id.
    async fn start_task(&self, task_id: &str) -> Result<(), ClientError>;
}
