//! Refresh workflow errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use jellyfin_autoscan_client::ClientError;

/// A failed refresh, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Looking up the `RefreshLibrary` task id failed.
    #[error("Error getting task ID: {0}")]
    ResolveTask(#[source] ClientError),

    /// Starting the task failed.
    #[error("Error starting task: {0}")]
    StartTask(#[source] ClientError),
}

impl RefreshError {
    /// Short label of the failed stage, used as the log message.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ResolveTask(_) => "Error getting task ID",
            Self::StartTask(_) => "Error starting task",
        }
    }

    /// The underlying client error.
    pub fn client_error(&self) -> &ClientError {
        match self {
            Self::ResolveTask(e) | Self::StartTask(e) => e,
        }
    }
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
