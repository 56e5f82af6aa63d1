//! Error types for the Jellyfin client.

use thiserror::Error;

/// Errors that can occur when talking to Jellyfin.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, DNS, ...).
    #[error("error making request: {0}")]
    Network(#[from] reqwest::Error),

    /// Jellyfin answered with a status other than the expected one.
    #[error("expected status code {expected}, got {status}: {body}")]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        body: String,
    },

    /// The task list was not valid JSON of the expected shape.
    #[error("error decoding JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// No usable task with the given key in the task list.
    #[error("{0} task not found")]
    TaskNotFound(String),
}
