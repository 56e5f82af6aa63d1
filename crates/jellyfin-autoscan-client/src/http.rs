//! HTTP client for the Jellyfin scheduled-task API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::debug;

use jellyfin_autoscan_core::task::{decode_task_list, find_refresh_library, REFRESH_LIBRARY_KEY};

use crate::api::TaskApi;
use crate::error::ClientError;

/// Client for the Jellyfin scheduled-task endpoints.
#[derive(Clone)]
pub struct JellyfinClient {
    inner: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl JellyfinClient {
    /// Create a new client.
    ///
    /// The base URL is stored as given. Only [`start_task`](Self::start_task)
    /// strips a trailing slash.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_client(
        inner: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// URL of the scheduled task list.
    pub fn tasks_url(&self) -> String {
        format!("{}/ScheduledTasks", self.base_url)
    }

    /// URL that starts the task with the given id.
    pub fn start_task_url(&self, task_id: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{}/ScheduledTasks/Running/{}", base, task_id)
    }

    /// Fetch the scheduled task list and return the `RefreshLibrary` id.
    pub async fn refresh_library_task_id(&self) -> Result<String, ClientError> {
        let url = self.tasks_url();
        let request = self.authorized(self.inner.get(&url)).build()?;
        debug!(url = %url, headers = ?redacted(request.headers()), "Sending GET request");

        let response = self.inner.execute(request).await?;
        let response = expect_status(response, StatusCode::OK).await?;

        let body = response.bytes().await?;
        let records = decode_task_list(&body)?;
        debug!(count = records.len(), "Decoded scheduled task list");

        find_refresh_library(&records)
            .map(|task| task.id)
            .ok_or_else(|| ClientError::TaskNotFound(REFRESH_LIBRARY_KEY.to_string()))
    }

    /// Start a scheduled task. Only `204 No Content` counts as success.
    pub async fn start_task(&self, task_id: &str) -> Result<(), ClientError> {
        let url = self.start_task_url(task_id);
        let request = self.authorized(self.inner.post(&url)).build()?;
        debug!(url = %url, headers = ?redacted(request.headers()), "Sending POST request");

        let response = self.inner.execute(request).await?;
        debug!(status = response.status().as_u16(), "Received response");

        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// Add the `MediaBrowser` token header.
    ///
    /// A key that is not a valid header value fails at `build()`.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, format!("MediaBrowser Token={}", self.api_key))
    }
}

#[async_trait]
impl TaskApi for JellyfinClient {
    async fn refresh_library_task_id(&self) -> Result<String, ClientError> {
        JellyfinClient::refresh_library_task_id(self).await
    }

    async fn start_task(&self, task_id: &str) -> Result<(), ClientError> {
        JellyfinClient::start_task(self, task_id).await
    }
}

/// Pass the response through if it has the expected status.
///
/// Otherwise read the body best-effort into an `UnexpectedStatus` error.
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, ClientError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus {
        expected: expected.as_u16(),
        status: status.as_u16(),
        body,
    })
}

/// Copy of the request headers with the token hidden, for logging.
fn redacted(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    if headers.contains_key(AUTHORIZATION) {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("MediaBrowser Token=<redacted>"),
        );
    }
    headers
}
