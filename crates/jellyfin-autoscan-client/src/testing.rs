//! In-process mock of the Jellyfin scheduled-task API.
//!
//! Serves `GET /ScheduledTasks` and `POST /ScheduledTasks/Running/{id}`
//! with canned responses and records every request it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned responses served by [`MockJellyfin`].
#[derive(Debug, Clone)]
pub struct MockResponses {
    pub tasks_status: StatusCode,
    pub tasks_body: String,
    pub start_status: StatusCode,
    pub start_body: String,
}

impl Default for MockResponses {
    fn default() -> Self {
        Self {
            tasks_status: StatusCode::OK,
            tasks_body: "[]".to_string(),
            start_status: StatusCode::NO_CONTENT,
            start_body: String::new(),
        }
    }
}

/// A request received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

struct MockState {
    responses: MockResponses,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock Jellyfin server bound to an ephemeral local port.
///
/// The server task is aborted on drop.
pub struct MockJellyfin {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockJellyfin {
    /// Bind to `127.0.0.1:0` and start serving.
    pub async fn start(responses: MockResponses) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            responses,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(serve_mock).with_state(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL of the mock, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Drop for MockJellyfin {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_mock(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

    let responses = &state.responses;
    if method == Method::GET && path == "/ScheduledTasks" {
        (responses.tasks_status, responses.tasks_body.clone()).into_response()
    } else if method == Method::POST && path.starts_with("/ScheduledTasks/Running/") {
        (responses.start_status, responses.start_body.clone()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
