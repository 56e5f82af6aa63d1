//! Library refresh handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

use jellyfin_autoscan_client::TaskApi;

use crate::error::RefreshError;
use crate::state::AppState;

/// Body returned once the task has been started.
pub const SUCCESS_BODY: &str = "RefreshLibrary task started successfully";

/// Trigger a Jellyfin library refresh.
///
/// Only `GET` is accepted. The task id is resolved again on every call.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
) -> Response {
    match connect_info {
        Some(ConnectInfo(addr)) => info!(remote_addr = %addr, "Received refresh request"),
        None => info!("Received refresh request"),
    }

    if method != Method::GET {
        info!(method = %method, "Method not allowed");
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    match run_refresh(state.tasks.as_ref()).await {
        Ok(task_id) => {
            info!(task_id = %task_id, "{}", SUCCESS_BODY);
            (StatusCode::OK, SUCCESS_BODY).into_response()
        }
        Err(e) => {
            error!(error = %e.client_error(), "{}", e.stage());
            e.into_response()
        }
    }
}

/// Resolve the `RefreshLibrary` task and start it.
///
/// Returns the id of the started task.
pub async fn run_refresh(tasks: &dyn TaskApi) -> Result<String, RefreshError> {
    debug!("Fetching RefreshLibrary task ID");
    let task_id = tasks
        .refresh_library_task_id()
        .await
        .map_err(RefreshError::ResolveTask)?;
    debug!(task_id = %task_id, "Retrieved task ID");

    debug!(task_id = %task_id, "Starting refresh task");
    tasks
        .start_task(&task_id)
        .await
        .map_err(RefreshError::StartTask)?;

    Ok(task_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use jellyfin_autoscan_client::testing::{MockJellyfin, MockResponses};
    use jellyfin_autoscan_client::{ClientError, JellyfinClient};

    use jellyfin_autoscan_core::LogLevel;

    use crate::http::create_router;
    use crate::logging::capture::LogBuffer;

    /// In-memory task API.
    #[derive(Default)]
    struct FakeTasks {
        task_id: Option<String>,
        start_fails: bool,
        resolve_calls: AtomicUsize,
        started: Mutex<Vec<String>>,
    }

    impl FakeTasks {
        fn resolving(task_id: &str) -> Self {
            Self {
                task_id: Some(task_id.to_string()),
                ..Default::default()
            }
        }

        fn started(&self) -> Vec<String> {
            self.started.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskApi for FakeTasks {
        async fn refresh_library_task_id(&self) -> Result<String, ClientError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            self.task_id
                .clone()
                .ok_or_else(|| ClientError::TaskNotFound("RefreshLibrary".to_string()))
        }

        async fn start_task(&self, task_id: &str) -> Result<(), ClientError> {
            self.started.lock().unwrap().push(task_id.to_string());
            if self.start_fails {
                return Err(ClientError::UnexpectedStatus {
                    expected: 204,
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn router_with(fake: &Arc<FakeTasks>) -> Router {
        let tasks: Arc<dyn TaskApi> = fake.clone();
        create_router(AppState::new(tasks))
    }

    async fn send(router: Router, method: Method) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let fake = Arc::new(FakeTasks::resolving("abc123"));

        let (status, body) = send(router_with(&fake), Method::GET).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SUCCESS_BODY);
        assert_eq!(fake.started(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_non_get_methods_rejected() {
        for method in [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::HEAD,
            Method::OPTIONS,
        ] {
            let fake = Arc::new(FakeTasks::resolving("abc123"));

            let (status, _) = send(router_with(&fake), method.clone()).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {}", method);
            assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 0);
            assert!(fake.started().is_empty());
        }
    }

    #[tokio::test]
    async fn test_resolve_failure_is_500() {
        let fake = Arc::new(FakeTasks::default());

        let (status, body) = send(router_with(&fake), Method::GET).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error getting task ID: RefreshLibrary task not found");
        assert!(fake.started().is_empty());
    }

    #[tokio::test]
    async fn test_start_failure_is_500() {
        let fake = Arc::new(FakeTasks {
            start_fails: true,
            ..FakeTasks::resolving("abc123")
        });

        let (status, body) = send(router_with(&fake), Method::GET).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            "Error starting task: expected status code 204, got 500: boom"
        );
    }

    #[tokio::test]
    async fn test_each_request_resolves_again() {
        let fake = Arc::new(FakeTasks::resolving("abc123"));
        let router = router_with(&fake);

        send(router.clone(), Method::GET).await;
        send(router, Method::GET).await;

        assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fake.started().len(), 2);
    }

    #[tokio::test]
    async fn test_end_to_end_against_mock_jellyfin() {
        let mock = MockJellyfin::start(MockResponses {
            tasks_body: r#"[{"Key":"RefreshLibrary","Id":"t1"}]"#.to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let client = JellyfinClient::new(mock.base_url(), "secret");
        let router = create_router(AppState::new(Arc::new(client)));

        let (status, body) = send(router, Method::GET).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SUCCESS_BODY);

        let paths: Vec<String> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/ScheduledTasks", "/ScheduledTasks/Running/t1"]);
    }

    #[tokio::test]
    async fn test_end_to_end_task_list_unavailable() {
        let mock = MockJellyfin::start(MockResponses {
            tasks_status: StatusCode::SERVICE_UNAVAILABLE,
            tasks_body: "down".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let client = JellyfinClient::new(mock.base_url(), "secret");
        let router = create_router(AppState::new(Arc::new(client)));

        let (status, body) = send(router, Method::GET).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Error getting task ID: "));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_post_makes_no_outbound_call() {
        let mock = MockJellyfin::start(MockResponses::default()).await.unwrap();
        let client = JellyfinClient::new(mock.base_url(), "secret");
        let router = create_router(AppState::new(Arc::new(client)));

        let (status, _) = send(router, Method::POST).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_failure_logged_at_error() {
        let logs = LogBuffer::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(LogLevel::Info));
        let fake = Arc::new(FakeTasks::default());

        let (status, _) = send(router_with(&fake), Method::GET).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("Error getting task ID"))
            .expect("stage error logged");
        assert!(line.contains("ERROR"));
        assert!(line.contains("error=RefreshLibrary task not found"));
    }

    #[tokio::test]
    async fn test_start_failure_logged_at_error() {
        let logs = LogBuffer::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(LogLevel::Info));
        let fake = Arc::new(FakeTasks {
            start_fails: true,
            ..FakeTasks::resolving("abc123")
        });

        send(router_with(&fake), Method::GET).await;

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("Error starting task"))
            .expect("stage error logged");
        assert!(line.contains("ERROR"));
        assert!(line.contains("error=expected status code 204, got 500: boom"));
    }

    #[tokio::test]
    async fn test_rejected_method_logged_at_info() {
        let logs = LogBuffer::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(LogLevel::Info));
        let fake = Arc::new(FakeTasks::resolving("abc123"));

        send(router_with(&fake), Method::POST).await;

        let output = logs.contents();
        assert!(output
            .lines()
            .any(|line| line.contains("INFO") && line.contains("Received refresh request")));
        let line = output
            .lines()
            .find(|line| line.contains("Method not allowed"))
            .expect("rejection logged");
        assert!(line.contains("INFO"));
        assert!(line.contains("method=POST"));
        assert!(!output.contains("ERROR"));
    }

    #[tokio::test]
    async fn test_success_logged_at_info() {
        let logs = LogBuffer::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(LogLevel::Info));
        let fake = Arc::new(FakeTasks::resolving("abc123"));

        send(router_with(&fake), Method::GET).await;

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains(SUCCESS_BODY))
            .expect("success logged");
        assert!(line.contains("INFO"));
        assert!(line.contains("task_id=abc123"));
        assert!(!output.contains("Fetching RefreshLibrary task ID"));
    }
}
