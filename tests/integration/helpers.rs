//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::StreamExt;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use isavs_api::AppState;
use isavs_core::AppResult;
use isavs_core::config::AppConfig;
use isavs_database::DatabasePool;
use isavs_realtime::RealtimeEngine;

/// Client side of a dashboard WebSocket.
pub type DashboardClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

/// Publish token configured by [`test_config`].
pub const PUBLISH_TOKEN: &str = "test-publish-token";

/// `Authorization` header carrying [`PUBLISH_TOKEN`].
pub const AUTH: (&str, &str) = ("Authorization", "Bearer test-publish-token");

/// Default configuration with the realtime endpoints enabled.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.realtime.publish_token = Some(PUBLISH_TOKEN.to_string());
    config
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router
    pub state: AppState,
}

impl TestApp {
    /// Create a test application from [`test_config`].
    ///
    /// The database pool is lazy, so no PostgreSQL server is needed unless a
    /// test actually queries it.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let db = DatabasePool::connect_lazy(&config.database).expect("Failed to build lazy pool");
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        let state = AppState::new(config, db, realtime);
        let router = isavs_api::build_app(state.clone());

        Self { router, state }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, headers).await
    }

    /// Serve the app on an ephemeral local port.
    pub async fn spawn(self) -> RunningServer {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(isavs_api::serve(
            listener,
            self.state.clone(),
            async move {
                let _ = shutdown_rx.await;
            },
        ));

        RunningServer {
            addr,
            router: self.router,
            state: self.state,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }
}

/// A test app listening on a real socket.
pub struct RunningServer {
    /// Bound address
    pub addr: SocketAddr,
    /// Router sharing the server's state
    pub router: Router,
    /// State shared with the server
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<AppResult<()>>,
}

impl RunningServer {
    /// URL of the dashboard endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/dashboard", self.addr)
    }

    /// Open a dashboard connection and wait until the server registered it.
    pub async fn connect_dashboard(&self) -> DashboardClient {
        let before = self.connection_count();
        let (client, _) = tokio_tungstenite::connect_async(self.ws_url())
            .await
            .expect("WebSocket handshake failed");
        self.wait_for_connections(before + 1).await;
        client
    }

    /// Registered dashboard connections
    pub fn connection_count(&self) -> usize {
        self.state.realtime.registry.connection_count()
    }

    /// Poll until the registry holds exactly `n` connections.
    pub async fn wait_for_connections(&self, n: usize) {
        let deadline = tokio::time::Instant::now() + WAIT;
        while self.connection_count() != n {
            if tokio::time::Instant::now() > deadline {
                panic!(
                    "Expected {} dashboard connections, found {}",
                    n,
                    self.connection_count()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// HTTP request against the same state the server uses
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, headers).await
    }

    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> AppResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(WAIT, self.handle)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
    }
}

/// Next text frame, skipping control frames. Panics on timeout or close.
pub async fn next_text(client: &mut DashboardClient) -> String {
    let read = async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(Message::Close(frame))) => panic!("Connection closed: {:?}", frame),
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("WebSocket error: {}", e),
                None => panic!("WebSocket stream ended"),
            }
        }
    };
    tokio::time::timeout(WAIT, read)
        .await
        .expect("Timed out waiting for a text frame")
}

/// Next text frame parsed as JSON
pub async fn next_json(client: &mut DashboardClient) -> Value {
    let text = next_text(client).await;
    serde_json::from_str(&text).expect("Frame is not JSON")
}

/// Asserts that no text frame arrives within `window`.
pub async fn expect_silence(client: &mut DashboardClient, window: Duration) {
    let read = async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    };
    if let Ok(Some(text)) = tokio::time::timeout(window, read).await {
        panic!("Expected no message, got {:?}", text);
    }
}

/// Waits until the server closes the connection.
pub async fn expect_closed(client: &mut DashboardClient) {
    let read = async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => continue,
            }
        }
    };
    tokio::time::timeout(WAIT, read)
        .await
        .expect("Server did not close the connection");
}

async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    for (name, value) in headers {
        req = req.header(*name, *value);
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
