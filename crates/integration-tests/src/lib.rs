//! Integration tests for Shopfront.
//!
//! Each test starts a [`MockBackend`]: an `axum` router bound to an
//! ephemeral localhost port that records every request it receives. The
//! client under test is pointed at it through an ordinary [`ApiConfig`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::Value;
use shopfront_client::{ApiClient, ApiConfig, KeyValueStore, MemoryStore, TokenStore};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Largest request body the recorder will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Log = Arc<Mutex<Vec<RecordedRequest>>>;

/// A local HTTP server standing in for the storefront backend.
pub struct MockBackend {
    addr: SocketAddr,
    log: Log,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Serve `routes` on `127.0.0.1` with an OS-assigned port.
    ///
    /// Unmatched paths answer `404 Not Found` and are recorded like any
    /// other request.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(routes: Router) -> Self {
        let log: Log = Arc::default();
        let app = routes
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn_with_state(log.clone(), record));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });

        Self { addr, log, handle }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if no request has been received.
    #[must_use]
    pub fn last_request(&self) -> RecordedRequest {
        self.log
            .lock()
            .last()
            .cloned()
            .expect("Mock backend received no requests")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(State(log): State<Log>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_BODY_BYTES).await else {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    };

    log.lock().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// A base URL nothing is listening on.
///
/// # Panics
///
/// Panics if no ephemeral port can be reserved.
#[must_use]
pub fn unused_base_url() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to reserve a local port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{addr}")
}

/// An API client over in-memory storage, plus that storage.
///
/// # Panics
///
/// Panics if the HTTP client fails to build.
#[must_use]
pub fn api_client(base_url: &str) -> (ApiClient, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let tokens = TokenStore::new(storage.clone() as Arc<dyn KeyValueStore>);
    let client =
        ApiClient::new(&ApiConfig::new(base_url), tokens).expect("Failed to build API client");
    (client, storage)
}
