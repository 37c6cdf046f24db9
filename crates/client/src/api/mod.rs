//! Authenticated client for the storefront REST backend.
//!
//! Every request goes through [`ApiClient::request`], which:
//!
//! - attaches `Authorization: Bearer <token>` when a token is stored
//! - on any failure, including a 2xx body that is not JSON, classifies the
//!   path into a backend service, logs it, records it in a bounded history
//!   and publishes a [`ServiceEvent`]
//! - on `401 Unauthorized`, clears the stored token and publishes
//!   [`ServiceEvent::SessionExpired`]
//!
//! The original error is always returned to the caller. There are no retries.

pub mod endpoints;
pub mod events;
pub mod history;
pub mod services;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, instrument, warn};

use crate::config::ApiConfig;
use crate::token::TokenStore;

pub use endpoints::{
    AnalyticsApi, AuthApi, CartApi, CouponsApi, EmailsApi, InventoryApi, OrdersApi, ProductsApi,
    ReviewsApi, UsersApi, WishlistApi,
};
pub use events::ServiceEvent;
pub use history::{HISTORY_CAPACITY, ServiceCallRecord, ServiceHistory, ServiceStats};
pub use services::{FALLBACK_SERVICE, SERVICES, ServiceInfo, classify};

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the credentials; the session has been cleared.
    #[error("Unauthorized: {body}")]
    Unauthorized { body: String },

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// A success response carried a body that was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::Status { status, .. } => Some(*status),
            Self::Parse(_) => None,
        }
    }
}

/// Per-request extras.
#[derive(Debug, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    bearer: Option<SecretString>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters.
    #[must_use]
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Authenticate with this token instead of the stored one.
    #[must_use]
    pub fn bearer(mut self, token: SecretString) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.body)?)
    }

    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Shared, cheaply clonable backend client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    tokens: TokenStore,
    history: Mutex<ServiceHistory>,
    events: broadcast::Sender<ServiceEvent>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("tokens", &self.inner.tokens)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let (events, _) = broadcast::channel(events::EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                login_path: config.login_path.clone(),
                tokens,
                history: Mutex::new(ServiceHistory::default()),
                events,
            }),
        })
    }

    /// Base URL all paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The token store consulted for every request.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Receive failure and session events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.inner.events.subscribe()
    }

    /// Send a request to `path` (relative to the base URL).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or a
    /// malformed success body. Failures are recorded before returning.
    #[instrument(skip(self, body, options))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut builder = self.inner.http.request(method, &url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(token) = options.bearer.or_else(|| self.inner.tokens.get()) {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.report_failure(path, &url, e.into())),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.report_failure(path, &url, e.into())),
        };

        if status == StatusCode::UNAUTHORIZED {
            let err = self.report_failure(path, &url, ApiError::Unauthorized { body: text });
            self.expire_session();
            return Err(err);
        }
        if !status.is_success() {
            return Err(self.report_failure(
                path,
                &url,
                ApiError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            ));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(e) => return Err(self.report_failure(path, &url, e.into())),
            }
        };
        debug!(status = status.as_u16(), "Request succeeded");

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::GET, path, None, RequestOptions::default())
            .await
    }

    /// GET `path` with query parameters or a bearer override.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_with(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(Method::GET, path, None, options).await
    }

    /// POST a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// PUT a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    /// PATCH a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    // =========================================================================
    // Failure history
    // =========================================================================

    /// Recorded failures, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<ServiceCallRecord> {
        self.inner.history.lock().records()
    }

    #[must_use]
    pub fn latest_failure(&self) -> Option<ServiceCallRecord> {
        self.inner.history.lock().latest().cloned()
    }

    pub fn clear_history(&self) {
        self.inner.history.lock().clear();
    }

    #[must_use]
    pub fn service_stats(&self) -> ServiceStats {
        self.inner.history.lock().stats()
    }

    /// Classify, log, record and publish a failure, handing the error back.
    fn report_failure(&self, path: &str, url: &str, err: ApiError) -> ApiError {
        let service = classify(path);
        let record = ServiceCallRecord::new(service, url, err.to_string(), err.status());

        warn!(
            service = service.name,
            endpoint = %record.endpoint,
            status = ?record.status,
            error = %record.original_error,
            "Backend call failed"
        );

        self.inner.history.lock().push(record.clone());
        // No subscribers is fine.
        let _ = self.inner.events.send(ServiceEvent::Failure(record));
        err
    }

    fn expire_session(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            error!(error = %e, "Failed to clear auth token");
        }
        warn!(redirect_to = %self.inner.login_path, "Session expired");
        let _ = self.inner.events.send(ServiceEvent::SessionExpired {
            redirect_to: self.inner.login_path.clone(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn client(base_url: &str) -> ApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        ApiClient::new(&ApiConfig::new(base_url), tokens).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client("http://127.0.0.1:9/api/").base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn test_error_status() {
        let err = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            ApiError::Unauthorized {
                body: String::new()
            }
            .status(),
            Some(401)
        );
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize)]
        struct Verify {
            valid: bool,
        }

        let response = ApiResponse {
            status: 200,
            body: serde_json::json!({"valid": true}),
        };
        assert!(response.json::<Verify>().unwrap().valid);
    }

    #[test]
    fn test_debug_hides_token() {
        let api = client("http://127.0.0.1:9");
        api.tokens().set(&SecretString::from("s3cret".to_owned())).unwrap();
        assert!(!format!("{api:?}").contains("s3cret"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_recorded() {
        // Port 9 (discard) is not expected to accept connections.
        let api = client("http://127.0.0.1:9");
        let mut events = api.subscribe();

        let err = api.get("/products/42").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let latest = api.latest_failure().unwrap();
        assert_eq!(latest.service_name, "Product Catalog Service");
        assert_eq!(latest.endpoint, "http://127.0.0.1:9/products/42");
        assert!(matches!(events.try_recv(), Ok(ServiceEvent::Failure(_))));
    }
}
