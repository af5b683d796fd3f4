//! Upstream catalog transport over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{AppError, FetchError, UpstreamTransport};

/// `User-Agent` sent with every upstream request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default proxy in front of the catalog API.
pub const DEFAULT_BASE_URL: &str = "https://www.roproxy.com";

/// Configuration for upstream access
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// reqwest-backed [`UpstreamTransport`]; performs exactly one attempt per call.
pub struct HttpUpstreamClient {
    http_client: Client,
    base_url: String,
}

impl HttpUpstreamClient {
    /// Create a client with a fixed `User-Agent`, `Accept: application/json`
    /// and the configured per-request timeout.
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, timeout = ?config.timeout, "Created upstream client");

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client with default configuration
    pub fn with_defaults() -> Result<Self, AppError> {
        Self::new(&UpstreamConfig::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

fn request_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

#[async_trait]
impl UpstreamTransport for HttpUpstreamClient {
    #[instrument(skip(self))]
    async fn get(&self, endpoint: &str) -> Result<Value, FetchError> {
        let response = self
            .http_client
            .get(self.url_for(endpoint))
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(e.to_string())
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!(error = %e, "Upstream body is not JSON, passing it through");
                Ok(Value::String(body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> HttpUpstreamClient {
        HttpUpstreamClient::new(&UpstreamConfig {
            base_url,
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_upstream_config_default() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, "https://www.roproxy.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = client_for("https://www.roproxy.com/".to_string());
        assert_eq!(client.base_url(), "https://www.roproxy.com");
        assert_eq!(
            client.url_for("/v2/users/1/games"),
            "https://www.roproxy.com/v2/users/1/games"
        );
    }

    #[test]
    fn test_with_defaults() {
        let client = HttpUpstreamClient::with_defaults().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_get_returns_json_and_sends_fixed_headers() {
        let router = Router::new().route(
            "/echo",
            get(|headers: axum::http::HeaderMap| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                };
                Json(json!({
                    "accept": header("accept"),
                    "userAgent": header("user-agent"),
                }))
            }),
        );
        let client = client_for(serve(router).await);

        let body = client.get("/echo").await.unwrap();
        assert_eq!(body["accept"], "application/json");
        assert_eq!(body["userAgent"], USER_AGENT);
    }

    #[tokio::test]
    async fn test_get_passes_non_json_body_through() {
        let router = Router::new().route("/html", get(|| async { "<html>maintenance</html>" }));
        let client = client_for(serve(router).await);

        let body = client.get("/html").await.unwrap();
        assert_eq!(body, Value::String("<html>maintenance</html>".to_string()));
    }

    #[tokio::test]
    async fn test_get_maps_non_success_status() {
        let router = Router::new().route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let client = client_for(serve(router).await);

        let err = client.get("/down").await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 503 });
    }

    #[tokio::test]
    async fn test_get_maps_connection_failure_to_transport_error() {
        // Bind then drop so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        let err = client.get("/anything").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport(_) | FetchError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_get_times_out() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let client = HttpUpstreamClient::new(&UpstreamConfig {
            base_url: serve(router).await,
            timeout: Duration::from_millis(100),
            ..Default::default()
        })
        .unwrap();

        let err = client.get("/slow").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }
}
