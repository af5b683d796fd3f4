//! Domain traits defining contracts for external systems.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{FetchError, UpstreamUnavailable};

/// A single attempt against the upstream catalog API.
///
/// Implementations resolve `endpoint` (a relative path and query) against
/// their base URL and return the decoded body. A 2xx body that is not JSON
/// is returned unchanged as a JSON string.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn get(&self, endpoint: &str) -> Result<Value, FetchError>;
}

/// Fetches one upstream endpoint, retrying transient failures.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `endpoint`, giving up with [`UpstreamUnavailable`] once the
    /// attempt budget is spent.
    async fn fetch(&self, endpoint: &str) -> Result<Value, UpstreamUnavailable>;
}

/// Pause between retry attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
