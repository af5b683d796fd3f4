//! Upstream catalog API access.

pub mod http;
pub mod retry;

pub use http::{DEFAULT_BASE_URL, HttpUpstreamClient, USER_AGENT, UpstreamConfig};
pub use retry::{RetryPolicy, RetryingFetcher, TokioDelay};
