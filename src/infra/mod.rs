//! Infrastructure layer implementations.

pub mod observability;
pub mod upstream;

pub use observability::{LogFormat, PrometheusHandle, init_metrics_handle, init_tracing};
pub use upstream::{
    HttpUpstreamClient, RetryPolicy, RetryingFetcher, TokioDelay, UpstreamConfig,
};
