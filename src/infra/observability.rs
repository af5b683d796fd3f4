//! Logging and Prometheus metrics setup.
//!
//! Counters emitted by the service:
//! - `upstream_requests_total`, `upstream_request_failures_total`,
//!   `upstream_unavailable_total` from the retrying fetcher;
//! - `pagination_truncated_total` when a loop stops on a malformed page;
//! - `aggregated_records_total` (label `operation`) per successful call.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Prometheus handle for on-demand scrape output (e.g. GET /metrics).
pub type PrometheusHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` for this crate
/// and `tower_http`. Returns `false` when a global subscriber was already
/// installed; that subscriber is kept.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_aggregator=info,tower_http=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Tracing subscriber already installed, keeping it");
            false
        }
    }
}

/// Install the global metrics recorder and return a handle for rendering.
///
/// Uses `PrometheusBuilder` without an HTTP listener; the application
/// exposes metrics via GET /metrics using `handle.render()`.
///
/// # Errors
/// Returns an error if a recorder is already installed or building fails.
pub fn init_metrics() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Convenience to wrap the handle in Arc for shared use in app state.
#[must_use]
pub fn init_metrics_handle() -> Option<Arc<PrometheusHandle>> {
    init_metrics().ok().map(Arc::new)
}
