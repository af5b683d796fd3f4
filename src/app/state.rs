//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::Fetcher;
use crate::infra::PrometheusHandle;

use super::service::AggregatorService;

/// Shared application state for the Axum web server.
///
/// # Thread Safety
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks. Nothing in here is
/// mutated by request handling.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let fetcher = Arc::new(RetryingFetcher::with_tokio_delay(transport, policy));
/// let state = AppState::new(fetcher);
///
/// let router = create_router(Arc::new(state));
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The aggregation service.
    pub service: Arc<AggregatorService>,

    /// Prometheus scrape handle, when a recorder is installed.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new `AppState`, wiring an [`AggregatorService`] to `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            service: Arc::new(AggregatorService::new(fetcher)),
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle rendered by `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<Arc<PrometheusHandle>>) -> Self {
        self.metrics = handle;
        self
    }
}
