//! Bounded, constant-delay retry around an [`UpstreamTransport`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::domain::{Delay, FetchError, Fetcher, UpstreamTransport, UpstreamUnavailable};

use super::http::UpstreamConfig;

/// How many attempts a fetch gets and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl From<&UpstreamConfig> for RetryPolicy {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.retry_delay,
        }
    }
}

/// Wall-clock delay backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// [`Fetcher`] that retries every failed attempt after the same fixed delay.
///
/// The fetcher holds no per-call state, so concurrent fetches never share
/// an attempt budget.
pub struct RetryingFetcher {
    transport: Arc<dyn UpstreamTransport>,
    delay: Arc<dyn Delay>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(
        transport: Arc<dyn UpstreamTransport>,
        delay: Arc<dyn Delay>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            delay,
            policy,
        }
    }

    /// Fetcher sleeping on the tokio timer between attempts.
    pub fn with_tokio_delay(transport: Arc<dyn UpstreamTransport>, policy: RetryPolicy) -> Self {
        Self::new(transport, Arc::new(TokioDelay), policy)
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl Fetcher for RetryingFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, endpoint: &str) -> Result<Value, UpstreamUnavailable> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                self.delay.sleep(self.policy.delay).await;
            }
            metrics::counter!("upstream_requests_total").increment(1);

            match self.transport.get(endpoint).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    metrics::counter!("upstream_request_failures_total").increment(1);
                    warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Upstream request failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        metrics::counter!("upstream_unavailable_total").increment(1);
        Err(UpstreamUnavailable {
            endpoint: endpoint.to_string(),
            attempts: max_attempts,
            source: last_error
                .unwrap_or_else(|| FetchError::Transport("No attempt was made".to_string())),
        })
    }
}
