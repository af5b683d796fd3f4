//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits that
//! replay scripted upstream responses per endpoint and record every call,
//! so tests can assert both on results and on the exact request sequence.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{Delay, FetchError, Fetcher, UpstreamTransport, UpstreamUnavailable};

/// Attempts reported by [`MockFetcher`] failures.
pub const MOCK_ATTEMPTS: u32 = 3;

/// Per-endpoint response queues shared by the mocks.
///
/// Each call pops the next scripted response; the last one is sticky and
/// answers every further call. Unscripted endpoints answer `404`.
struct Script {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, FetchError>>>>,
    requests: Mutex<Vec<String>>,
}

impl Script {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, endpoint: &str, response: Result<Value, FetchError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    fn next(&self, endpoint: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(endpoint.to_string());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(endpoint) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or(Err(FetchError::Status { status: 404 })),
            None => Err(FetchError::Status { status: 404 }),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.responses.lock().unwrap().clear();
        self.requests.lock().unwrap().clear();
    }
}

/// Mock upstream transport: one scripted response per attempt.
///
/// # Example
///
/// ```
/// use catalog_aggregator::domain::FetchError;
/// use catalog_aggregator::test_utils::MockTransport;
///
/// let transport = MockTransport::new();
/// transport.fail("/games", FetchError::Status { status: 503 });
/// transport.respond("/games", serde_json::json!({"data": []}));
/// ```
pub struct MockTransport {
    script: Script,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Script::new(),
        }
    }

    /// Queues a successful body for `endpoint`.
    pub fn respond(&self, endpoint: &str, body: Value) {
        self.script.push(endpoint, Ok(body));
    }

    /// Queues a failed attempt for `endpoint`.
    pub fn fail(&self, endpoint: &str, error: FetchError) {
        self.script.push(endpoint, Err(error));
    }

    /// Every endpoint requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.script.requests()
    }

    pub fn call_count(&self) -> usize {
        self.script.requests().len()
    }

    pub fn clear(&self) {
        self.script.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn get(&self, endpoint: &str) -> Result<Value, FetchError> {
        self.script.next(endpoint)
    }
}

/// Mock fetcher with retries already applied.
///
/// A scripted failure surfaces as [`UpstreamUnavailable`] after
/// [`MOCK_ATTEMPTS`] attempts, without any delay.
pub struct MockFetcher {
    script: Script,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Script::new(),
        }
    }

    /// Queues a successful body for `endpoint`.
    pub fn respond(&self, endpoint: &str, body: Value) {
        self.script.push(endpoint, Ok(body));
    }

    /// Queues an exhausted fetch for `endpoint`, ending with `error`.
    pub fn fail(&self, endpoint: &str, error: FetchError) {
        self.script.push(endpoint, Err(error));
    }

    /// Every endpoint fetched so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.script.requests()
    }

    pub fn call_count(&self) -> usize {
        self.script.requests().len()
    }

    pub fn clear(&self) {
        self.script.clear();
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Value, UpstreamUnavailable> {
        self.script
            .next(endpoint)
            .map_err(|source| UpstreamUnavailable {
                endpoint: endpoint.to_string(),
                attempts: MOCK_ATTEMPTS,
                source,
            })
    }
}

/// Delay that returns immediately and records every requested pause.
#[derive(Default)]
pub struct RecordingDelay {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
