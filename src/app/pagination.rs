//! Cursor-driven pagination over a [`Fetcher`].
//!
//! A [`Paginator`] walks one paginated endpoint page by page:
//!
//! ```text
//! Requesting("") --valid page, cursor--> Requesting(cursor) --...
//!       |                                        |
//!       +--valid page, no cursor--> Done(CursorExhausted)
//!       +--malformed page---------> Done(MalformedPage)
//! ```
//!
//! Transport failures are returned to the caller as errors and never turn
//! into a terminal state. A finished paginator yields nothing more; walking
//! an endpoint again needs a new paginator.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Cursor, Fetcher, Page, UpstreamUnavailable};

/// A cursor-paginated upstream endpoint.
pub trait PagedEndpoint: Send + Sync {
    /// Relative path and query for the page at `cursor`.
    fn endpoint(&self, cursor: &Cursor) -> String;

    /// Parse a fetched body into a page.
    fn parse(&self, body: Value) -> Page;
}

/// Why a pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    CursorExhausted,
    MalformedPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    Requesting(Cursor),
    Done(Termination),
}

pub struct Paginator<'f, E> {
    fetcher: &'f dyn Fetcher,
    endpoint: E,
    state: PaginationState,
    pages_fetched: usize,
}

impl<'f, E: PagedEndpoint> Paginator<'f, E> {
    pub fn new(fetcher: &'f dyn Fetcher, endpoint: E) -> Self {
        Self {
            fetcher,
            endpoint,
            state: PaginationState::Requesting(Cursor::start()),
            pages_fetched: 0,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the loop is done. A malformed page ends the
    /// loop without yielding records; records already handed out stay valid.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>, UpstreamUnavailable> {
        let cursor = match &self.state {
            PaginationState::Requesting(cursor) => cursor.clone(),
            PaginationState::Done(_) => return Ok(None),
        };

        let endpoint = self.endpoint.endpoint(&cursor);
        let body = self.fetcher.fetch(&endpoint).await?;
        self.pages_fetched += 1;

        match self.endpoint.parse(body) {
            Page::Valid {
                records,
                next_cursor,
            } => {
                debug!(
                    endpoint = %endpoint,
                    records = records.len(),
                    has_next = !next_cursor.is_empty(),
                    "Fetched page"
                );
                self.state = if next_cursor.is_empty() {
                    PaginationState::Done(Termination::CursorExhausted)
                } else {
                    PaginationState::Requesting(next_cursor)
                };
                Ok(Some(records))
            }
            Page::Malformed => {
                // Indistinguishable from a real end of results for the caller.
                warn!(
                    endpoint = %endpoint,
                    pages_fetched = self.pages_fetched,
                    "Malformed page, stopping pagination"
                );
                metrics::counter!("pagination_truncated_total").increment(1);
                self.state = PaginationState::Done(Termination::MalformedPage);
                Ok(None)
            }
        }
    }

    /// Drain every remaining page into one ordered list of records.
    pub async fn collect_all(mut self) -> Result<Vec<Value>, UpstreamUnavailable> {
        let mut all = Vec::new();
        while let Some(records) = self.next_page().await? {
            all.extend(records);
        }
        Ok(all)
    }
}
