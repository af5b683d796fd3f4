//! Application service layer.
//!
//! This module contains the aggregation logic that turns one or more
//! upstream pages into a single flat response, using the [`Fetcher`]
//! abstraction for every upstream call.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    AggregationFailed, Fetcher, Game, HealthResponse, Item, Operation, Page, Pass,
    UpstreamUnavailable,
};

use super::endpoints::{self, UniverseGamePasses, UserGames};
use super::pagination::Paginator;

/// Aggregates upstream catalog data for the HTTP layer.
///
/// The service is stateless: every call owns its own accumulation buffers
/// and issues its upstream requests strictly one after another.
///
/// # Example
///
/// ```ignore
/// let transport = Arc::new(HttpUpstreamClient::with_defaults()?);
/// let fetcher = Arc::new(RetryingFetcher::with_tokio_delay(transport, RetryPolicy::default()));
/// let service = AggregatorService::new(fetcher);
///
/// let passes = service.list_user_game_passes("42").await?;
/// ```
pub struct AggregatorService {
    fetcher: Arc<dyn Fetcher>,
}

impl AggregatorService {
    /// Creates a new `AggregatorService` instance.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher used for every upstream call.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Lists the catalog assets created by `username`.
    ///
    /// Issues exactly one upstream call. A payload without a `data` list
    /// yields an empty result instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationFailed`] when the catalog search cannot be
    /// fetched after all retries.
    #[instrument(skip(self))]
    pub async fn list_user_assets(&self, username: &str) -> Result<Vec<Item>, AggregationFailed> {
        let endpoint = endpoints::catalog_search(username);
        let body = self.fetcher.fetch(&endpoint).await.map_err(|e| {
            error!(error = %e, "Catalog search failed");
            AggregationFailed::new(Operation::UserAssets, e)
        })?;

        let items: Vec<Item> = match Page::parse_data(body) {
            Page::Valid { records, .. } => records.iter().map(Item::from_record).collect(),
            Page::Malformed => {
                warn!("Catalog search returned an unexpected payload, treating as empty");
                Vec::new()
            }
        };

        info!(count = items.len(), "Listed user assets");
        metrics::counter!("aggregated_records_total", "operation" => "user_assets")
            .increment(items.len() as u64);
        Ok(items)
    }

    /// Lists every pass sold in every public game of `user_id`.
    ///
    /// Walks the user's games page by page, then for each game with a
    /// universe id walks its pass pages. Output order is game order, then
    /// page order, then record order; nothing is deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationFailed`] as soon as any single upstream call
    /// exhausts its retries, discarding what was collected so far.
    #[instrument(skip(self))]
    pub async fn list_user_game_passes(
        &self,
        user_id: &str,
    ) -> Result<Vec<Pass>, AggregationFailed> {
        let passes = self.collect_game_passes(user_id).await.map_err(|e| {
            error!(error = %e, "Game pass aggregation aborted");
            AggregationFailed::new(Operation::UserGamePasses, e)
        })?;

        info!(count = passes.len(), "Listed user game passes");
        metrics::counter!("aggregated_records_total", "operation" => "user_game_passes")
            .increment(passes.len() as u64);
        Ok(passes)
    }

    async fn collect_game_passes(&self, user_id: &str) -> Result<Vec<Pass>, UpstreamUnavailable> {
        let games: Vec<Game> = Paginator::new(self.fetcher.as_ref(), UserGames::new(user_id))
            .collect_all()
            .await?
            .iter()
            .map(Game::from_record)
            .collect();
        debug!(games = games.len(), "Collected games");

        let mut passes = Vec::new();
        for game in &games {
            let Some(universe_id) = game.universe_id else {
                debug!(game = %game.name, "Skipping game without universe id");
                continue;
            };

            let mut pages =
                Paginator::new(self.fetcher.as_ref(), UniverseGamePasses::new(universe_id));
            while let Some(records) = pages.next_page().await? {
                passes.extend(records.iter().map(|record| Pass::from_record(record, game)));
            }
        }

        Ok(passes)
    }

    /// Reports liveness. Upstream reachability is not probed.
    pub fn health_check(&self) -> HealthResponse {
        HealthResponse::healthy()
    }
}
