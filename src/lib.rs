//! Catalog Aggregator
//!
//! An HTTP service that flattens the paginated, nested catalog API (reached
//! through a public proxy) into two simple list endpoints: the assets a
//! user created, and every game pass across a user's public games.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  HTTP handlers, routing, request validation  │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Endpoints, cursor pagination, services     │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors (no dependencies)    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  HTTP transport, retries, observability      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Trait-based abstraction**: upstream access sits behind `UpstreamTransport` and `Fetcher`
//! - **Bounded retries**: a constant delay between a fixed number of attempts
//! - **Tolerant parsing**: malformed pages end pagination instead of failing the request
//! - **Testability**: scripted mocks replace the network and the clock
//! - **Logging**: Structured logging with `tracing`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_aggregator::api::create_router;
//! use catalog_aggregator::app::AppState;
//! use catalog_aggregator::infra::{HttpUpstreamClient, RetryPolicy, RetryingFetcher, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = UpstreamConfig::default();
//!     let transport = Arc::new(HttpUpstreamClient::new(&config)?);
//!     let fetcher = Arc::new(RetryingFetcher::with_tokio_delay(transport, RetryPolicy::from(&config)));
//!
//!     let state = Arc::new(AppState::new(fetcher));
//!     let router = create_router(state);
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
