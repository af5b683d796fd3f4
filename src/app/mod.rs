//! Application layer containing aggregation logic and shared state.

pub mod endpoints;
pub mod pagination;
pub mod service;
pub mod state;

pub use pagination::{PagedEndpoint, PaginationState, Paginator, Termination};
pub use service::AggregatorService;
pub use state::AppState;
