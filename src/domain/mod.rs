//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    AggregationFailed, AppError, ConfigError, FetchError, Operation, UpstreamUnavailable,
    ValidationError,
};
pub use traits::{Delay, Fetcher, UpstreamTransport};
pub use types::{
    Cursor, ErrorDetail, ErrorResponse, Game, HealthResponse, Item, Page, Pass, UNKNOWN,
    UserAssetsQuery, UserGamePassesQuery,
};
