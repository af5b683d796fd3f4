//! Application error types with proper error chaining.

use std::fmt;

use thiserror::Error;

/// Failure of a single upstream attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Upstream returned status {status}")]
    Status { status: u16 },
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Raised by the fetcher once every attempt for an endpoint has failed.
///
/// Carries the error of the final attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Upstream unavailable after {attempts} attempt(s) for '{endpoint}': {source}")]
pub struct UpstreamUnavailable {
    pub endpoint: String,
    pub attempts: u32,
    pub source: FetchError,
}

/// The aggregation operation that was running when the upstream failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UserAssets,
    UserGamePasses,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserAssets => write!(f, "user assets"),
            Self::UserGamePasses => write!(f, "user game passes"),
        }
    }
}

/// An upstream failure encountered mid-aggregation.
///
/// No partial result accompanies this error: whatever was accumulated
/// before the failure is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Aggregation of {operation} failed: {source}")]
pub struct AggregationFailed {
    pub operation: Operation,
    #[source]
    pub source: UpstreamUnavailable,
}

impl AggregationFailed {
    pub fn new(operation: Operation, source: UpstreamUnavailable) -> Self {
        Self { operation, source }
    }
}

/// Rejected environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Rejected request input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Aggregation(#[from] AggregationFailed),
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> UpstreamUnavailable {
        UpstreamUnavailable {
            endpoint: "/v2/users/42/games".to_string(),
            attempts: 3,
            source: FetchError::Status { status: 503 },
        }
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Timeout("10s".to_string());
        assert_eq!(err.to_string(), "Request timed out: 10s");

        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport failure: connection refused");

        let err = FetchError::Status { status: 502 };
        assert_eq!(err.to_string(), "Upstream returned status 502");

        let err = FetchError::Body("eof".to_string());
        assert_eq!(err.to_string(), "Failed to read response body: eof");
    }

    #[test]
    fn test_upstream_unavailable_display_includes_last_error() {
        let err = unavailable();
        assert_eq!(
            err.to_string(),
            "Upstream unavailable after 3 attempt(s) for '/v2/users/42/games': Upstream returned status 503"
        );
    }

    #[test]
    fn test_aggregation_failed_keeps_source_chain() {
        use std::error::Error as _;

        let err = AggregationFailed::new(Operation::UserGamePasses, unavailable());
        assert!(err.to_string().starts_with("Aggregation of user game passes failed"));

        let source = err.source().expect("aggregation failure has a source");
        assert!(source.to_string().contains("3 attempt(s)"));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::UserAssets.to_string(), "user assets");
        assert_eq!(Operation::UserGamePasses.to_string(), "user game passes");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "PORT".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for 'PORT': not a number");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingField("Username".to_string());
        assert_eq!(err.to_string(), "Username is required");
    }

    #[test]
    fn test_app_error_from_aggregation_failed() {
        let err: AppError = AggregationFailed::new(Operation::UserAssets, unavailable()).into();
        assert!(matches!(
            err,
            AppError::Aggregation(AggregationFailed {
                operation: Operation::UserAssets,
                ..
            })
        ));
    }
}
