//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::error;
use utoipa::OpenApi;
use validator::Validate;

use crate::app::AppState;
use crate::domain::{
    AppError, ErrorDetail, ErrorResponse, HealthResponse, Item, Operation, Pass,
    UserAssetsQuery, UserGamePassesQuery, ValidationError,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Aggregator API",
        description = "Flattened, paginated views over the upstream catalog API",
        license(
            name = "MIT"
        )
    ),
    paths(
        user_assets_handler,
        user_game_passes_handler,
        health_check_handler,
        liveness_handler,
    ),
    components(
        schemas(
            Item,
            Pass,
            HealthResponse,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "catalog", description = "Aggregated catalog endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// List catalog assets created by a user
#[utoipa::path(
    get,
    path = "/user-assets",
    tag = "catalog",
    params(UserAssetsQuery),
    responses(
        (status = 200, description = "Assets in upstream order, empty when none were found", body = Vec<Item>),
        (status = 400, description = "Missing username", body = ErrorResponse),
        (status = 500, description = "Upstream unavailable", body = ErrorResponse)
    )
)]
pub async fn user_assets_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserAssetsQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    query
        .validate()
        .map_err(|_| ValidationError::MissingField("Username".to_string()))?;

    let items = state.service.list_user_assets(&query.username).await?;
    Ok(Json(items))
}

/// List game passes across every public game of a user
#[utoipa::path(
    get,
    path = "/user-gamepasses",
    tag = "catalog",
    params(UserGamePassesQuery),
    responses(
        (status = 200, description = "Passes ordered by game, then page", body = Vec<Pass>),
        (status = 400, description = "Missing userId", body = ErrorResponse),
        (status = 500, description = "Upstream unavailable", body = ErrorResponse)
    )
)]
pub async fn user_game_passes_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserGamePassesQuery>,
) -> Result<Json<Vec<Pass>>, AppError> {
    query
        .validate()
        .map_err(|_| ValidationError::MissingField("User ID".to_string()))?;

    let passes = state.service.list_user_game_passes(&query.user_id).await?;
    Ok(Json(passes))
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.service.health_check())
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// OpenAPI document
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Upstream detail goes to the log only.
        let (status, error_type, message) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            AppError::Aggregation(failure) => {
                let message = match failure.operation {
                    Operation::UserAssets => "Failed to fetch user assets",
                    Operation::UserGamePasses => "Failed to fetch game passes",
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "aggregation_failed",
                    message.to_string(),
                )
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error_type = %error_type, detail = %self, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
