//! HTTP routing configuration.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{
    health_check_handler, liveness_handler, metrics_handler, openapi_handler,
    user_assets_handler, user_game_passes_handler,
};

/// Create the application router.
///
/// No whole-request deadline is applied: an aggregation runs until every
/// page is fetched or one fetch exhausts its retries, and each upstream
/// attempt is bounded by the client timeout.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let health_routes = Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler));

    Router::new()
        .route("/user-assets", get(user_assets_handler))
        .route("/user-gamepasses", get(user_game_passes_handler))
        .nest("/health", health_routes)
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(middleware)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::test_utils::MockFetcher;

    fn router_with(fetcher: Arc<MockFetcher>) -> Router {
        create_router(Arc::new(AppState::new(fetcher)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let res = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_router_health_endpoints() {
        let router = router_with(Arc::new(MockFetcher::new()));

        let (status, body) = get_json(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = get_json(router, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_user_assets_route() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.respond(
            "/v1/search/items/details?Category=3&CreatorName=builder",
            json!({"data": [{"id": 1, "name": "Shirt", "price": 5, "creatorName": "builder"}]}),
        );

        let (status, body) = get_json(router_with(fetcher), "/user-assets?username=builder").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Shirt");
    }

    #[tokio::test]
    async fn test_router_user_gamepasses_route_requires_user_id() {
        let (status, body) = get_json(router_with(Arc::new(MockFetcher::new())), "/user-gamepasses").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "User ID is required");
    }

    #[tokio::test]
    async fn test_router_metrics_without_recorder_is_404() {
        let res = router_with(Arc::new(MockFetcher::new()))
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_serves_openapi_document() {
        let (status, body) =
            get_json(router_with(Arc::new(MockFetcher::new())), "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/user-gamepasses"].is_object());
    }

    #[tokio::test]
    async fn test_router_unknown_route_is_404() {
        let res = router_with(Arc::new(MockFetcher::new()))
            .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
