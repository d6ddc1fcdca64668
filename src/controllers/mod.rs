pub mod catalog;
pub mod estimate;
pub mod health;

use crate::services::planner::PlannerState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

pub fn router(state: PlannerState) -> Router {
    let api_router = Router::new()
        .route("/estimate", post(estimate::post_estimate))
        .route("/catalog", get(catalog::get_catalog))
        .route("/catalog/meta", get(catalog::get_catalog_meta))
        .with_state(state);
    Router::new()
        .route("/health", get(health::get_health))
        .nest("/api", api_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::config::Config;
    use crate::repositories::catalog_repository::tests::bundled;
    use crate::services::planner::Planner;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) fn test_router() -> Router {
        let planner = Planner::new(bundled(), Config::default().get_all_gpu_types());
        router(Arc::new(planner))
    }

    pub(crate) async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub(crate) async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
