//! HTTP application wiring (Axum router + shared context).
//!
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: consistent JSON error responses
//! - `page.rs`: server-rendered HTML dashboard

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::context::AppContext;

pub mod errors;
pub mod page;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/", get(routes::dashboard::index))
        .nest("/api", routes::router())
        .layer(Extension(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::testing;

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let app = build_app(Arc::new(testing::context()));
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_category_is_a_json_bad_request() {
        let app = build_app(Arc::new(testing::context()));
        let (status, body) = get(app, "/api/forecast/toaster").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_category");
    }

    #[tokio::test]
    async fn category_path_is_case_insensitive() {
        let ctx = Arc::new(testing::context());
        let app = build_app(Arc::clone(&ctx));
        let (status, _) = get(app, "/api/forecast/NOTEBOOK").await;
        assert_ne!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn snapshot_route_serves_the_latest_snapshot() {
        let ctx = Arc::new(testing::context());
        let refreshed = ctx.refresh();
        let app = build_app(Arc::clone(&ctx));
        let (status, body) = get(app, "/api/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["total"], refreshed.counts.total);
        assert_eq!(
            body["generated_at"],
            serde_json::to_value(refreshed.generated_at).unwrap()
        );
    }
}
