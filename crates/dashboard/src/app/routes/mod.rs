use axum::{Router, routing::get};

pub mod dashboard;
pub mod equipment;
pub mod forecast;
pub mod system;

/// JSON API mounted under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/snapshot", get(dashboard::snapshot))
        .route("/models", get(system::models))
        .route("/equipment", get(equipment::list))
        .route("/equipment/:id/maintenance", get(equipment::maintenance))
        .route("/forecast/:category", get(forecast::forecast))
        .route("/demand/:category", get(forecast::daily_demand))
}
