use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::AppContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Training reports of every model.
pub async fn models(Extension(ctx): Extension<Arc<AppContext>>) -> impl IntoResponse {
    Json(ctx.training().clone())
}
