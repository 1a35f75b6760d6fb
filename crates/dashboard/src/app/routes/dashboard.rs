use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    response::{Html, IntoResponse},
};

use crate::app::page;
use crate::context::AppContext;

pub async fn index(Extension(ctx): Extension<Arc<AppContext>>) -> Html<String> {
    let refresh_secs = ctx.config().refresh_interval.as_secs();
    Html(page::render(&ctx.latest(), refresh_secs, ctx.config().forecast_days))
}

pub async fn snapshot(Extension(ctx): Extension<Arc<AppContext>>) -> impl IntoResponse {
    Json(ctx.latest())
}
