use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use smartstock_ai::demand::DEFAULT_MOVING_AVERAGE_WINDOW;
use smartstock_ai::{DemandQuery, TrainableModel};
use smartstock_core::Category;

use crate::app::errors;
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    /// Days ahead; defaults to the configured dashboard horizon.
    pub horizon: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DemandParams {
    /// Trailing window in days; defaults to a week.
    pub window: Option<usize>,
}

fn parse_category(raw: &str) -> Result<Category, axum::response::Response> {
    raw.parse::<Category>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_category", format!("{e}")))
}

pub async fn forecast(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(category): Path<String>,
    Query(params): Query<ForecastParams>,
) -> axum::response::Response {
    let category = match parse_category(&category) {
        Ok(c) => c,
        Err(res) => return res,
    };

    let query = DemandQuery {
        category,
        horizon_days: params.horizon.unwrap_or(ctx.config().forecast_days),
    };

    match ctx.models().demand.predict(&query) {
        Ok(Some(f)) => (StatusCode::OK, Json(f)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "no_history",
            format!("no outbound history for {category}"),
        ),
        Err(e) => errors::ai_error_to_response(e),
    }
}

/// Daily outbound demand of one category with its trailing moving average.
pub async fn daily_demand(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(category): Path<String>,
    Query(params): Query<DemandParams>,
) -> axum::response::Response {
    let category = match parse_category(&category) {
        Ok(c) => c,
        Err(res) => return res,
    };

    let window = params.window.unwrap_or(DEFAULT_MOVING_AVERAGE_WINDOW);
    match ctx.models().demand.moving_average(category, window) {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}
