use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use smartstock_ai::{AnomalyPrediction, MaintenancePrediction, StateClassification, TrainableModel};
use smartstock_core::{Equipment, EquipmentId, MetricReading};

use crate::app::errors;
use crate::context::AppContext;

/// A live reading of one equipment scored by every metric model.
#[derive(Debug, Serialize)]
pub struct EquipmentHealth {
    pub equipment: Equipment,
    pub reading: MetricReading,
    pub maintenance: MaintenancePrediction,
    pub months_to_failure: u32,
    pub anomaly: AnomalyPrediction,
    pub classification: StateClassification,
}

pub async fn list(Extension(ctx): Extension<Arc<AppContext>>) -> impl IntoResponse {
    let equipment = ctx.simulator().equipment().to_vec();
    Json(equipment)
}

pub async fn maintenance(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: EquipmentId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("{e}")),
    };

    let (equipment, reading) = {
        let mut simulator = ctx.simulator();
        let reading = match simulator.generate_usage_metrics(id) {
            Ok(r) => r,
            Err(e) => return errors::simulator_error_to_response(e),
        };
        match simulator.get(id) {
            Some(e) => (e.clone(), reading),
            None => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "equipment not found"),
        }
    };

    let models = ctx.models();
    let features = reading.features();
    let scored = models.maintenance.predict(&features).and_then(|maintenance| {
        let months_to_failure = models
            .maintenance
            .estimate_months_to_failure(&features, &mut rand::rng())?;
        Ok(EquipmentHealth {
            maintenance,
            months_to_failure,
            anomaly: models.anomaly.predict(&features)?,
            classification: models.classifier.predict(&features)?,
            equipment,
            reading,
        })
    });

    match scored {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}
