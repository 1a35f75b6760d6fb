use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use smartstock_ai::AiError;
use smartstock_simulator::SimulatorError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn ai_error_to_response(err: AiError) -> axum::response::Response {
    match err {
        AiError::NotReady(_) => json_error(StatusCode::SERVICE_UNAVAILABLE, "model_not_ready", err.to_string()),
        AiError::InvalidInput(_) => json_error(StatusCode::BAD_REQUEST, "invalid_input", err.to_string()),
        AiError::TrainingFailed(_) | AiError::InferenceFailed(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "model_error", err.to_string())
        }
    }
}

pub fn simulator_error_to_response(err: SimulatorError) -> axum::response::Response {
    match err {
        SimulatorError::UnknownEquipment(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
    }
}
