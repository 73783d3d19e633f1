use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::common::ApiResponse;
use crate::dto::telemetry_dto::{RecordTelemetryRequest, TelemetryResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_telemetry_router() -> Router<AppState> {
    Router::new()
        .route("/send", post(record_telemetry))
        .route("/session/:session_id", get(session_history))
}

async fn record_telemetry(
    State(state): State<AppState>,
    Json(request): Json<RecordTelemetryRequest>,
) -> Result<Json<ApiResponse<TelemetryResponse>>, AppError> {
    let point = state.eta.record_telemetry(request).await?;
    Ok(Json(ApiResponse::success(point.into())))
}

/// Ventana retenida de la sesión (últimos 5 reportes, más reciente primero)
async fn session_history(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<Vec<TelemetryResponse>>, AppError> {
    let points = state.eta.telemetry_history(session_id).await?;
    Ok(Json(points.into_iter().map(Into::into).collect()))
}
