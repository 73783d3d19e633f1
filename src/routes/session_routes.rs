//! Endpoints de sesiones
//!
//! El planificador vive en el estado compartido (los locks por recurso deben
//! ser únicos en el proceso); este router solo traduce HTTP <-> dominio. La
//! auditoría del ciclo de vida la emite el propio planificador.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::dto::common::ApiResponse;
use crate::dto::session_dto::{
    CreateSessionRequest, EndSessionRequest, SessionResponse, UpdateSessionRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_session))
        .route("/", get(list_sessions))
        .route("/:id", get(get_session))
        .route("/:id", put(update_session))
        .route("/:id", delete(delete_session))
        .route("/:id/end", post(end_session))
        .route("/vehicle/:vehicle_id/upcoming", get(upcoming_for_vehicle))
        .route("/route/:route_id/active", get(active_for_route))
}

async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let session = state.scheduler.create_session(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        session.into(),
        "Sesión iniciada exitosamente".to_string(),
    )))
}

async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = state.scheduler.list_sessions().await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.scheduler.get_session(id).await?;
    Ok(Json(session.into()))
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let session = state.scheduler.update_session(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        session.into(),
        "Sesión actualizada exitosamente".to_string(),
    )))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EndSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let session = state.scheduler.end_session(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        session.into(),
        "Sesión terminada exitosamente".to_string(),
    )))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let existed = state.scheduler.delete_session(id).await?;
    Ok(Json(json!({
        "success": true,
        "existed": existed
    })))
}

async fn upcoming_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<Option<SessionResponse>>, AppError> {
    let session = state
        .scheduler
        .get_upcoming_session_for_vehicle(vehicle_id)
        .await?;
    Ok(Json(session.map(Into::into)))
}

async fn active_for_route(
    State(state): State<AppState>,
    Path(route_id): Path<i64>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = state.scheduler.active_sessions_for_route(route_id).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}
