use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Ruta creada exitosamente".to_string(),
    )))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Ruta actualizada exitosamente".to_string(),
    )))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}
