//! Endpoints genéricos de usuarios
//!
//! Un solo router cubre los cuatro roles; el rol viene en el path y se
//! parsea a `Role`, con lo que admin/driver/conductor/passenger comparten
//! el mismo camino de código.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use std::str::FromStr;

use crate::controllers::user_controller::UserController;
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/:role", post(create_user))
        .route("/:role", get(list_users))
        .route("/:role/:id", get(get_user))
        .route("/:role/:id", put(update_user))
        .route("/:role/:id", delete(delete_user))
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::from_str(raw).map_err(AppError::BadRequest)
}

async fn create_user(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let role = parse_role(&role)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(role, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Usuario creado exitosamente".to_string(),
    )))
}

async fn list_users(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let role = parse_role(&role)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.list(role).await?;
    Ok(Json(response))
}

async fn get_user(
    State(state): State<AppState>,
    Path((role, id)): Path<(String, i64)>,
) -> Result<Json<UserResponse>, AppError> {
    let role = parse_role(&role)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.get_by_id(role, id).await?;
    Ok(Json(response))
}

async fn update_user(
    State(state): State<AppState>,
    Path((role, id)): Path<(String, i64)>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let role = parse_role(&role)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(role, id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Usuario actualizado exitosamente".to_string(),
    )))
}

async fn delete_user(
    State(state): State<AppState>,
    Path((role, id)): Path<(String, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = parse_role(&role)?;
    let controller = UserController::new(state.pool.clone());
    controller.delete(role, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Usuario eliminado exitosamente"
    })))
}
