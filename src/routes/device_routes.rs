use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::device_controller::DeviceController;
use crate::dto::common::ApiResponse;
use crate::dto::device_dto::{
    AttestDeviceRequest, BindDeviceRequest, DeviceResponse, RegisterDeviceRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_device_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_device))
        .route("/", get(list_devices))
        .route("/:id", get(get_device))
        .route("/bind", post(bind_device))
        .route("/attest", post(attest_device))
}

async fn register_device(
    State(state): State<AppState>,
    Json(request): Json<RegisterDeviceRequest>,
) -> Result<Json<ApiResponse<DeviceResponse>>, AppError> {
    let controller = DeviceController::new(state.pool.clone());
    let response = controller.register(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Dispositivo registrado exitosamente".to_string(),
    )))
}

async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceResponse>, AppError> {
    let controller = DeviceController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceResponse>>, AppError> {
    let controller = DeviceController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn bind_device(
    State(state): State<AppState>,
    Json(request): Json<BindDeviceRequest>,
) -> Result<Json<DeviceResponse>, AppError> {
    let controller = DeviceController::new(state.pool.clone());
    let response = controller.bind_to_user(request).await?;
    Ok(Json(response))
}

async fn attest_device(
    State(state): State<AppState>,
    Json(request): Json<AttestDeviceRequest>,
) -> Result<Json<DeviceResponse>, AppError> {
    let controller = DeviceController::new(state.pool.clone());
    let response = controller.attest(request).await?;
    Ok(Json(response))
}
