use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::notification_dto::{NotificationResponse, PublishNotificationRequest};
use crate::repositories::notification_repository::NotificationRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", post(publish_notification))
        .route("/", get(list_notifications))
}

async fn publish_notification(
    State(state): State<AppState>,
    Json(request): Json<PublishNotificationRequest>,
) -> Result<Json<ApiResponse<NotificationResponse>>, AppError> {
    request.validate()?;
    let repository = NotificationRepository::new(state.pool.clone());
    let notification = repository
        .publish(request.title, request.body, request.audience_role)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        notification.into(),
        "Notificación publicada exitosamente".to_string(),
    )))
}

async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let repository = NotificationRepository::new(state.pool.clone());
    let notifications = repository.list().await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}
