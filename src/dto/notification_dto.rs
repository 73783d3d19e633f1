use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::notification::Notification;
use crate::models::user::Role;

/// Request para publicar una notificación
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishNotificationRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub body: String,

    /// Rol destinatario; sin rol la notificación es para todos
    pub audience_role: Option<Role>,
}

/// Response de notificación para la API
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub audience_role: Option<Role>,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            title: notification.title,
            body: notification.body,
            audience_role: notification.audience_role,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}
