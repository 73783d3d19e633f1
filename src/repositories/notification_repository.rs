use chrono::Utc;
use sqlx::PgPool;

use crate::models::notification::Notification;
use crate::models::user::Role;
use crate::utils::errors::AppResult;

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn publish(
        &self,
        title: String,
        body: String,
        audience_role: Option<Role>,
    ) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (title, body, audience_role, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(audience_role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    pub async fn list(&self) -> AppResult<Vec<Notification>> {
        let notifications =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(notifications)
    }
}
