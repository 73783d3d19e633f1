//! Modelo de Notification
//!
//! Mecanismo simple de publicación: las notificaciones se insertan y se
//! listan; la entrega a dispositivos queda fuera de este backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::Role;

/// Notification principal - mapea exactamente a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub audience_role: Option<Role>,
    pub created_at: DateTime<Utc>,
}
