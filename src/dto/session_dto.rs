use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::Session;

/// Request para iniciar una sesión. `start_time` viene como string RFC3339
/// y se valida al parsear; un formato inválido es error de validación.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub driver_id: i64,
    pub conductor_id: Option<i64>,
    pub vehicle_id: i64,
    pub start_time: String,
}

/// Request para actualizar una sesión existente (campos parciales)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSessionRequest {
    pub driver_id: Option<i64>,
    pub conductor_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub start_time: Option<String>,
}

/// Request para terminar una sesión; sin `end_time` se usa el instante actual
#[derive(Debug, Clone, Deserialize)]
pub struct EndSessionRequest {
    pub end_time: Option<String>,
}

/// Response de sesión para la API
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub driver_id: i64,
    pub conductor_id: Option<i64>,
    pub vehicle_id: i64,
    pub route_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            driver_id: session.driver_id,
            conductor_id: session.conductor_id,
            vehicle_id: session.vehicle_id,
            route_id: session.route_id,
            start_time: session.start_time,
            end_time: session.end_time,
            created_at: session.created_at,
        }
    }
}
