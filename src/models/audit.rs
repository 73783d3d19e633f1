//! Eventos de auditoría
//!
//! Registro append-only de operaciones administrativas. Nunca se actualiza
//! ni se borra; un fallo al registrar se loguea y no afecta la operación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Evento de auditoría - mapea exactamente a la tabla audit_events
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEvent {
    pub id: i64,
    pub actor: String,
    pub action: String,
    pub detail: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
