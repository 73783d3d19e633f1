use axum::{extract::State, routing::get, Json, Router};

use crate::models::audit::AuditEvent;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_audit_router() -> Router<AppState> {
    Router::new().route("/", get(list_audit_events))
}

/// Eventos de auditoría, del más reciente al más antiguo
async fn list_audit_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    let events = state.audit.list().await?;
    Ok(Json(events))
}
