//! Repositorio de auditoría - append-only, nunca se actualiza ni borra

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::audit::AuditEvent;
use crate::utils::errors::AppResult;

/// Sumidero de eventos de auditoría que consume el ciclo de vida de
/// sesiones; registrar nunca falla hacia el llamador
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, actor: &str, action: &str, detail: serde_json::Value);
}

pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        actor: &str,
        action: &str,
        detail: serde_json::Value,
    ) -> AppResult<AuditEvent> {
        let event = sqlx::query_as::<_, AuditEvent>(
            r#"
            INSERT INTO audit_events (actor, action, detail, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(actor)
        .bind(action)
        .bind(Json(detail))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    /// Registrar sin propagar el error: un fallo de auditoría no debe
    /// tumbar la operación que lo origina
    pub async fn append_best_effort(&self, actor: &str, action: &str, detail: serde_json::Value) {
        if let Err(e) = self.append(actor, action, detail).await {
            tracing::warn!("⚠️ No se pudo registrar evento de auditoría '{}': {}", action, e);
        }
    }

    pub async fn list(&self) -> AppResult<Vec<AuditEvent>> {
        let events =
            sqlx::query_as::<_, AuditEvent>("SELECT * FROM audit_events ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(events)
    }
}

#[async_trait]
impl AuditSink for AuditRepository {
    async fn record(&self, actor: &str, action: &str, detail: serde_json::Value) {
        self.append_best_effort(actor, action, detail).await;
    }
}
