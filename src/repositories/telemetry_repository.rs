//! Store de telemetría
//!
//! Dos destinos por reporte: la ventana retenida `telemetry_points` (solo los
//! últimos N por sesión, el recorte no necesita ser atómico con el insert) y
//! el log inmutable `telemetry_log` para auditoría e historial.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::telemetry::{NewTelemetryPoint, TelemetryPoint, TELEMETRY_RETENTION};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Insertar el punto en la ventana retenida (recortando el excedente)
    /// y en el log inmutable
    async fn append(&self, point: NewTelemetryPoint) -> AppResult<TelemetryPoint>;

    /// Punto retenido más reciente de la sesión
    async fn latest(&self, session_id: i64) -> AppResult<Option<TelemetryPoint>>;

    /// Ventana retenida completa, del más reciente al más antiguo
    async fn history(&self, session_id: i64) -> AppResult<Vec<TelemetryPoint>>;
}

pub struct PgTelemetryStore {
    pool: PgPool,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn append(&self, point: NewTelemetryPoint) -> AppResult<TelemetryPoint> {
        let stored = sqlx::query_as::<_, TelemetryPoint>(
            r#"
            INSERT INTO telemetry_points (session_id, latitude, longitude, speed, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(point.session_id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(point.speed)
        .bind(point.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        // Recorte de retención: conserva solo los N más recientes
        sqlx::query(
            r#"
            DELETE FROM telemetry_points
            WHERE session_id = $1 AND id NOT IN (
                SELECT id FROM telemetry_points
                WHERE session_id = $1
                ORDER BY recorded_at DESC, id DESC
                LIMIT $2
            )
            "#,
        )
        .bind(point.session_id)
        .bind(TELEMETRY_RETENTION as i64)
        .execute(&self.pool)
        .await?;

        // Registro inmutable para auditoría
        sqlx::query(
            r#"
            INSERT INTO telemetry_log (session_id, latitude, longitude, speed, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(point.session_id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(point.speed)
        .bind(point.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn latest(&self, session_id: i64) -> AppResult<Option<TelemetryPoint>> {
        let point = sqlx::query_as::<_, TelemetryPoint>(
            r#"
            SELECT * FROM telemetry_points
            WHERE session_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(point)
    }

    async fn history(&self, session_id: i64) -> AppResult<Vec<TelemetryPoint>> {
        let points = sqlx::query_as::<_, TelemetryPoint>(
            r#"
            SELECT * FROM telemetry_points
            WHERE session_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(session_id)
        .bind(TELEMETRY_RETENTION as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }
}
