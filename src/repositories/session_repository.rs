//! Store de sesiones
//!
//! El trait `SessionStore` es el contrato que consume el planificador; la
//! implementación PostgreSQL persiste cada sesión junto con sus "slots" de
//! recurso en la misma transacción. La constraint UNIQUE sobre
//! (resource_kind, resource_id, start_time) convierte la carrera de dos
//! altas simultáneas al mismo instante en un fallo determinista del perdedor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::session::{NewSession, ResourceRef, Session};
use crate::utils::errors::{AppError, AppResult};

/// Nombre de la constraint que cierra la carrera check-then-insert
const SLOT_UNIQUE_CONSTRAINT: &str = "session_slots_resource_start_key";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insertar la sesión y sus slots de recurso de forma atómica.
    /// Un slot ya tomado produce `AppError::Conflict`.
    async fn insert(&self, session: NewSession) -> AppResult<Session>;

    /// Reescribir una sesión existente, reemplazando sus slots atómicamente
    async fn replace(&self, session: Session) -> AppResult<Session>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Session>>;

    /// Todas las sesiones, ordenadas por start_time ascendente
    async fn list(&self) -> AppResult<Vec<Session>>;

    /// Eliminar sin condiciones; devuelve si existía un registro
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn set_end_time(&self, id: i64, end_time: DateTime<Utc>) -> AppResult<Session>;

    /// Sesión del recurso con exactamente este start_time, si existe
    async fn find_at(
        &self,
        resource: ResourceRef,
        start_time: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>>;

    /// Sesión más reciente del recurso que inicia estrictamente antes del
    /// instante dado (orden start_time descendente)
    async fn latest_before(
        &self,
        resource: ResourceRef,
        before: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>>;

    /// Sesiones de la ruta con end_time nulo o futuro
    async fn active_for_route(&self, route_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>>;

    /// Sesión del vehículo con el start_time más próximo >= now
    async fn upcoming_for_vehicle(
        &self,
        vehicle_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>>;
}

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_slots(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session_id: i64,
        resources: &[ResourceRef],
        start_time: DateTime<Utc>,
    ) -> AppResult<()> {
        for resource in resources {
            sqlx::query(
                r#"
                INSERT INTO session_slots (session_id, resource_kind, resource_id, start_time)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session_id)
            .bind(resource.kind)
            .bind(resource.id)
            .bind(start_time)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_slot_conflict(&e) {
                    AppError::Conflict(format!(
                        "{} '{}' already has a session starting at {}",
                        resource.kind,
                        resource.id,
                        start_time.to_rfc3339()
                    ))
                } else {
                    AppError::Database(e)
                }
            })?;
        }
        Ok(())
    }
}

fn is_slot_conflict(error: &sqlx::Error) -> bool {
    super::is_unique_violation(error, SLOT_UNIQUE_CONSTRAINT)
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, session: NewSession) -> AppResult<Session> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (driver_id, conductor_id, vehicle_id, route_id, start_time, end_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(session.driver_id)
        .bind(session.conductor_id)
        .bind(session.vehicle_id)
        .bind(session.route_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let resources = session.resources();
        Self::insert_slots(&mut tx, stored.id, &resources, stored.start_time).await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn replace(&self, session: Session) -> AppResult<Session> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET driver_id = $2, conductor_id = $3, vehicle_id = $4, route_id = $5,
                start_time = $6, end_time = $7, ended = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(session.driver_id)
        .bind(session.conductor_id)
        .bind(session.vehicle_id)
        .bind(session.route_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.ended)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", session.id)))?;

        sqlx::query("DELETE FROM session_slots WHERE session_id = $1")
            .bind(stored.id)
            .execute(&mut *tx)
            .await?;

        let resources = stored.resources();
        Self::insert_slots(&mut tx, stored.id, &resources, stored.start_time).await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        let sessions =
            sqlx::query_as::<_, Session>("SELECT * FROM sessions ORDER BY start_time ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(sessions)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_end_time(&self, id: i64, end_time: DateTime<Utc>) -> AppResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            "UPDATE sessions SET end_time = $2, ended = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))?;
        Ok(session)
    }

    async fn find_at(
        &self,
        resource: ResourceRef,
        start_time: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT s.* FROM sessions s
            JOIN session_slots sl ON sl.session_id = s.id
            WHERE sl.resource_kind = $1 AND sl.resource_id = $2 AND sl.start_time = $3
              AND ($4::bigint IS NULL OR s.id <> $4)
            LIMIT 1
            "#,
        )
        .bind(resource.kind)
        .bind(resource.id)
        .bind(start_time)
        .bind(exclude_session)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn latest_before(
        &self,
        resource: ResourceRef,
        before: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT s.* FROM sessions s
            JOIN session_slots sl ON sl.session_id = s.id
            WHERE sl.resource_kind = $1 AND sl.resource_id = $2 AND sl.start_time < $3
              AND ($4::bigint IS NULL OR s.id <> $4)
            ORDER BY sl.start_time DESC
            LIMIT 1
            "#,
        )
        .bind(resource.kind)
        .bind(resource.id)
        .bind(before)
        .bind(exclude_session)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn active_for_route(&self, route_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT * FROM sessions
            WHERE route_id = $1 AND (end_time IS NULL OR end_time > $2)
            ORDER BY start_time ASC
            "#,
        )
        .bind(route_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn upcoming_for_vehicle(
        &self,
        vehicle_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT * FROM sessions
            WHERE vehicle_id = $1 AND start_time >= $2
            ORDER BY start_time ASC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }
}
