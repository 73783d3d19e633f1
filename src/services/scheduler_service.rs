//! Planificador de sesiones
//!
//! Dueño de la invariante "ningún recurso (chofer, cobrador, vehículo) queda
//! comprometido en dos viajes que se solapen". Toda alta o modificación de
//! sesión pasa por dos verificaciones antes de persistir:
//!
//! 1. Conflicto duro: mismo recurso con exactamente el mismo start_time.
//! 2. Solapamiento: la sesión previa más reciente del recurso sigue ocupada
//!    (su fin efectivo es posterior al inicio propuesto; la comparación es
//!    estricta, arrancar justo cuando otra termina es válido).
//!
//! La sección crítica check-then-insert se protege con locks por recurso y,
//! como segunda barrera, con la constraint UNIQUE de session_slots.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::dto::session_dto::{CreateSessionRequest, EndSessionRequest, UpdateSessionRequest};
use crate::models::route::Route;
use crate::models::session::{ConflictCheck, NewSession, ResourceRef, Session};
use crate::repositories::audit_repository::AuditSink;
use crate::repositories::resource_directory::ResourceDirectory;
use crate::repositories::route_repository::RouteDirectory;
use crate::repositories::session_repository::SessionStore;
use crate::services::resource_locks::ResourceLockMap;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{parse_instant, parse_optional_instant};

#[derive(Clone)]
pub struct SessionScheduler {
    sessions: Arc<dyn SessionStore>,
    routes: Arc<dyn RouteDirectory>,
    resources: Arc<dyn ResourceDirectory>,
    audit: Arc<dyn AuditSink>,
    locks: Arc<ResourceLockMap>,
}

impl SessionScheduler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        routes: Arc<dyn RouteDirectory>,
        resources: Arc<dyn ResourceDirectory>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            sessions,
            routes,
            resources,
            audit,
            locks: Arc::new(ResourceLockMap::new()),
        }
    }

    /// Iniciar una sesión: verificación de conflictos, enganche automático
    /// de ruta y derivación de end_time, todo antes de persistir
    pub async fn create_session(&self, request: CreateSessionRequest) -> AppResult<Session> {
        let start_time = parse_instant(&request.start_time)?;
        self.ensure_resources_exist(request.driver_id, request.conductor_id, request.vehicle_id)
            .await?;

        let new_session = NewSession {
            driver_id: request.driver_id,
            conductor_id: request.conductor_id,
            vehicle_id: request.vehicle_id,
            route_id: None,
            start_time,
            end_time: None,
        };
        let resources = new_session.resources();

        let _guards = self.locks.acquire(&resources).await;
        self.ensure_conflict_free(&resources, start_time, None).await?;

        let route = self.routes.get_route_by_vehicle(request.vehicle_id).await?;
        let (route_id, end_time) = derive_route_binding(route.as_ref(), start_time);

        let session = self
            .sessions
            .insert(NewSession {
                route_id,
                end_time,
                ..new_session
            })
            .await?;

        info!(
            "🚌 Sesión {} iniciada: driver {} / vehicle {} @ {}",
            session.id,
            session.driver_id,
            session.vehicle_id,
            session.start_time.to_rfc3339()
        );
        self.audit
            .record(
                "admin",
                "session.start",
                json!({ "session_id": session.id, "vehicle_id": session.vehicle_id }),
            )
            .await;
        Ok(session)
    }

    /// Actualizar una sesión superponiendo los campos parciales y repitiendo
    /// las verificaciones de conflicto, excluyéndose a sí misma
    pub async fn update_session(
        &self,
        session_id: i64,
        request: UpdateSessionRequest,
    ) -> AppResult<Session> {
        let existing = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;

        let driver_id = request.driver_id.unwrap_or(existing.driver_id);
        let conductor_id = request.conductor_id.or(existing.conductor_id);
        let vehicle_id = request.vehicle_id.unwrap_or(existing.vehicle_id);
        let start_time = match request.start_time.as_deref() {
            Some(raw) => parse_instant(raw)?,
            None => existing.start_time,
        };

        self.ensure_resources_exist(driver_id, conductor_id, vehicle_id)
            .await?;

        let updated = Session {
            driver_id,
            conductor_id,
            vehicle_id,
            start_time,
            ..existing
        };
        let resources = updated.resources();

        let _guards = self.locks.acquire(&resources).await;
        self.ensure_conflict_free(&resources, start_time, Some(session_id))
            .await?;

        let route = self.routes.get_route_by_vehicle(vehicle_id).await?;
        let (route_id, end_time) = derive_route_binding(route.as_ref(), start_time);

        let session = self
            .sessions
            .replace(Session {
                route_id,
                end_time,
                ended: false,
                ..updated
            })
            .await?;

        info!("✏️ Sesión {} actualizada", session.id);
        self.audit
            .record(
                "admin",
                "session.update",
                json!({ "session_id": session.id, "start_time": session.start_time.to_rfc3339() }),
            )
            .await;
        Ok(session)
    }

    /// Registrar el fin explícito de un viaje
    pub async fn end_session(
        &self,
        session_id: i64,
        request: EndSessionRequest,
    ) -> AppResult<Session> {
        let existing = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;

        if existing.ended {
            return Err(AppError::BadRequest("Session already ended".to_string()));
        }

        let end_time = parse_optional_instant(request.end_time.as_deref())?.unwrap_or_else(Utc::now);
        let session = self.sessions.set_end_time(session_id, end_time).await?;

        info!(
            "🏁 Sesión {} terminada a las {}",
            session.id,
            end_time.to_rfc3339()
        );
        self.audit
            .record(
                "admin",
                "session.end",
                json!({ "session_id": session.id, "end_time": end_time.to_rfc3339() }),
            )
            .await;
        Ok(session)
    }

    /// Eliminación incondicional; devuelve si existía un registro
    pub async fn delete_session(&self, session_id: i64) -> AppResult<bool> {
        let existed = self.sessions.delete(session_id).await?;
        if existed {
            info!("🗑️ Sesión {} eliminada", session_id);
            self.audit
                .record("admin", "session.delete", json!({ "session_id": session_id }))
                .await;
        }
        Ok(existed)
    }

    pub async fn get_session(&self, session_id: i64) -> AppResult<Session> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))
    }

    /// Todas las sesiones, por start_time ascendente
    pub async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        self.sessions.list().await
    }

    /// Próxima sesión del vehículo (start_time más cercano >= ahora)
    pub async fn get_upcoming_session_for_vehicle(
        &self,
        vehicle_id: i64,
    ) -> AppResult<Option<Session>> {
        self.sessions.upcoming_for_vehicle(vehicle_id, Utc::now()).await
    }

    /// Sesiones de la ruta todavía activas (end_time nulo o futuro)
    pub async fn active_sessions_for_route(&self, route_id: i64) -> AppResult<Vec<Session>> {
        self.sessions.active_for_route(route_id, Utc::now()).await
    }

    async fn ensure_resources_exist(
        &self,
        driver_id: i64,
        conductor_id: Option<i64>,
        vehicle_id: i64,
    ) -> AppResult<()> {
        if !self.resources.driver_exists(driver_id).await? {
            return Err(AppError::NotFound(format!(
                "Driver with id '{}' not found",
                driver_id
            )));
        }
        if !self.resources.vehicle_exists(vehicle_id).await? {
            return Err(AppError::NotFound(format!(
                "Vehicle with id '{}' not found",
                vehicle_id
            )));
        }
        if let Some(conductor_id) = conductor_id {
            if !self.resources.conductor_exists(conductor_id).await? {
                return Err(AppError::NotFound(format!(
                    "Conductor with id '{}' not found",
                    conductor_id
                )));
            }
        }
        Ok(())
    }

    /// Pasos 1 y 2 del alta: conflicto duro y solapamiento, por recurso
    async fn ensure_conflict_free(
        &self,
        resources: &[ResourceRef],
        start_time: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<()> {
        for resource in resources {
            let check = self
                .hard_conflict(*resource, start_time, exclude_session)
                .await?;
            if let Some(existing) = conflicting(check) {
                return Err(AppError::Conflict(format!(
                    "{} '{}' already has a session (id {}) starting exactly at {}",
                    resource.kind,
                    resource.id,
                    existing.id,
                    start_time.to_rfc3339()
                )));
            }
        }

        for resource in resources {
            let (check, busy_until) = self
                .overlap_conflict(*resource, start_time, exclude_session)
                .await?;
            if let Some(prior) = conflicting(check) {
                let until = busy_until.unwrap_or(prior.start_time);
                return Err(AppError::Conflict(format!(
                    "{} '{}' is still committed to vehicle '{}' until {}",
                    resource.kind,
                    resource.id,
                    prior.vehicle_id,
                    until.to_rfc3339()
                )));
            }
        }
        Ok(())
    }

    /// Paso 1: mismo recurso con exactamente el mismo start_time
    async fn hard_conflict(
        &self,
        resource: ResourceRef,
        start_time: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<ConflictCheck> {
        match self
            .sessions
            .find_at(resource, start_time, exclude_session)
            .await?
        {
            Some(existing) => Ok(ConflictCheck::against(existing)),
            None => Ok(ConflictCheck::clear()),
        }
    }

    /// Paso 2: la sesión previa más reciente del recurso sigue ocupada.
    /// Sin sesión previa el chequeo pasa trivialmente; una ruta sin duración
    /// declarada produce una ventana de longitud cero que nunca solapa.
    async fn overlap_conflict(
        &self,
        resource: ResourceRef,
        proposed_start: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<(ConflictCheck, Option<DateTime<Utc>>)> {
        let prior = match self
            .sessions
            .latest_before(resource, proposed_start, exclude_session)
            .await?
        {
            Some(prior) => prior,
            None => return Ok((ConflictCheck::clear(), None)),
        };

        let minutes = self.route_minutes_for(&prior).await?;
        let busy_until = prior.effective_end(minutes);

        // Comparación estricta: empezar justo cuando la previa termina es válido
        if busy_until > proposed_start {
            return Ok((ConflictCheck::against(prior), Some(busy_until)));
        }
        Ok((ConflictCheck::clear(), None))
    }

    /// Duración estimada de la ruta comprometida por una sesión previa:
    /// primero la ruta enganchada, si no la ruta vinculada a su vehículo
    async fn route_minutes_for(&self, session: &Session) -> AppResult<Option<i32>> {
        let route = match session.route_id {
            Some(route_id) => self.routes.get_route_by_id(route_id).await?,
            None => self.routes.get_route_by_vehicle(session.vehicle_id).await?,
        };
        Ok(route.map(|r| r.estimated_time_minutes))
    }
}

/// Paso 3 y 4 del alta: enganche de ruta y derivación del fin.
/// Una duración desconocida o cero no deriva fin.
fn derive_route_binding(
    route: Option<&Route>,
    start_time: DateTime<Utc>,
) -> (Option<i64>, Option<DateTime<Utc>>) {
    match route {
        Some(route) => {
            let end_time = if route.estimated_time_minutes > 0 {
                Some(start_time + Duration::minutes(route.estimated_time_minutes as i64))
            } else {
                None
            };
            (Some(route.id), end_time)
        }
        None => (None, None),
    }
}

fn conflicting(check: ConflictCheck) -> Option<Session> {
    if check.is_conflicting {
        check.conflicting_session
    } else {
        None
    }
}

fn session_not_found(session_id: i64) -> AppError {
    AppError::NotFound(format!("Session with id '{}' not found", session_id))
}
