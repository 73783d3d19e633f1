//! Dobles en memoria de los stores para las pruebas de integración de los
//! servicios. Implementan los mismos contratos que las versiones PostgreSQL,
//! incluida la unicidad de slot (resource, start_time) en la inserción.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;

use bus_fleet_tracking::models::route::{BusStop, Route};
use bus_fleet_tracking::models::session::{NewSession, ResourceRef, Session};
use bus_fleet_tracking::models::telemetry::{
    NewTelemetryPoint, TelemetryPoint, TELEMETRY_RETENTION,
};
use bus_fleet_tracking::repositories::audit_repository::AuditSink;
use bus_fleet_tracking::repositories::resource_directory::ResourceDirectory;
use bus_fleet_tracking::repositories::route_repository::RouteDirectory;
use bus_fleet_tracking::repositories::session_repository::SessionStore;
use bus_fleet_tracking::repositories::telemetry_repository::TelemetryStore;
use bus_fleet_tracking::services::{EtaEngine, PassengerSearch, SessionScheduler};
use bus_fleet_tracking::utils::errors::{AppError, AppResult};

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("timestamp de prueba inválido")
        .with_timezone(&Utc)
}

pub fn stop(name: &str, latitude: f64, longitude: f64) -> BusStop {
    BusStop {
        name: name.to_string(),
        latitude,
        longitude,
    }
}

pub fn route_with_stops(
    id: i64,
    route_name: &str,
    vehicle_id: i64,
    stops: Vec<BusStop>,
    estimated_time_minutes: i32,
) -> Route {
    let destination_name = stops
        .last()
        .map(|s| s.name.clone())
        .unwrap_or_default();
    Route {
        id,
        route_name: route_name.to_string(),
        vehicle_id,
        destination_name,
        stops: Json(stops),
        estimated_time_minutes,
        created_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Store de sesiones en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SessionTable {
    next_id: i64,
    sessions: HashMap<i64, Session>,
    slots: HashMap<(ResourceRef, DateTime<Utc>), i64>,
}

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<SessionTable>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slot_conflict(resource: ResourceRef, start_time: DateTime<Utc>) -> AppError {
    AppError::Conflict(format!(
        "{} '{}' already has a session starting at {}",
        resource.kind,
        resource.id,
        start_time.to_rfc3339()
    ))
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: NewSession) -> AppResult<Session> {
        let mut table = self.inner.lock().unwrap();
        for resource in session.resources() {
            if table.slots.contains_key(&(resource, session.start_time)) {
                return Err(slot_conflict(resource, session.start_time));
            }
        }

        table.next_id += 1;
        let stored = Session {
            id: table.next_id,
            driver_id: session.driver_id,
            conductor_id: session.conductor_id,
            vehicle_id: session.vehicle_id,
            route_id: session.route_id,
            start_time: session.start_time,
            end_time: session.end_time,
            ended: false,
            created_at: Utc::now(),
        };
        for resource in stored.resources() {
            table.slots.insert((resource, stored.start_time), stored.id);
        }
        table.sessions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, session: Session) -> AppResult<Session> {
        let mut table = self.inner.lock().unwrap();
        if !table.sessions.contains_key(&session.id) {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                session.id
            )));
        }
        // Verificar los slots nuevos antes de soltar los viejos; un fallo
        // deja la tabla como estaba, igual que la transacción PostgreSQL
        for resource in session.resources() {
            if let Some(&owner) = table.slots.get(&(resource, session.start_time)) {
                if owner != session.id {
                    return Err(slot_conflict(resource, session.start_time));
                }
            }
        }
        table.slots.retain(|_, owner| *owner != session.id);
        for resource in session.resources() {
            table
                .slots
                .insert((resource, session.start_time), session.id);
        }
        table.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        let table = self.inner.lock().unwrap();
        Ok(table.sessions.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        let table = self.inner.lock().unwrap();
        let mut sessions: Vec<Session> = table.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut table = self.inner.lock().unwrap();
        let existed = table.sessions.remove(&id).is_some();
        table.slots.retain(|_, owner| *owner != id);
        Ok(existed)
    }

    async fn set_end_time(&self, id: i64, end_time: DateTime<Utc>) -> AppResult<Session> {
        let mut table = self.inner.lock().unwrap();
        let session = table.sessions.get_mut(&id).ok_or_else(|| {
            AppError::NotFound(format!("Session with id '{}' not found", id))
        })?;
        session.end_time = Some(end_time);
        session.ended = true;
        Ok(session.clone())
    }

    async fn find_at(
        &self,
        resource: ResourceRef,
        start_time: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>> {
        let table = self.inner.lock().unwrap();
        match table.slots.get(&(resource, start_time)) {
            Some(&id) if Some(id) != exclude_session => Ok(table.sessions.get(&id).cloned()),
            _ => Ok(None),
        }
    }

    async fn latest_before(
        &self,
        resource: ResourceRef,
        before: DateTime<Utc>,
        exclude_session: Option<i64>,
    ) -> AppResult<Option<Session>> {
        let table = self.inner.lock().unwrap();
        let mut best: Option<&Session> = None;
        for ((slot_resource, start_time), id) in &table.slots {
            if *slot_resource != resource || *start_time >= before || Some(*id) == exclude_session {
                continue;
            }
            if let Some(session) = table.sessions.get(id) {
                if best.map_or(true, |b| session.start_time > b.start_time) {
                    best = Some(session);
                }
            }
        }
        Ok(best.cloned())
    }

    async fn active_for_route(&self, route_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
        let table = self.inner.lock().unwrap();
        let mut sessions: Vec<Session> = table
            .sessions
            .values()
            .filter(|s| s.route_id == Some(route_id) && s.is_active_at(now))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn upcoming_for_vehicle(
        &self,
        vehicle_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        let table = self.inner.lock().unwrap();
        Ok(table
            .sessions
            .values()
            .filter(|s| s.vehicle_id == vehicle_id && s.start_time >= now)
            .min_by_key(|s| s.start_time)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Directorio de rutas en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRouteDirectory {
    routes: Mutex<Vec<Route>>,
}

impl MemoryRouteDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[async_trait]
impl RouteDirectory for MemoryRouteDirectory {
    async fn get_route_by_id(&self, id: i64) -> AppResult<Option<Route>> {
        let routes = self.routes.lock().unwrap();
        Ok(routes.iter().find(|r| r.id == id).cloned())
    }

    async fn get_route_by_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Route>> {
        let routes = self.routes.lock().unwrap();
        Ok(routes.iter().find(|r| r.vehicle_id == vehicle_id).cloned())
    }

    async fn find_routes_by_destination(&self, destination: &str) -> AppResult<Vec<Route>> {
        let routes = self.routes.lock().unwrap();
        Ok(routes
            .iter()
            .filter(|r| r.destination_name == destination)
            .cloned()
            .collect())
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        Ok(self.routes.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Store de telemetría en memoria (misma ventana de retención que PostgreSQL)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TelemetryTable {
    next_id: i64,
    points: HashMap<i64, Vec<TelemetryPoint>>,
}

#[derive(Default)]
pub struct MemoryTelemetryStore {
    inner: Mutex<TelemetryTable>,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn append(&self, point: NewTelemetryPoint) -> AppResult<TelemetryPoint> {
        let mut table = self.inner.lock().unwrap();
        table.next_id += 1;
        let stored = TelemetryPoint {
            id: table.next_id,
            session_id: point.session_id,
            latitude: point.latitude,
            longitude: point.longitude,
            speed: point.speed,
            recorded_at: point.recorded_at,
        };
        let window = table.points.entry(point.session_id).or_default();
        window.push(stored.clone());
        window.sort_by_key(|p| (p.recorded_at, p.id));
        if window.len() > TELEMETRY_RETENTION {
            let excess = window.len() - TELEMETRY_RETENTION;
            window.drain(..excess);
        }
        Ok(stored)
    }

    async fn latest(&self, session_id: i64) -> AppResult<Option<TelemetryPoint>> {
        let table = self.inner.lock().unwrap();
        Ok(table
            .points
            .get(&session_id)
            .and_then(|window| window.last().cloned()))
    }

    async fn history(&self, session_id: i64) -> AppResult<Vec<TelemetryPoint>> {
        let table = self.inner.lock().unwrap();
        let mut window = table.points.get(&session_id).cloned().unwrap_or_default();
        window.reverse();
        Ok(window)
    }
}

// ---------------------------------------------------------------------------
// Directorio de recursos en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ResourceTable {
    drivers: HashMap<i64, String>,
    conductors: Vec<i64>,
    vehicles: Vec<i64>,
}

#[derive(Default)]
pub struct MemoryResourceDirectory {
    inner: Mutex<ResourceTable>,
}

impl MemoryResourceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_driver(&self, id: i64, name: &str) {
        self.inner.lock().unwrap().drivers.insert(id, name.to_string());
    }

    pub fn add_conductor(&self, id: i64) {
        self.inner.lock().unwrap().conductors.push(id);
    }

    pub fn add_vehicle(&self, id: i64) {
        self.inner.lock().unwrap().vehicles.push(id);
    }
}

#[async_trait]
impl ResourceDirectory for MemoryResourceDirectory {
    async fn driver_exists(&self, driver_id: i64) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().drivers.contains_key(&driver_id))
    }

    async fn conductor_exists(&self, conductor_id: i64) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().conductors.contains(&conductor_id))
    }

    async fn vehicle_exists(&self, vehicle_id: i64) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().vehicles.contains(&vehicle_id))
    }

    async fn driver_name(&self, driver_id: i64) -> AppResult<Option<String>> {
        Ok(self.inner.lock().unwrap().drivers.get(&driver_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Sumidero de auditoría en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acciones registradas, en orden de llegada
    pub fn actions(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, action, _)| action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, actor: &str, action: &str, detail: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push((actor.to_string(), action.to_string(), detail));
    }
}

// ---------------------------------------------------------------------------
// Backend de prueba con los servicios ya cableados
// ---------------------------------------------------------------------------

pub struct TestBackend {
    pub sessions: Arc<MemorySessionStore>,
    pub routes: Arc<MemoryRouteDirectory>,
    pub telemetry: Arc<MemoryTelemetryStore>,
    pub resources: Arc<MemoryResourceDirectory>,
    pub audit: Arc<MemoryAuditSink>,
    pub scheduler: SessionScheduler,
    pub eta: EtaEngine,
    pub search: PassengerSearch,
}

pub fn backend() -> TestBackend {
    let sessions = Arc::new(MemorySessionStore::new());
    let routes = Arc::new(MemoryRouteDirectory::new());
    let telemetry = Arc::new(MemoryTelemetryStore::new());
    let resources = Arc::new(MemoryResourceDirectory::new());
    let audit = Arc::new(MemoryAuditSink::new());

    let scheduler = SessionScheduler::new(
        sessions.clone(),
        routes.clone(),
        resources.clone(),
        audit.clone(),
    );
    let eta = EtaEngine::new(sessions.clone(), routes.clone(), telemetry.clone());
    let search = PassengerSearch::new(
        routes.clone(),
        sessions.clone(),
        telemetry.clone(),
        resources.clone(),
        eta.clone(),
    );

    TestBackend {
        sessions,
        routes,
        telemetry,
        resources,
        audit,
        scheduler,
        eta,
        search,
    }
}
