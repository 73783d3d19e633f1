//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El entry point construye aquí los stores
//! PostgreSQL y los inyecta una sola vez en los servicios; los locks por
//! recurso del planificador viven dentro del scheduler y por eso deben ser
//! únicos en el proceso.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::audit_repository::AuditRepository;
use crate::repositories::resource_directory::{PgResourceDirectory, ResourceDirectory};
use crate::repositories::route_repository::{PgRouteRepository, RouteDirectory};
use crate::repositories::session_repository::{PgSessionStore, SessionStore};
use crate::repositories::telemetry_repository::{PgTelemetryStore, TelemetryStore};
use crate::services::{EtaEngine, PassengerSearch, SessionScheduler};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub scheduler: SessionScheduler,
    pub eta: EtaEngine,
    pub search: PassengerSearch,
    pub audit: Arc<AuditRepository>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));
        let routes: Arc<dyn RouteDirectory> = Arc::new(PgRouteRepository::new(pool.clone()));
        let telemetry: Arc<dyn TelemetryStore> = Arc::new(PgTelemetryStore::new(pool.clone()));
        let resources: Arc<dyn ResourceDirectory> =
            Arc::new(PgResourceDirectory::new(pool.clone()));
        let audit = Arc::new(AuditRepository::new(pool.clone()));

        let scheduler = SessionScheduler::new(
            sessions.clone(),
            routes.clone(),
            resources.clone(),
            audit.clone(),
        );
        let eta = EtaEngine::new(sessions.clone(), routes.clone(), telemetry.clone());
        let search = PassengerSearch::new(routes, sessions, telemetry, resources, eta.clone());

        Self {
            pool,
            config,
            scheduler,
            eta,
            search,
            audit,
        }
    }
}
