//! Capa de persistencia
//!
//! Repositorios concretos sobre PostgreSQL (sqlx) y los traits de store que
//! se inyectan en los servicios. Los servicios dependen de los traits, nunca
//! de un pool global; el entry point construye las implementaciones Pg.

pub mod audit_repository;
pub mod device_repository;
pub mod notification_repository;
pub mod resource_directory;
pub mod route_repository;
pub mod session_repository;
pub mod telemetry_repository;
pub mod user_repository;
pub mod vehicle_repository;

/// Detectar violación de una constraint UNIQUE concreta de PostgreSQL
pub(crate) fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
    match error {
        sqlx::Error::Database(db) => db.constraint() == Some(constraint),
        _ => false,
    }
}
