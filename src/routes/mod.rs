//! Routers de la API
//!
//! Capa HTTP delgada: cada sub-router extrae el estado compartido, delega en
//! controllers o services y deja que `AppError` se convierta en la respuesta.

pub mod audit_routes;
pub mod device_routes;
pub mod notification_routes;
pub mod passenger_routes;
pub mod route_routes;
pub mod session_routes;
pub mod telemetry_routes;
pub mod user_routes;
pub mod vehicle_routes;
