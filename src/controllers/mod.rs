//! Controllers
//!
//! Orquestación CRUD por entidad: validan el request, aplican las reglas de
//! unicidad y delegan en los repositorios. La lógica de planificación y ETA
//! no vive aquí sino en services.

pub mod device_controller;
pub mod route_controller;
pub mod user_controller;
pub mod vehicle_controller;
