//! Services module
//!
//! Este módulo contiene la lógica de negocio del sistema: el planificador de
//! sesiones con su detección de conflictos, el motor de posición/ETA y la
//! búsqueda de autobuses para pasajeros.

pub mod eta_service;
pub mod resource_locks;
pub mod scheduler_service;
pub mod search_service;

pub use eta_service::EtaEngine;
pub use scheduler_service::SessionScheduler;
pub use search_service::PassengerSearch;
