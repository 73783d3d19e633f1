//! DTOs de la API
//!
//! Requests y responses serializables que cruzan la frontera HTTP.
//! La validación de forma se hace aquí con `validator`; la validación de
//! dominio (conflictos, existencia) vive en servicios y controllers.

pub mod common;
pub mod device_dto;
pub mod notification_dto;
pub mod route_dto;
pub mod search_dto;
pub mod session_dto;
pub mod telemetry_dto;
pub mod user_dto;
pub mod vehicle_dto;
