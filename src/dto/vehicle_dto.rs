use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::Vehicle;

/// Request para registrar un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 4, max = 20))]
    pub registration_number: String,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1, max = 300))]
    pub capacity: Option<i32>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 4, max = 20))]
    pub registration_number: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1, max = 300))]
    pub capacity: Option<i32>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub registration_number: String,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            model: vehicle.model,
            capacity: vehicle.capacity,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}
