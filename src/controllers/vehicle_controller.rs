use sqlx::PgPool;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;

        let vehicle = self
            .repository
            .create(request.registration_number, request.model, request.capacity)
            .await?;

        Ok(vehicle.into())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;
        Ok(vehicle.into())
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list().await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i64, request: UpdateVehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;

        let vehicle = self
            .repository
            .update(Vehicle {
                id: current.id,
                registration_number: request
                    .registration_number
                    .unwrap_or(current.registration_number),
                model: request.model.or(current.model),
                capacity: request.capacity.or(current.capacity),
                created_at: current.created_at,
            })
            .await?;

        Ok(vehicle.into())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Vehicle with id '{}' not found",
                id
            )));
        }
        Ok(())
    }
}
