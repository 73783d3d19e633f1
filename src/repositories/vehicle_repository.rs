use chrono::Utc;
use sqlx::PgPool;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

const REGISTRATION_CONSTRAINT: &str = "vehicles_registration_number_key";

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        registration_number: String,
        model: Option<String>,
        capacity: Option<i32>,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (registration_number, model, capacity, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&registration_number)
        .bind(&model)
        .bind(capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_registration_conflict(e, &registration_number))?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(vehicles)
    }

    pub async fn update(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let registration = vehicle.registration_number.clone();
        let stored = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration_number = $2, model = $3, capacity = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.model)
        .bind(vehicle.capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_registration_conflict(e, &registration))?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", vehicle.id)))?;

        Ok(stored)
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_registration_conflict(error: sqlx::Error, registration: &str) -> AppError {
    if super::is_unique_violation(&error, REGISTRATION_CONSTRAINT) {
        return AppError::Conflict(format!(
            "Vehicle with registration '{}' already exists",
            registration
        ));
    }
    AppError::Database(error)
}
