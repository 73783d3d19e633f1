//! Directorio de recursos
//!
//! Verificaciones de existencia que el planificador necesita antes de
//! comprometer un recurso, y el nombre del chofer para la búsqueda de
//! pasajeros. Es el único contrato que el core conoce sobre usuarios y
//! vehículos.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::user::Role;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    async fn driver_exists(&self, driver_id: i64) -> AppResult<bool>;
    async fn conductor_exists(&self, conductor_id: i64) -> AppResult<bool>;
    async fn vehicle_exists(&self, vehicle_id: i64) -> AppResult<bool>;
    async fn driver_name(&self, driver_id: i64) -> AppResult<Option<String>>;
}

pub struct PgResourceDirectory {
    pool: PgPool,
}

impl PgResourceDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, id: i64, role: Role) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)")
                .bind(id)
                .bind(role)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }
}

#[async_trait]
impl ResourceDirectory for PgResourceDirectory {
    async fn driver_exists(&self, driver_id: i64) -> AppResult<bool> {
        self.user_exists(driver_id, Role::Driver).await
    }

    async fn conductor_exists(&self, conductor_id: i64) -> AppResult<bool> {
        self.user_exists(conductor_id, Role::Conductor).await
    }

    async fn vehicle_exists(&self, vehicle_id: i64) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(vehicle_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }

    async fn driver_name(&self, driver_id: i64) -> AppResult<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM users WHERE id = $1 AND role = $2")
                .bind(driver_id)
                .bind(Role::Driver)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(name,)| name))
    }
}
