use chrono::Utc;
use sqlx::PgPool;

use crate::models::device::Device;
use crate::utils::errors::{AppError, AppResult};

const HARDWARE_ID_CONSTRAINT: &str = "devices_hardware_id_key";

pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, hardware_id: String, device_type: String) -> AppResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (hardware_id, device_type, attested, created_at)
            VALUES ($1, $2, false, $3)
            RETURNING *
            "#,
        )
        .bind(&hardware_id)
        .bind(&device_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e, HARDWARE_ID_CONSTRAINT) {
                AppError::Conflict(format!(
                    "Device with hardware id '{}' already exists",
                    hardware_id
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(device)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(device)
    }

    pub async fn list(&self) -> AppResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>("SELECT * FROM devices ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(devices)
    }

    pub async fn bind_to_user(&self, device_id: i64, user_id: i64) -> AppResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            "UPDATE devices SET user_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(device_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device with id '{}' not found", device_id)))?;
        Ok(device)
    }

    pub async fn attest(
        &self,
        device_id: i64,
        attested: bool,
        attestation_hash: Option<String>,
    ) -> AppResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            "UPDATE devices SET attested = $2, attestation_hash = $3 WHERE id = $1 RETURNING *",
        )
        .bind(device_id)
        .bind(attested)
        .bind(attestation_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device with id '{}' not found", device_id)))?;
        Ok(device)
    }
}
