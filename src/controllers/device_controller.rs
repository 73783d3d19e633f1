use sqlx::PgPool;
use validator::Validate;

use crate::dto::device_dto::{
    AttestDeviceRequest, BindDeviceRequest, DeviceResponse, RegisterDeviceRequest,
};
use crate::repositories::device_repository::DeviceRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct DeviceController {
    repository: DeviceRepository,
    pool: PgPool,
}

impl DeviceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DeviceRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn register(&self, request: RegisterDeviceRequest) -> AppResult<DeviceResponse> {
        request.validate()?;
        let device = self
            .repository
            .register(request.hardware_id, request.device_type)
            .await?;
        Ok(device.into())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<DeviceResponse> {
        let device = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device with id '{}' not found", id)))?;
        Ok(device.into())
    }

    pub async fn list(&self) -> AppResult<Vec<DeviceResponse>> {
        let devices = self.repository.list().await?;
        Ok(devices.into_iter().map(Into::into).collect())
    }

    /// Vincular el dispositivo a un usuario existente de cualquier rol
    pub async fn bind_to_user(&self, request: BindDeviceRequest) -> AppResult<DeviceResponse> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(request.user_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists.0 {
            return Err(AppError::NotFound(format!(
                "User with id '{}' not found",
                request.user_id
            )));
        }

        let device = self
            .repository
            .bind_to_user(request.device_id, request.user_id)
            .await?;
        Ok(device.into())
    }

    pub async fn attest(&self, request: AttestDeviceRequest) -> AppResult<DeviceResponse> {
        let device = self
            .repository
            .attest(request.device_id, request.attested, request.attestation_hash)
            .await?;
        Ok(device.into())
    }
}
