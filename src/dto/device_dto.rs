use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::device::Device;

/// Request para registrar un dispositivo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDeviceRequest {
    #[validate(length(min = 4, max = 64))]
    pub hardware_id: String,

    #[validate(length(min = 2, max = 30))]
    pub device_type: String,
}

/// Request para vincular un dispositivo a un usuario
#[derive(Debug, Clone, Deserialize)]
pub struct BindDeviceRequest {
    pub device_id: i64,
    pub user_id: i64,
}

/// Request para atestar un dispositivo
#[derive(Debug, Clone, Deserialize)]
pub struct AttestDeviceRequest {
    pub device_id: i64,
    pub attested: bool,
    pub attestation_hash: Option<String>,
}

/// Response de dispositivo para la API
#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    pub id: i64,
    pub hardware_id: String,
    pub device_type: String,
    pub user_id: Option<i64>,
    pub attested: bool,
    pub attestation_hash: Option<String>,
    pub created_at: String,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            hardware_id: device.hardware_id,
            device_type: device.device_type,
            user_id: device.user_id,
            attested: device.attested,
            attestation_hash: device.attestation_hash,
            created_at: device.created_at.to_rfc3339(),
        }
    }
}
