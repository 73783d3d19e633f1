//! Modelo de Device
//!
//! Dispositivo embarcado o teléfono que reporta telemetría. Un dispositivo
//! puede quedar vinculado a un usuario y ser atestado por un administrador.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Device principal - mapea exactamente a la tabla devices
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub id: i64,
    pub hardware_id: String,
    pub device_type: String,
    pub user_id: Option<i64>,
    pub attested: bool,
    pub attestation_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}
