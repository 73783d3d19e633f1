use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::telemetry::TelemetryPoint;

/// Request de ingesta de telemetría para una sesión activa.
/// `driver_id` es opcional: cuando la fuente está autenticada como chofer
/// debe coincidir con el chofer de la sesión (defensa contra spoofing).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTelemetryRequest {
    pub session_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub timestamp: Option<String>,
    pub driver_id: Option<i64>,
}

/// Response de un punto de telemetría
#[derive(Debug, Serialize)]
pub struct TelemetryResponse {
    pub id: i64,
    pub session_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl From<TelemetryPoint> for TelemetryResponse {
    fn from(point: TelemetryPoint) -> Self {
        Self {
            id: point.id,
            session_id: point.session_id,
            latitude: point.latitude,
            longitude: point.longitude,
            speed: point.speed,
            recorded_at: point.recorded_at,
        }
    }
}
