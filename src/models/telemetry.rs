//! Modelo de telemetría GPS
//!
//! Un reporte de telemetría es una muestra puntual (lat, lng, velocidad)
//! enviada por el dispositivo de una sesión activa. Solo se retienen los
//! últimos `TELEMETRY_RETENTION` reportes por sesión; el historial completo
//! queda en el log inmutable de telemetría.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cantidad de reportes recientes retenidos por sesión
pub const TELEMETRY_RETENTION: usize = 5;

/// Velocidad de respaldo en km/h cuando el reporte no trae velocidad
pub const FALLBACK_SPEED_KMH: f64 = 20.0;

/// Reporte de posición - mapea a las tablas telemetry_points y telemetry_log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TelemetryPoint {
    pub id: i64,
    pub session_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

/// Reporte nuevo, todavía sin identificador
#[derive(Debug, Clone)]
pub struct NewTelemetryPoint {
    pub session_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}
