//! Motor de posición / ETA
//!
//! Convierte la última posición conocida de la sesión en una estimación de
//! minutos hasta una parada nombrada. La ausencia de datos (sesión o ruta o
//! parada o telemetría inexistente) es un resultado normal `None`, nunca un
//! error; los fallos de storage sí se propagan.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::dto::telemetry_dto::RecordTelemetryRequest;
use crate::models::telemetry::{NewTelemetryPoint, TelemetryPoint, FALLBACK_SPEED_KMH};
use crate::repositories::route_repository::RouteDirectory;
use crate::repositories::session_repository::SessionStore;
use crate::repositories::telemetry_repository::TelemetryStore;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::{distance_meters, is_valid_gps};
use crate::utils::validation::parse_optional_instant;

#[derive(Clone)]
pub struct EtaEngine {
    sessions: Arc<dyn SessionStore>,
    routes: Arc<dyn RouteDirectory>,
    telemetry: Arc<dyn TelemetryStore>,
}

impl EtaEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        routes: Arc<dyn RouteDirectory>,
        telemetry: Arc<dyn TelemetryStore>,
    ) -> Self {
        Self {
            sessions,
            routes,
            telemetry,
        }
    }

    /// Minutos estimados desde la última posición reportada de la sesión
    /// hasta la parada con ese nombre exacto dentro de su ruta.
    /// `Ok(None)` cubre todos los caminos sin datos.
    pub async fn compute_eta_to_stop(
        &self,
        session_id: i64,
        stop_name: &str,
    ) -> AppResult<Option<i64>> {
        let session = match self.sessions.find_by_id(session_id).await? {
            Some(session) => session,
            None => return Ok(None),
        };
        let route_id = match session.route_id {
            Some(route_id) => route_id,
            None => return Ok(None),
        };
        let route = match self.routes.get_route_by_id(route_id).await? {
            Some(route) => route,
            None => return Ok(None),
        };
        let stop = match route.find_stop(stop_name) {
            Some(stop) => stop.clone(),
            None => return Ok(None),
        };
        let point = match self.telemetry.latest(session_id).await? {
            Some(point) => point,
            None => return Ok(None),
        };

        let distance_m =
            distance_meters(point.latitude, point.longitude, stop.latitude, stop.longitude);

        let speed_kmh = match point.speed {
            Some(speed) if speed > 0.0 => speed,
            _ => FALLBACK_SPEED_KMH,
        };
        let speed_ms = speed_kmh * 1000.0 / 3600.0;
        let eta_minutes = (distance_m / speed_ms / 60.0).floor() as i64;

        debug!(
            "📍 ETA sesión {} -> '{}': {:.0} m a {:.1} km/h = {} min",
            session_id, stop_name, distance_m, speed_kmh, eta_minutes
        );
        Ok(Some(eta_minutes))
    }

    /// Ingesta de un reporte de telemetría de una sesión activa.
    /// Valida GPS, confirma la sesión y, si el reporte viene autenticado
    /// como chofer, que coincida con el chofer de la sesión.
    pub async fn record_telemetry(
        &self,
        request: RecordTelemetryRequest,
    ) -> AppResult<TelemetryPoint> {
        if !is_valid_gps(request.latitude, request.longitude) {
            return Err(AppError::Validation(format!(
                "Invalid GPS coordinates ({}, {}): latitude must be in [-90, 90] and longitude in [-180, 180]",
                request.latitude, request.longitude
            )));
        }

        let session = self
            .sessions
            .find_by_id(request.session_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Session with id '{}' not found",
                    request.session_id
                ))
            })?;

        if let Some(driver_id) = request.driver_id {
            if driver_id != session.driver_id {
                return Err(AppError::Validation(format!(
                    "Driver '{}' does not match the driver of session '{}'",
                    driver_id, session.id
                )));
            }
        }

        let recorded_at =
            parse_optional_instant(request.timestamp.as_deref())?.unwrap_or_else(Utc::now);

        self.telemetry
            .append(NewTelemetryPoint {
                session_id: session.id,
                latitude: request.latitude,
                longitude: request.longitude,
                speed: request.speed,
                recorded_at,
            })
            .await
    }

    /// Ventana retenida de la sesión, del más reciente al más antiguo
    pub async fn telemetry_history(&self, session_id: i64) -> AppResult<Vec<TelemetryPoint>> {
        self.telemetry.history(session_id).await
    }
}
