//! Búsqueda de autobuses para pasajeros
//!
//! Compone el directorio de rutas, el planificador de sesiones y el motor de
//! ETA para responder "qué autobuses vienen hacia mi parada". La coincidencia
//! de destino es exacta y sensible a mayúsculas; el empate entre paradas
//! equidistantes lo gana la primera encontrada en el orden de recorrido.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::dto::search_dto::{BusResult, SearchBusesRequest, SearchBusesResponse};
use crate::models::route::Route;
use crate::repositories::resource_directory::ResourceDirectory;
use crate::repositories::route_repository::RouteDirectory;
use crate::repositories::session_repository::SessionStore;
use crate::repositories::telemetry_repository::TelemetryStore;
use crate::services::eta_service::EtaEngine;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::distance_meters;
use crate::utils::validation::require_not_empty;

#[derive(Clone)]
pub struct PassengerSearch {
    routes: Arc<dyn RouteDirectory>,
    sessions: Arc<dyn SessionStore>,
    telemetry: Arc<dyn TelemetryStore>,
    resources: Arc<dyn ResourceDirectory>,
    eta: EtaEngine,
}

impl PassengerSearch {
    pub fn new(
        routes: Arc<dyn RouteDirectory>,
        sessions: Arc<dyn SessionStore>,
        telemetry: Arc<dyn TelemetryStore>,
        resources: Arc<dyn ResourceDirectory>,
        eta: EtaEngine,
    ) -> Self {
        Self {
            routes,
            sessions,
            telemetry,
            resources,
            eta,
        }
    }

    pub async fn search_buses(
        &self,
        request: SearchBusesRequest,
    ) -> AppResult<SearchBusesResponse> {
        require_not_empty(&request.destination, "destination")?;

        let mut routes = self
            .routes
            .find_routes_by_destination(&request.destination)
            .await?;
        if routes.is_empty() {
            return Ok(SearchBusesResponse::empty());
        }

        let nearest_stop = match &request.bus_stop {
            Some(stop_name) => {
                routes.retain(|r| r.has_stop(stop_name));
                if routes.is_empty() {
                    return Ok(SearchBusesResponse::empty());
                }
                stop_name.clone()
            }
            None => {
                let (lat, lng) = match (request.current_lat, request.current_lng) {
                    (Some(lat), Some(lng)) => (lat, lng),
                    _ => {
                        return Err(AppError::Validation(
                            "current_lat and current_lng are required when bus_stop is not given"
                                .to_string(),
                        ))
                    }
                };
                match nearest_stop_name(&routes, lat, lng) {
                    Some(name) => name,
                    None => return Ok(SearchBusesResponse::empty()),
                }
            }
        };

        let now = Utc::now();
        let mut buses = Vec::new();
        for route in &routes {
            let active = self.sessions.active_for_route(route.id, now).await?;
            for session in active {
                let eta_minutes = self.eta.compute_eta_to_stop(session.id, &nearest_stop).await?;
                let latest = self.telemetry.latest(session.id).await?;
                let driver = self.resources.driver_name(session.driver_id).await?;

                buses.push(BusResult {
                    session_id: session.id,
                    vehicle_id: session.vehicle_id,
                    route_name: route.route_name.clone(),
                    driver,
                    eta_minutes,
                    latitude: latest.as_ref().map(|p| p.latitude),
                    longitude: latest.as_ref().map(|p| p.longitude),
                    start_time: session.start_time,
                });
            }
        }

        info!(
            "🔎 Búsqueda hacia '{}': parada '{}', {} autobuses",
            request.destination,
            nearest_stop,
            buses.len()
        );
        Ok(SearchBusesResponse {
            nearest_stop: Some(nearest_stop),
            buses,
        })
    }
}

/// Parada con distancia mínima al punto dado, a través de todas las rutas
/// candidatas. La comparación estricta conserva la primera encontrada en
/// caso de empate.
fn nearest_stop_name(routes: &[Route], lat: f64, lng: f64) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;
    for route in routes {
        for stop in route.stops.iter() {
            let distance = distance_meters(lat, lng, stop.latitude, stop.longitude);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, stop.name.as_str()));
            }
        }
    }
    best.map(|(_, name)| name.to_string())
}
