use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::route::{BusStop, Route};

/// Parada dentro de un request de ruta
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopInput {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<StopInput> for BusStop {
    fn from(stop: StopInput) -> Self {
        BusStop {
            name: stop.name,
            latitude: stop.latitude,
            longitude: stop.longitude,
        }
    }
}

/// Request para crear una ruta. El recorrido completo queda como
/// [source, ...route_points, destination].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub route_name: String,

    pub source: StopInput,
    pub destination: StopInput,

    #[serde(default)]
    pub route_points: Vec<StopInput>,

    pub vehicle_id: i64,

    /// Duración total estimada del viaje, en minutos
    #[validate(range(min = 0, max = 1440))]
    pub estimated_time: i32,
}

/// Request para actualizar una ruta existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub route_name: Option<String>,

    pub source: Option<StopInput>,
    pub destination: Option<StopInput>,
    pub route_points: Option<Vec<StopInput>>,
    pub vehicle_id: Option<i64>,

    #[validate(range(min = 0, max = 1440))]
    pub estimated_time: Option<i32>,
}

/// Response de ruta para la API
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: i64,
    pub route_name: String,
    pub vehicle_id: i64,
    pub destination_name: String,
    pub stops: Vec<BusStop>,
    pub estimated_time: i32,
    pub created_at: String,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            route_name: route.route_name,
            vehicle_id: route.vehicle_id,
            destination_name: route.destination_name,
            stops: route.stops.0,
            estimated_time: route.estimated_time_minutes,
            created_at: route.created_at.to_rfc3339(),
        }
    }
}
