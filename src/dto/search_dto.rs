use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request de búsqueda de autobuses hacia un destino. Si no viene
/// `bus_stop`, se requieren las coordenadas actuales del pasajero para
/// elegir la parada más cercana.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchBusesRequest {
    pub destination: String,
    pub bus_stop: Option<String>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
}

/// Un autobús candidato en el resultado de búsqueda
#[derive(Debug, Clone, Serialize)]
pub struct BusResult {
    pub session_id: i64,
    pub vehicle_id: i64,
    pub route_name: String,
    pub driver: Option<String>,
    pub eta_minutes: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_time: DateTime<Utc>,
}

/// Response de búsqueda: parada elegida más los autobuses que se acercan
#[derive(Debug, Clone, Serialize)]
pub struct SearchBusesResponse {
    pub nearest_stop: Option<String>,
    pub buses: Vec<BusResult>,
}

impl SearchBusesResponse {
    pub fn empty() -> Self {
        Self {
            nearest_stop: None,
            buses: Vec::new(),
        }
    }
}
