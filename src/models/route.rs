//! Modelo de Route
//!
//! Una ruta es una secuencia ordenada de paradas geocodificadas con una
//! duración total estimada. La primera parada es el origen y la última el
//! destino; ese orden de recorrido es el que usan el motor de ETA y la
//! búsqueda de pasajeros.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Parada de autobús geocodificada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Route principal - mapea exactamente a la tabla routes.
/// `stops` contiene el recorrido completo: [origen, ...intermedias, destino].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub route_name: String,
    pub vehicle_id: i64,
    pub destination_name: String,
    pub stops: Json<Vec<BusStop>>,
    pub estimated_time_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl Route {
    pub fn source(&self) -> Option<&BusStop> {
        self.stops.first()
    }

    pub fn destination(&self) -> Option<&BusStop> {
        self.stops.last()
    }

    /// Buscar una parada por nombre exacto dentro del recorrido
    pub fn find_stop(&self, stop_name: &str) -> Option<&BusStop> {
        self.stops.iter().find(|s| s.name == stop_name)
    }

    pub fn has_stop(&self, stop_name: &str) -> bool {
        self.find_stop(stop_name).is_some()
    }
}
