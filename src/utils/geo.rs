//! Utilidades geográficas
//!
//! Validación de coordenadas GPS y distancia de gran círculo (Haversine)
//! entre dos pares lat/lng. Las distancias se expresan en metros.

use geo::{HaversineDistance, Point};

/// Validar que un par latitud/longitud esté dentro de los rangos aceptables.
/// Latitud en [-90, 90], longitud en [-180, 180]; NaN se rechaza.
pub fn is_valid_gps(latitude: f64, longitude: f64) -> bool {
    if latitude.is_nan() || longitude.is_nan() {
        return false;
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return false;
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return false;
    }
    true
}

/// Distancia Haversine en metros entre dos puntos (lat, lng)
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let a = Point::new(lng1, lat1);
    let b = Point::new(lng2, lat2);
    a.haversine_distance(&b)
}
